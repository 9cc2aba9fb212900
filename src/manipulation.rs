use crate::domdata::{Dom, Node};
use crate::error::Error;
use crate::xmlvalue::{NodeType, Text, Value};

/// Manipulation of the tree structure.
///
/// This maintains the DOM hierarchy:
/// - Only documents, elements and document fragments have children.
/// - A document has at most one element child (the document element) and at
///   most one document type, which comes before the element. Other children
///   of a document are comments and processing instructions; text is not
///   allowed there.
/// - A node is never inserted below itself.
/// - A node can only be inserted in the document that created it. Use
///   [`Dom::import_node`] or [`Dom::adopt_node`] to move between documents.
///
/// Inserting a node that is already in the tree moves it. Inserting a
/// document fragment inserts its children instead and leaves the fragment
/// empty.
///
/// All checks happen before anything is changed: if an operation fails the
/// tree is unchanged.
impl Dom {
    /// Append a child to the end of the children of the given parent.
    ///
    /// Returns the appended child.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.create_document();
    /// let root = dom.create_element(doc, "root").unwrap();
    /// dom.append_child(doc, root).unwrap();
    /// let second = dom.create_element(doc, "second").unwrap();
    /// assert!(dom.append_child(doc, second).is_err());
    /// ```
    pub fn append_child(&mut self, parent: Node, child: Node) -> Result<Node, Error> {
        self.insert_before(parent, child, None)
    }

    /// Insert a child before a reference child. If the reference is
    /// [`None`] this appends.
    ///
    /// Returns [`Error::NotFound`] if the reference is not a child of the
    /// parent.
    pub fn insert_before(
        &mut self,
        parent: Node,
        new_child: Node,
        reference: Option<Node>,
    ) -> Result<Node, Error> {
        if let Some(reference) = reference {
            if self.parent_node(reference) != Some(parent) {
                return Err(Error::NotFound(
                    "reference node is not a child of this node".to_string(),
                ));
            }
        }
        self.insert_check(parent, new_child, reference, None)?;
        // inserting a node before itself leaves it where it is
        let reference = if reference == Some(new_child) {
            self.next_sibling(new_child)
        } else {
            reference
        };
        self.insert_unchecked(parent, new_child, reference)?;
        Ok(new_child)
    }

    /// Replace a child by another node.
    ///
    /// Returns the replaced child, which is now unattached.
    pub fn replace_child(
        &mut self,
        parent: Node,
        new_child: Node,
        old_child: Node,
    ) -> Result<Node, Error> {
        if self.parent_node(old_child) != Some(parent) {
            return Err(Error::NotFound(
                "node to replace is not a child of this node".to_string(),
            ));
        }
        if new_child == old_child {
            return Ok(old_child);
        }
        self.insert_check(parent, new_child, Some(old_child), Some(old_child))?;
        self.insert_unchecked(parent, new_child, Some(old_child))?;
        old_child.get().detach(self.arena_mut());
        Ok(old_child)
    }

    /// Remove a child.
    ///
    /// The removed subtree stays valid and can be inserted again. Returns
    /// the removed child.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<p><a/><b/></p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let a = dom.first_child(p).unwrap();
    /// dom.remove_child(p, a).unwrap();
    /// assert_eq!(dom.to_string(doc).unwrap(), "<p><b /></p>");
    /// assert!(dom.remove_child(p, a).is_err());
    /// ```
    pub fn remove_child(&mut self, parent: Node, old_child: Node) -> Result<Node, Error> {
        if self.parent_node(old_child) != Some(parent) {
            return Err(Error::NotFound(
                "node to remove is not a child of this node".to_string(),
            ));
        }
        old_child.get().detach(self.arena_mut());
        Ok(old_child)
    }

    /// Set the DOM `textContent`.
    ///
    /// For elements and fragments all children are replaced by a single
    /// text node (none if the text is empty). For character data this sets
    /// the data, for attributes the value. Setting it on a document type
    /// has no effect; on a document it is a hierarchy error as text is not
    /// allowed there.
    pub fn set_text_content(&mut self, node: Node, text: &str) -> Result<(), Error> {
        match self.node_type(node) {
            NodeType::Element | NodeType::DocumentFragment => {
                for child in self.child_nodes(node) {
                    child.get().detach(self.arena_mut());
                }
                if !text.is_empty() {
                    let text_node = self.create_text_node(node, text);
                    node.get().checked_append(text_node.get(), self.arena_mut())?;
                }
                Ok(())
            }
            NodeType::Document => Err(Error::HierarchyRequest(
                "text is not allowed as a child of a document".to_string(),
            )),
            NodeType::Attribute => {
                self.set_attribute_value(node, text);
                Ok(())
            }
            NodeType::DocumentType | NodeType::EntityReference => Ok(()),
            NodeType::Text
            | NodeType::CDataSection
            | NodeType::Comment
            | NodeType::ProcessingInstruction => self.set_data(node, text),
        }
    }

    /// Put the subtree in normal form: adjacent text nodes are merged and
    /// empty text nodes are removed. CDATA sections are left alone.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<p>a</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let b = dom.create_text_node(doc, "b");
    /// let empty = dom.create_text_node(doc, "");
    /// dom.append_child(p, empty).unwrap();
    /// dom.append_child(p, b).unwrap();
    /// dom.normalize(p);
    /// assert_eq!(dom.child_nodes(p).len(), 1);
    /// assert_eq!(dom.text_content(p), "ab");
    /// ```
    pub fn normalize(&mut self, node: Node) {
        let parents = self
            .descendants(node)
            .filter(|n| self.has_child_nodes(*n))
            .collect::<Vec<_>>();
        for parent in parents {
            let mut current = self.first_child(parent);
            while let Some(child) = current {
                current = self.next_sibling(child);
                if !self.is_text(child) {
                    continue;
                }
                let mut merged = self.text_str(child).unwrap_or_default().to_string();
                while let Some(next) = current.filter(|n| self.is_text(*n)) {
                    merged.push_str(self.text_str(next).unwrap_or_default());
                    current = self.next_sibling(next);
                    next.get().detach(self.arena_mut());
                }
                if merged.is_empty() {
                    child.get().detach(self.arena_mut());
                } else if let Value::Text(text) = self.value_mut(child) {
                    *text = Text::new(merged);
                }
            }
        }
    }

    // move the node, or the children of a fragment, into place without
    // checks
    fn insert_unchecked(
        &mut self,
        parent: Node,
        new_child: Node,
        reference: Option<Node>,
    ) -> Result<(), Error> {
        let nodes = if self.node_type(new_child) == NodeType::DocumentFragment {
            self.child_nodes(new_child)
        } else {
            vec![new_child]
        };
        for node in nodes {
            node.get().detach(self.arena_mut());
            match reference {
                Some(reference) => reference
                    .get()
                    .checked_insert_before(node.get(), self.arena_mut())?,
                None => parent.get().checked_append(node.get(), self.arena_mut())?,
            }
        }
        Ok(())
    }

    // the hierarchy checks shared by insert_before and replace_child.
    // `reference` is the node the new child goes before, `replaced` the
    // node that is going away.
    fn insert_check(
        &self,
        parent: Node,
        new_child: Node,
        reference: Option<Node>,
        replaced: Option<Node>,
    ) -> Result<(), Error> {
        let parent_type = self.node_type(parent);
        if !matches!(
            parent_type,
            NodeType::Document | NodeType::Element | NodeType::DocumentFragment
        ) {
            return Err(Error::HierarchyRequest(format!(
                "{} nodes cannot have children",
                self.node_name(parent)
            )));
        }
        let child_type = self.node_type(new_child);
        if matches!(child_type, NodeType::Document | NodeType::Attribute) {
            return Err(Error::HierarchyRequest(format!(
                "{} nodes cannot be inserted as a child",
                self.node_name(new_child)
            )));
        }
        if self.contains(new_child, parent) {
            return Err(Error::HierarchyRequest(
                "a node cannot be inserted below itself".to_string(),
            ));
        }
        if self.document_node(new_child) != self.document_node(parent) {
            return Err(Error::WrongDocument);
        }
        let inserted = if child_type == NodeType::DocumentFragment {
            self.child_nodes(new_child)
        } else {
            vec![new_child]
        };
        if parent_type == NodeType::Document {
            self.document_check(parent, &inserted, reference, replaced)
        } else {
            for node in inserted {
                if self.node_type(node) == NodeType::DocumentType {
                    return Err(Error::HierarchyRequest(
                        "a document type can only be a child of a document".to_string(),
                    ));
                }
            }
            Ok(())
        }
    }

    fn document_check(
        &self,
        document: Node,
        inserted: &[Node],
        reference: Option<Node>,
        replaced: Option<Node>,
    ) -> Result<(), Error> {
        // the children that remain in place, split around the insertion point
        let remaining = |n: &Node| Some(*n) != replaced && !inserted.contains(n);
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut seen_reference = false;
        for child in self.children(document) {
            if Some(child) == reference {
                seen_reference = true;
            }
            if remaining(&child) {
                if seen_reference {
                    after.push(child);
                } else {
                    before.push(child);
                }
            }
        }
        let count = |nodes: &[Node], node_type: NodeType| {
            nodes
                .iter()
                .filter(|n| self.node_type(**n) == node_type)
                .count()
        };
        let mut elements = count(&before, NodeType::Element) + count(&after, NodeType::Element);
        let mut doctypes =
            count(&before, NodeType::DocumentType) + count(&after, NodeType::DocumentType);
        for (i, node) in inserted.iter().enumerate() {
            match self.node_type(*node) {
                NodeType::Element => {
                    elements += 1;
                    if elements > 1 {
                        return Err(Error::HierarchyRequest(
                            "a document can only have one document element".to_string(),
                        ));
                    }
                    if count(&after, NodeType::DocumentType) > 0 {
                        return Err(Error::HierarchyRequest(
                            "the document element must follow the document type".to_string(),
                        ));
                    }
                }
                NodeType::DocumentType => {
                    doctypes += 1;
                    if doctypes > 1 {
                        return Err(Error::HierarchyRequest(
                            "a document can only have one document type".to_string(),
                        ));
                    }
                    if count(&before, NodeType::Element) > 0
                        || count(&inserted[..i], NodeType::Element) > 0
                    {
                        return Err(Error::HierarchyRequest(
                            "the document type must precede the document element".to_string(),
                        ));
                    }
                }
                NodeType::Comment | NodeType::ProcessingInstruction => {}
                _ => {
                    return Err(Error::HierarchyRequest(format!(
                        "{} is not allowed as a child of a document",
                        self.node_name(*node)
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_moves_node() {
        let mut dom = Dom::new();
        let doc = dom.parse("<r><a/><b/></r>").unwrap();
        let r = dom.document_element(doc).unwrap();
        let a = dom.first_child(r).unwrap();
        dom.append_child(r, a).unwrap();
        assert_eq!(dom.to_string(doc).unwrap(), "<r><b /><a /></r>");
    }

    #[test]
    fn test_append_ancestor_rejected() {
        let mut dom = Dom::new();
        let doc = dom.parse("<r><a/></r>").unwrap();
        let r = dom.document_element(doc).unwrap();
        let a = dom.first_child(r).unwrap();
        assert!(matches!(
            dom.append_child(a, r),
            Err(Error::HierarchyRequest(_))
        ));
        assert!(matches!(
            dom.append_child(a, a),
            Err(Error::HierarchyRequest(_))
        ));
    }

    #[test]
    fn test_text_under_document_rejected() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let text = dom.create_text_node(doc, "x");
        assert!(matches!(
            dom.append_child(doc, text),
            Err(Error::HierarchyRequest(_))
        ));
    }

    #[test]
    fn test_wrong_document() {
        let mut dom = Dom::new();
        let doc1 = dom.parse("<a/>").unwrap();
        let doc2 = dom.create_document();
        let e = dom.create_element(doc2, "e").unwrap();
        let a = dom.document_element(doc1).unwrap();
        assert!(matches!(dom.append_child(a, e), Err(Error::WrongDocument)));
    }

    #[test]
    fn test_character_data_has_no_children() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let text = dom.create_text_node(doc, "x");
        let other = dom.create_text_node(doc, "y");
        assert!(matches!(
            dom.append_child(text, other),
            Err(Error::HierarchyRequest(_))
        ));
    }

    #[test]
    fn test_insert_before_and_replace() {
        let mut dom = Dom::new();
        let doc = dom.parse("<r><b/></r>").unwrap();
        let r = dom.document_element(doc).unwrap();
        let b = dom.first_child(r).unwrap();
        let a = dom.create_element(doc, "a").unwrap();
        dom.insert_before(r, a, Some(b)).unwrap();
        let c = dom.create_element(doc, "c").unwrap();
        assert_eq!(dom.replace_child(r, c, b).unwrap(), b);
        assert_eq!(dom.parent_node(b), None);
        assert_eq!(dom.to_string(doc).unwrap(), "<r><a /><c /></r>");
        assert!(matches!(
            dom.insert_before(r, b, Some(b)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_replace_document_element() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a/>").unwrap();
        let a = dom.document_element(doc).unwrap();
        let b = dom.create_element(doc, "b").unwrap();
        dom.replace_child(doc, b, a).unwrap();
        assert_eq!(dom.document_element(doc), Some(b));
    }

    #[test]
    fn test_fragment_insertion() {
        let mut dom = Dom::new();
        let doc = dom.parse("<r/>").unwrap();
        let r = dom.document_element(doc).unwrap();
        let fragment = dom.create_document_fragment(doc);
        let a = dom.create_element(doc, "a").unwrap();
        let t = dom.create_text_node(doc, "t");
        dom.append_child(fragment, a).unwrap();
        dom.append_child(fragment, t).unwrap();
        dom.append_child(r, fragment).unwrap();
        assert!(!dom.has_child_nodes(fragment));
        assert_eq!(dom.to_string(doc).unwrap(), "<r><a />t</r>");
    }

    #[test]
    fn test_fragment_with_text_rejected_under_document() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let fragment = dom.create_document_fragment(doc);
        let a = dom.create_element(doc, "a").unwrap();
        let t = dom.create_text_node(doc, "t");
        dom.append_child(fragment, a).unwrap();
        dom.append_child(fragment, t).unwrap();
        assert!(dom.append_child(doc, fragment).is_err());
        // nothing moved
        assert_eq!(dom.child_nodes(fragment), vec![a, t]);
        assert!(!dom.has_child_nodes(doc));
    }

    #[test]
    fn test_doctype_order() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a/>").unwrap();
        let doctype = dom.create_document_type(doc, "a", "", "").unwrap();
        assert!(matches!(
            dom.append_child(doc, doctype),
            Err(Error::HierarchyRequest(_))
        ));
        let a = dom.document_element(doc).unwrap();
        dom.insert_before(doc, doctype, Some(a)).unwrap();
        assert_eq!(dom.doctype(doc), Some(doctype));
    }

    #[test]
    fn test_set_text_content() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a><b/>text<!--c--></a>").unwrap();
        let a = dom.document_element(doc).unwrap();
        dom.set_text_content(a, "new").unwrap();
        assert_eq!(dom.to_string(doc).unwrap(), "<a>new</a>");
        dom.set_text_content(a, "").unwrap();
        assert!(!dom.has_child_nodes(a));
        assert!(matches!(
            dom.set_text_content(doc, "x"),
            Err(Error::HierarchyRequest(_))
        ));
    }
}
