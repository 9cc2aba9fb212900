use crate::access::NodeEdge;
use crate::domdata::{Dom, Node};
use crate::error::Error;
use crate::xmlvalue::{Attribute, NodeType, Value};

/// ## Copying nodes between and within documents
impl Dom {
    /// Create an unattached copy of a node in the same document.
    ///
    /// Element copies always get copies of the attributes; children are
    /// only copied if `deep` is set. Copying a document creates a new
    /// document.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<p a="1"><b/></p>"#).unwrap();
    /// let p = dom.document_element(doc).unwrap();
    ///
    /// let shallow = dom.clone_node(p, false).unwrap();
    /// assert_eq!(dom.get_attribute(shallow, "a"), Some("1"));
    /// assert!(!dom.has_child_nodes(shallow));
    ///
    /// let deep = dom.clone_node(p, true).unwrap();
    /// assert!(dom.is_equal_node(p, deep));
    /// assert_eq!(dom.parent_node(deep), None);
    /// ```
    pub fn clone_node(&mut self, node: Node, deep: bool) -> Result<Node, Error> {
        let doc = self.document_node(node);
        self.copy_tree(node, doc, deep)
    }

    /// Create a copy of a node, possibly from another document, owned by
    /// the given document. The source is not changed.
    ///
    /// Documents and document types cannot be imported.
    pub fn import_node(&mut self, doc: Node, node: Node, deep: bool) -> Result<Node, Error> {
        self.transfer_check(node)?;
        let doc = self.document_node(doc);
        self.copy_tree(node, doc, deep)
    }

    /// Move a node, with its descendants, into the given document.
    ///
    /// The node is first removed from its parent (or, for an attribute,
    /// from its element). Documents and document types cannot be adopted.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc1 = dom.parse("<a><b/></a>").unwrap();
    /// let doc2 = dom.parse("<c/>").unwrap();
    /// let b = dom.first_child(dom.document_element(doc1).unwrap()).unwrap();
    /// dom.adopt_node(doc2, b).unwrap();
    /// let c = dom.document_element(doc2).unwrap();
    /// dom.append_child(c, b).unwrap();
    /// assert_eq!(dom.to_string(doc2).unwrap(), "<c><b /></c>");
    /// ```
    pub fn adopt_node(&mut self, doc: Node, node: Node) -> Result<Node, Error> {
        self.transfer_check(node)?;
        let doc = self.document_node(doc);
        if let Some(owner) = self.owner_element(node) {
            self.detach_attribute(owner, node);
        }
        node.get().detach(self.arena_mut());
        let nodes = self.descendants(node).collect::<Vec<_>>();
        for n in nodes {
            for attribute in self.attributes(n) {
                self.set_owner(attribute, doc);
            }
            self.set_owner(n, doc);
        }
        Ok(node)
    }

    fn transfer_check(&self, node: Node) -> Result<(), Error> {
        match self.node_type(node) {
            NodeType::Document | NodeType::DocumentType => Err(Error::NotSupported(format!(
                "{} nodes cannot be moved to another document",
                self.node_name(node)
            ))),
            _ => Ok(()),
        }
    }

    fn set_owner(&mut self, node: Node, doc: Node) {
        self.arena_mut()[node.get()].get_mut().owner = Some(doc);
    }

    // copy a single node, with its attributes if it is an element
    fn copy_node(&mut self, node: Node, doc: Node) -> Node {
        match self.value(node).clone() {
            Value::Document(document) => self.new_node(None, Value::Document(document)),
            Value::Element(element) => {
                let copy = self.new_element(doc, element.name.clone());
                for attribute in element.attributes.iter() {
                    let attribute_copy = self.copy_node(attribute, doc);
                    self.attach_attribute(copy, attribute_copy);
                }
                copy
            }
            Value::Attribute(attribute) => self.new_owned(
                doc,
                Value::Attribute(Attribute::new(attribute.name, attribute.value)),
            ),
            value => self.new_owned(doc, value),
        }
    }

    // copy a subtree iteratively; the new parents are kept on a stack
    fn copy_tree(&mut self, node: Node, doc: Node, deep: bool) -> Result<Node, Error> {
        let root = self.copy_node(node, doc);
        if !deep {
            return Ok(root);
        }
        // children of a copied document belong to the new document
        let doc = self.document_node(root);
        let edges = self.traverse(node).collect::<Vec<_>>();
        let mut parents = vec![root];
        // the first and last edge are the node itself
        for edge in &edges[1..edges.len() - 1] {
            match edge {
                NodeEdge::Start(n) => {
                    let copy = self.copy_node(*n, doc);
                    if let Some(parent) = parents.last() {
                        parent.get().checked_append(copy.get(), self.arena_mut())?;
                    }
                    parents.push(copy);
                }
                NodeEdge::End(_) => {
                    parents.pop();
                }
            }
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_has_new_identity() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<a x="1"><b>text</b></a>"#).unwrap();
        let a = dom.document_element(doc).unwrap();
        let copy = dom.clone_node(a, true).unwrap();
        let originals = dom.descendants(a).collect::<Vec<_>>();
        for n in dom.descendants(copy) {
            assert!(!originals.contains(&n));
            assert_eq!(dom.owner_document(n), Some(doc));
        }
        let x = dom.get_attribute_node(copy, "x").unwrap();
        assert_eq!(dom.owner_element(x), Some(copy));
    }

    #[test]
    fn test_clone_document() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a><b/></a>").unwrap();
        let copy = dom.clone_node(doc, true).unwrap();
        assert_ne!(copy, doc);
        let a = dom.document_element(copy).unwrap();
        assert_eq!(dom.owner_document(a), Some(copy));
        assert!(dom.is_equal_node(doc, copy));
    }

    #[test]
    fn test_import_node() {
        let mut dom = Dom::new();
        let doc1 = dom.parse("<a><b/></a>").unwrap();
        let doc2 = dom.parse("<c/>").unwrap();
        let a = dom.document_element(doc1).unwrap();
        let imported = dom.import_node(doc2, a, true).unwrap();
        assert_eq!(dom.owner_document(imported), Some(doc2));
        let c = dom.document_element(doc2).unwrap();
        dom.append_child(c, imported).unwrap();
        // the source is untouched
        assert_eq!(dom.parent_node(a), Some(doc1));
        assert!(matches!(
            dom.import_node(doc2, doc1, true),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_adopt_attribute() {
        let mut dom = Dom::new();
        let doc1 = dom.parse(r#"<a x="1"/>"#).unwrap();
        let doc2 = dom.parse("<c/>").unwrap();
        let a = dom.document_element(doc1).unwrap();
        let x = dom.get_attribute_node(a, "x").unwrap();
        dom.adopt_node(doc2, x).unwrap();
        assert!(!dom.has_attribute(a, "x"));
        let c = dom.document_element(doc2).unwrap();
        dom.set_attribute_node(c, x).unwrap();
        assert_eq!(dom.get_attribute(c, "x"), Some("1"));
    }
}
