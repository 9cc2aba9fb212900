use indextree::NodeEdge as IndexTreeNodeEdge;

use crate::domdata::{Dom, Node};
use crate::xmlvalue::{NodeType, Value};

/// Node edges.
///
/// Used by [`Dom::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEdge {
    /// The start edge of a node. In case of an element
    /// this is the start tag. In case of a document
    /// the start of the document.
    Start(Node),
    /// The end edge of a node. In case of an element
    /// this is the end tag. For any other values, the
    /// end edge occurs immediately after the start
    /// edge.
    End(Node),
}

/// ## Read-only access
///
/// Lists of nodes are returned as snapshots: they don't change when the
/// tree is modified afterwards.
impl Dom {
    /// The document that created this node.
    ///
    /// Returns [`None`] for a document node.
    pub fn owner_document(&self, node: Node) -> Option<Node> {
        self.node_data(node).owner
    }

    /// Obtain the document element from a document node.
    ///
    /// Returns [`None`] if this is not a document or if the document has
    /// no element yet.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    ///
    /// let doc = dom.parse("<!-- hi --><p>Example</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.node_name(p), "p");
    /// ```
    pub fn document_element(&self, node: Node) -> Option<Node> {
        if !self.is_document(node) {
            return None;
        }
        self.children(node).find(|child| self.is_element(*child))
    }

    /// The document type declaration of a document, if any.
    pub fn doctype(&self, node: Node) -> Option<Node> {
        if !self.is_document(node) {
            return None;
        }
        self.children(node)
            .find(|child| self.node_type(*child) == NodeType::DocumentType)
    }

    /// Get parent node.
    ///
    /// Returns [`None`] for documents, for unattached nodes and for
    /// attributes; use [`Dom::owner_element`] for the latter.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<p>Example</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let text = dom.first_child(p).unwrap();
    /// assert_eq!(dom.parent_node(text), Some(p));
    /// assert_eq!(dom.parent_node(p), Some(doc));
    /// assert_eq!(dom.parent_node(doc), None);
    /// ```
    pub fn parent_node(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].parent().map(Node::new)
    }

    /// Iterator over the child nodes of this node.
    ///
    /// Attributes are not children.
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(self.arena()).map(Node::new)
    }

    /// A snapshot of the child nodes.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<p><a/><b/></p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let children = dom.child_nodes(p);
    /// assert_eq!(children.len(), 2);
    /// assert_eq!(dom.node_name(children[1]), "b");
    /// ```
    pub fn child_nodes(&self, node: Node) -> Vec<Node> {
        self.children(node).collect()
    }

    /// Does this node have any children?
    pub fn has_child_nodes(&self, node: Node) -> bool {
        self.first_child(node).is_some()
    }

    /// Get first child.
    ///
    /// Returns [`None`] if there are no children.
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].first_child().map(Node::new)
    }

    /// Get last child.
    ///
    /// Returns [`None`] if there are no children.
    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].last_child().map(Node::new)
    }

    /// Get next sibling.
    ///
    /// Returns [`None`] if there is no next sibling.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<p><a/><b/></p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let a = dom.first_child(p).unwrap();
    /// let b = dom.next_sibling(a).unwrap();
    /// assert_eq!(dom.next_sibling(b), None);
    /// assert_eq!(dom.previous_sibling(b), Some(a));
    /// ```
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].next_sibling().map(Node::new)
    }

    /// Get previous sibling.
    ///
    /// Returns [`None`] if there is no previous sibling.
    pub fn previous_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].previous_sibling().map(Node::new)
    }

    /// Iterator over the following siblings of this node, including this one.
    pub fn following_siblings(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().following_siblings(self.arena()).map(Node::new)
    }

    /// Iterator over the preceding siblings of this node, including this one.
    pub fn preceding_siblings(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().preceding_siblings(self.arena()).map(Node::new)
    }

    /// Iterator over ancestor nodes, including this one.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    ///
    /// let doc = dom.parse("<a><b><c/></b></a>").unwrap();
    /// let a = dom.document_element(doc).unwrap();
    /// let b = dom.first_child(a).unwrap();
    /// let c = dom.first_child(b).unwrap();
    ///
    /// let ancestors = dom.ancestors(c).collect::<Vec<_>>();
    /// assert_eq!(ancestors, vec![c, b, a, doc]);
    /// ```
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().ancestors(self.arena()).map(Node::new)
    }

    /// Iterator over of the descendants of this node,
    /// including this one. In document order (pre-order depth-first).
    ///
    /// Attributes aren't included as descendants.
    pub fn descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().descendants(self.arena()).map(Node::new)
    }

    /// Is `other` this node or one of its descendants?
    pub fn contains(&self, node: Node, other: Node) -> bool {
        self.ancestors(other).any(|ancestor| ancestor == node)
    }

    /// Traverse over node edges.
    ///
    /// This can be used to traverse the tree in document order iteratively
    /// without the need for recursion, while getting structure information
    /// (unlike [`Dom::descendants`] which doesn't retain structure
    /// information).
    ///
    /// ```rust
    /// use xmldom::NodeEdge;
    ///
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<a><b>Text</b></a>").unwrap();
    /// let a = dom.document_element(doc).unwrap();
    /// let b = dom.first_child(a).unwrap();
    /// let text = dom.first_child(b).unwrap();
    /// let edges = dom.traverse(a).collect::<Vec<_>>();
    /// assert_eq!(edges, vec![
    ///  NodeEdge::Start(a),
    ///  NodeEdge::Start(b),
    ///  NodeEdge::Start(text),
    ///  NodeEdge::End(text),
    ///  NodeEdge::End(b),
    ///  NodeEdge::End(a),
    /// ]);
    /// ```
    pub fn traverse(&self, node: Node) -> impl Iterator<Item = NodeEdge> + '_ {
        node.get().traverse(self.arena()).map(|edge| match edge {
            IndexTreeNodeEdge::Start(node_id) => NodeEdge::Start(Node::new(node_id)),
            IndexTreeNodeEdge::End(node_id) => NodeEdge::End(Node::new(node_id)),
        })
    }

    /// The DOM `textContent`.
    ///
    /// For elements, documents and fragments this is the concatenated text
    /// of all descendant text and CDATA nodes; comments and processing
    /// instructions are skipped. For character data it is the data, for
    /// attributes the value. A document type has no text content.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<p>a<!--c--><b>b</b><![CDATA[c]]></p>").unwrap();
    /// assert_eq!(dom.text_content(doc), "abc");
    /// ```
    pub fn text_content(&self, node: Node) -> String {
        match self.value(node) {
            Value::Element(_) | Value::Document(_) | Value::DocumentFragment => self
                .descendants(node)
                .filter_map(|n| self.text_str(n))
                .collect(),
            Value::Attribute(attribute) => attribute.value().to_string(),
            Value::DocumentType(_) => String::new(),
            value => value.character_data().unwrap_or_default().to_string(),
        }
    }

    /// A snapshot of the descendant elements with a tag name, in document
    /// order. `"*"` matches all elements. The node itself is not included.
    pub fn get_elements_by_tag_name(&self, node: Node, tag_name: &str) -> Vec<Node> {
        self.descendants(node)
            .skip(1)
            .filter(|n| {
                self.element(*n)
                    .map_or(false, |e| tag_name == "*" || e.name.qualified_name() == tag_name)
            })
            .collect()
    }

    /// A snapshot of the descendant elements with an expanded name, in
    /// document order. `"*"` is a wildcard for either part.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<r xmlns:p="urn:a"><p:x/><x/><p:x/></r>"#).unwrap();
    /// assert_eq!(dom.get_elements_by_tag_name_ns(doc, "urn:a", "x").len(), 2);
    /// assert_eq!(dom.get_elements_by_tag_name_ns(doc, "*", "x").len(), 3);
    /// ```
    pub fn get_elements_by_tag_name_ns(
        &self,
        node: Node,
        namespace_uri: &str,
        local_name: &str,
    ) -> Vec<Node> {
        self.descendants(node)
            .skip(1)
            .filter(|n| {
                self.element(*n).map_or(false, |e| {
                    (namespace_uri == "*" || e.name.namespace_uri() == namespace_uri)
                        && (local_name == "*" || e.name.local_name() == local_name)
                })
            })
            .collect()
    }
}
