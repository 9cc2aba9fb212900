use std::borrow::Cow;

use crate::domdata::{Dom, Node};
use crate::error::Error;
use crate::xmlvalue::{
    check_comment, check_pi_data, Attribute, Comment, Document, DocumentType, Element,
    NodeType, ProcessingInstruction, Text, Value,
};

/// Obtain node values, their types and their names.
///
/// These are handy if you only need to match against a single value or know
/// the node type already. If you want to handle all node types, use a
/// `match` statement on [`Value`](crate::Value) instead.
impl Dom {
    /// Access to the value for this node.
    ///
    /// ```rust
    /// use xmldom::{Dom, Value};
    ///
    /// let mut dom = Dom::new();
    /// let doc = dom.parse("<doc>Example</doc>").unwrap();
    /// let root = dom.document_element(doc).unwrap();
    ///
    /// match dom.value(root) {
    ///     Value::Element(element) => assert_eq!(element.tag_name(), "doc"),
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        &self.node_data(node).value
    }

    /// Mutable access to the value for this node.
    #[inline]
    pub fn value_mut(&mut self, node: Node) -> &mut Value {
        &mut self.arena[node.get()].get_mut().value
    }

    /// Get the [`NodeType`] of a node.
    pub fn node_type(&self, node: Node) -> NodeType {
        self.value(node).node_type()
    }

    /// Return true if node is a document.
    pub fn is_document(&self, node: Node) -> bool {
        self.node_type(node) == NodeType::Document
    }

    /// Return true if node is an element.
    pub fn is_element(&self, node: Node) -> bool {
        self.node_type(node) == NodeType::Element
    }

    /// Return true if node is an attribute.
    pub fn is_attribute(&self, node: Node) -> bool {
        self.node_type(node) == NodeType::Attribute
    }

    /// Return true if node is text. CDATA sections are not text.
    pub fn is_text(&self, node: Node) -> bool {
        self.node_type(node) == NodeType::Text
    }

    /// Return true if node is a comment.
    pub fn is_comment(&self, node: Node) -> bool {
        self.node_type(node) == NodeType::Comment
    }

    /// Return true if node is a processing instruction.
    pub fn is_processing_instruction(&self, node: Node) -> bool {
        self.node_type(node) == NodeType::ProcessingInstruction
    }

    /// If this node is a document, return its XML declaration information.
    pub fn document(&self, node: Node) -> Option<&Document> {
        if let Value::Document(document) = self.value(node) {
            Some(document)
        } else {
            None
        }
    }

    /// If this node is a document type declaration, return it.
    pub fn document_type(&self, node: Node) -> Option<&DocumentType> {
        if let Value::DocumentType(doctype) = self.value(node) {
            Some(doctype)
        } else {
            None
        }
    }

    /// If this node's value is an element, return a reference to it.
    pub fn element(&self, node: Node) -> Option<&Element> {
        if let Value::Element(element) = self.value(node) {
            Some(element)
        } else {
            None
        }
    }

    pub(crate) fn element_mut(&mut self, node: Node) -> Option<&mut Element> {
        if let Value::Element(element) = self.value_mut(node) {
            Some(element)
        } else {
            None
        }
    }

    /// If this node's value is an attribute, return a reference to it.
    pub fn attribute(&self, node: Node) -> Option<&Attribute> {
        if let Value::Attribute(attribute) = self.value(node) {
            Some(attribute)
        } else {
            None
        }
    }

    pub(crate) fn attribute_mut(&mut self, node: Node) -> Option<&mut Attribute> {
        if let Value::Attribute(attribute) = self.value_mut(node) {
            Some(attribute)
        } else {
            None
        }
    }

    /// If this node is text or a CDATA section, return a reference to it.
    pub fn text(&self, node: Node) -> Option<&Text> {
        match self.value(node) {
            Value::Text(text) | Value::CDataSection(text) => Some(text),
            _ => None,
        }
    }

    /// If this node is text or a CDATA section, return a mutable reference
    /// to it.
    pub fn text_mut(&mut self, node: Node) -> Option<&mut Text> {
        match self.value_mut(node) {
            Value::Text(text) | Value::CDataSection(text) => Some(text),
            _ => None,
        }
    }

    /// If this node is text, return a reference to the string.
    pub fn text_str(&self, node: Node) -> Option<&str> {
        self.text(node).map(|t| t.get())
    }

    /// If this node's value is a comment, return a reference to it.
    pub fn comment(&self, node: Node) -> Option<&Comment> {
        if let Value::Comment(comment) = self.value(node) {
            Some(comment)
        } else {
            None
        }
    }

    /// If this node's value is a processing instruction, return a reference to it.
    pub fn processing_instruction(&self, node: Node) -> Option<&ProcessingInstruction> {
        if let Value::ProcessingInstruction(pi) = self.value(node) {
            Some(pi)
        } else {
            None
        }
    }

    /// The DOM `nodeName`.
    ///
    /// The qualified name for elements and attributes, the target for
    /// processing instructions, the name for document types and a fixed
    /// `#...` name otherwise.
    pub fn node_name(&self, node: Node) -> Cow<str> {
        match self.value(node) {
            Value::Element(element) => element.name.qualified_name(),
            Value::Attribute(attribute) => attribute.name.qualified_name(),
            Value::Text(_) => Cow::Borrowed("#text"),
            Value::CDataSection(_) => Cow::Borrowed("#cdata-section"),
            Value::Comment(_) => Cow::Borrowed("#comment"),
            Value::ProcessingInstruction(pi) => Cow::Borrowed(pi.target()),
            Value::Document(_) => Cow::Borrowed("#document"),
            Value::DocumentType(doctype) => Cow::Borrowed(doctype.name()),
            Value::DocumentFragment => Cow::Borrowed("#document-fragment"),
        }
    }

    /// The DOM `nodeValue`: the value of an attribute, the data of
    /// character data nodes and `None` otherwise.
    pub fn node_value(&self, node: Node) -> Option<&str> {
        match self.value(node) {
            Value::Attribute(attribute) => Some(attribute.value()),
            value => value.character_data(),
        }
    }

    /// The tag name of an element.
    pub fn tag_name(&self, node: Node) -> Option<Cow<str>> {
        self.element(node).map(|e| e.name.qualified_name())
    }

    /// The namespace URI of an element or attribute; empty for other nodes
    /// and for names without a namespace.
    pub fn namespace_uri(&self, node: Node) -> &str {
        self.value(node).qname().map_or("", |n| n.namespace_uri())
    }

    /// The prefix of an element or attribute; empty if there is none.
    pub fn prefix(&self, node: Node) -> &str {
        self.value(node).qname().map_or("", |n| n.prefix())
    }

    /// The local name of an element or attribute: the part after the
    /// prefix. Empty for other nodes.
    pub fn local_name(&self, node: Node) -> &str {
        self.value(node).qname().map_or("", |n| n.local_name())
    }

    /// The character data of text, CDATA, comment and processing
    /// instruction nodes.
    pub fn data(&self, node: Node) -> Option<&str> {
        self.value(node).character_data()
    }

    /// Replace the character data of a text, CDATA, comment or processing
    /// instruction node.
    ///
    /// Comments containing `--` and processing instruction data containing
    /// `?>` are rejected with [`Error::InvalidCharacter`].
    pub fn set_data(&mut self, node: Node, data: &str) -> Result<(), Error> {
        match self.value_mut(node) {
            Value::Text(text) | Value::CDataSection(text) => {
                text.set(data);
                Ok(())
            }
            Value::Comment(comment) => comment.set(data),
            Value::ProcessingInstruction(pi) => pi.set_data(data),
            _ => Err(Error::NotSupported(
                "node has no character data".to_string(),
            )),
        }
    }

    /// The target of a processing instruction.
    pub fn pi_target(&self, node: Node) -> Option<&str> {
        self.processing_instruction(node).map(|pi| pi.target())
    }

    // `value_mut` bypasses validation of comment and pi data
    pub(crate) fn check_character_data(value: &Value) -> Result<(), Error> {
        match value {
            Value::Comment(comment) => check_comment(comment.get()),
            Value::ProcessingInstruction(pi) => check_pi_data(pi.data()),
            _ => Ok(()),
        }
    }
}
