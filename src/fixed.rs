//! A fixed representation of an XML document.
//!
//! A [`Dom`] tree is mutable and its nodes only mean something together
//! with the `Dom` that holds them. The types in this module describe a
//! document as plain values that can be created and stored separately, and
//! then built into a tree with `.build`.
//!
//! ```rust
//! use xmldom::fixed;
//!
//! let document = fixed::Document {
//!     before: vec![],
//!     document_element: fixed::Element {
//!         name: fixed::Name::new("", "", "foo"),
//!         attributes: vec![],
//!         children: vec![fixed::Content::Text("Example".to_string())],
//!     },
//!     after: vec![],
//! };
//!
//! let mut dom = xmldom::Dom::new();
//! let node = document.build(&mut dom).unwrap();
//! assert_eq!(dom.to_string(node).unwrap(), "<foo>Example</foo>");
//! ```

use crate::domdata::{Dom, Node};
use crate::error::Error;

/// A fixed representation of an XML document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    /// Comments and processing instructions before the document element
    pub before: Vec<DocumentContent>,
    /// The document element
    pub document_element: Element,
    /// Comments and processing instructions after the document element
    pub after: Vec<DocumentContent>,
}

/// A fixed representation of a namespaced XML name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    /// Namespace URI. Empty string means no namespace
    pub namespace: String,
    /// Preferred prefix. Empty string means no prefix
    pub prefix: String,
    /// Local name
    pub localname: String,
}

/// A fixed representation of an XML element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    /// Name of element
    pub name: Name,
    /// Attributes
    pub attributes: Vec<(Name, String)>,
    /// Children
    pub children: Vec<Content>,
}

/// A fixed representation of element content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Content {
    /// A text node
    Text(String),
    /// A CDATA section
    CData(String),
    /// A comment node
    Comment(String),
    /// A processing instruction node
    ProcessingInstruction(ProcessingInstruction),
    /// An element node
    Element(Element),
}

/// Content that is allowed next to the document element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentContent {
    /// A comment node
    Comment(String),
    /// A processing instruction node
    ProcessingInstruction(ProcessingInstruction),
}

/// A fixed representation of a processing instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessingInstruction {
    /// Target of processing instruction
    pub target: String,
    /// Data of processing instruction; may be empty
    pub data: String,
}

impl Name {
    /// Make a name from namespace URI, prefix and local name.
    pub fn new(namespace: &str, prefix: &str, localname: &str) -> Self {
        Name {
            namespace: namespace.to_string(),
            prefix: prefix.to_string(),
            localname: localname.to_string(),
        }
    }

    /// The name as written with its prefix.
    pub fn qualified_name(&self) -> String {
        if self.prefix.is_empty() {
            self.localname.clone()
        } else {
            format!("{}:{}", self.prefix, self.localname)
        }
    }
}

impl Document {
    /// Build a document node in the given `Dom`.
    pub fn build(&self, dom: &mut Dom) -> Result<Node, Error> {
        let document = dom.create_document();
        for content in &self.before {
            let node = content.build(dom, document)?;
            dom.append_child(document, node)?;
        }
        let element = self.document_element.build(dom, document)?;
        dom.append_child(document, element)?;
        for content in &self.after {
            let node = content.build(dom, document)?;
            dom.append_child(document, node)?;
        }
        Ok(document)
    }
}

impl Element {
    /// Build an element node owned by `doc`.
    pub fn build(&self, dom: &mut Dom, doc: Node) -> Result<Node, Error> {
        let element = dom.create_element_ns(doc, &self.name.namespace, &self.name.qualified_name())?;
        for (name, value) in &self.attributes {
            dom.set_attribute_ns(element, &name.namespace, &name.qualified_name(), value)?;
        }
        for child in &self.children {
            let node = child.build(dom, doc)?;
            dom.append_child(element, node)?;
        }
        Ok(element)
    }
}

impl ProcessingInstruction {
    /// Build a processing instruction node owned by `doc`.
    pub fn build(&self, dom: &mut Dom, doc: Node) -> Result<Node, Error> {
        dom.create_processing_instruction(doc, &self.target, &self.data)
    }
}

impl Content {
    fn build(&self, dom: &mut Dom, doc: Node) -> Result<Node, Error> {
        match self {
            Content::Text(text) => Ok(dom.create_text_node(doc, text)),
            Content::CData(text) => Ok(dom.create_cdata_section(doc, text)),
            Content::Comment(comment) => dom.create_comment(doc, comment),
            Content::ProcessingInstruction(pi) => pi.build(dom, doc),
            Content::Element(element) => element.build(dom, doc),
        }
    }
}

impl DocumentContent {
    fn build(&self, dom: &mut Dom, doc: Node) -> Result<Node, Error> {
        match self {
            DocumentContent::Comment(comment) => dom.create_comment(doc, comment),
            DocumentContent::ProcessingInstruction(pi) => pi.build(dom, doc),
        }
    }
}
