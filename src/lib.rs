#![forbid(unsafe_code)]
//! A namespace-aware XML document object model.
//!
//! All nodes live in a [`Dom`] and are referred to by [`Node`] handles.
//! Documents are parsed with [`Dom::parse`] or built with the `create_*`
//! factories, manipulated with the DOM Level 3 Core operations and written
//! out again with [`Dom::serialize`], which works out the namespace
//! declarations the output needs.
//!
//! ```rust
//! use xmldom::Dom;
//!
//! let mut dom = Dom::new();
//! let doc = dom.parse(r#"<p:a xmlns:p="urn:p"><b/></p:a>"#).unwrap();
//! let a = dom.document_element(doc).unwrap();
//! assert_eq!(dom.namespace_uri(a), "urn:p");
//!
//! let c = dom.create_element_ns(doc, "urn:p", "p:c").unwrap();
//! dom.append_child(a, c).unwrap();
//! assert_eq!(
//!     dom.to_string(doc).unwrap(),
//!     r#"<p:a xmlns:p="urn:p"><b /><p:c /></p:a>"#
//! );
//! ```

mod access;
mod attributes;
mod clone;
mod compare;
mod config;
mod creation;
mod domdata;
mod encoding;
mod entity;
mod error;
mod event;
pub mod fixed;
mod manipulation;
mod name;
mod namespace;
mod nodemap;
mod output;
mod parse;
#[cfg(feature = "proptest")]
pub mod proptest;
mod serialize;
mod valueaccess;
mod xmlvalue;

pub use access::NodeEdge;
pub use config::{Configuration, Parameter};
pub use domdata::{Dom, Node};
pub use error::Error;
pub use name::{is_valid_name, is_valid_name_bytes, QName, XMLNS_NAMESPACE, XML_NAMESPACE};
pub use nodemap::NamedNodeMap;
pub use xmlvalue::{
    Attribute, Comment, Document, DocumentType, Element, NodeType, ProcessingInstruction, Text,
    Value,
};
