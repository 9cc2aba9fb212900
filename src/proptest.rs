//! Proptest support for xmldom
//!
//! Proptests allow you to test for *properties* of your code that must hold
//! for arbitrary data. This module helps you write a proptest by letting you
//! generate an arbitrary XML document as a [`fixed::Document`](crate::fixed::Document),
//! which you can then build into a [`Dom`](crate::Dom).
//!
//! This can be enabled by adding the `proptest` feature to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! xmldom = { version = "0.1", features = ["proptest"] }
//! ```
//!
//! See the [`proptest`](https://docs.rs/proptest/latest/proptest/)
//! documentation for more information.

use ahash::HashSet;
use proptest::prelude::*;

use crate::fixed::{Content, Document, DocumentContent, Element, Name, ProcessingInstruction};

const NAMESPACES: &[&str] = &["", "http://example.com/x", "http://example.com/y"];
const PREFIXES: &[&str] = &["", "x", "y"];
const ELEMENT_NAMES: &[&str] = &["a", "b", "c", "d", "e"];
const ATTRIBUTE_NAMES: &[&str] = &["q", "r", "s"];
const PI_NAMES: &[&str] = &["pi1", "pi2", "pi3", "pi4", "pi5"];
// any XML character
const XML_STRING: &str = "[\t\n\r\u{20}-\u{D7FF}\u{E000}-\u{FFFD}]{0,16}";
// no '-', so no "--" and no trailing '-'
const COMMENT_STRING: &str = "[\t\n\u{20}-\u{2C}\u{2E}-\u{D7FF}\u{E000}-\u{FFFD}]{0,16}";
// no '?' and no whitespace, so no "?>" and nothing a parser would trim
const PI_STRING: &str = "[\u{21}-\u{3E}\u{40}-\u{7E}]{0,8}";
// a carriage return in a CDATA section reads back as a newline
const CDATA_STRING: &str = "[\t\n\u{20}-\u{D7FF}\u{E000}-\u{FFFD}]{0,16}";

fn arb_name(names: &'static [&'static str]) -> impl Strategy<Value = Name> {
    (
        prop::sample::select(names),
        prop::sample::select(NAMESPACES),
        prop::sample::select(PREFIXES),
    )
        .prop_map(|(localname, namespace, prefix)| {
            // a prefix needs a namespace to be bound to
            let prefix = if namespace.is_empty() { "" } else { prefix };
            Name::new(namespace, prefix, localname)
        })
}

fn arb_attribute() -> impl Strategy<Value = (Name, String)> {
    (arb_name(ATTRIBUTE_NAMES), XML_STRING)
}

fn arb_comment() -> impl Strategy<Value = String> {
    COMMENT_STRING
}

fn arb_processing_instruction() -> impl Strategy<Value = ProcessingInstruction> {
    (prop::sample::select(PI_NAMES), PI_STRING).prop_map(|(target, data)| {
        ProcessingInstruction {
            target: target.to_string(),
            data,
        }
    })
}

fn arb_content() -> impl Strategy<Value = Content> {
    let leaf = prop_oneof![
        XML_STRING.prop_map(Content::Text),
        CDATA_STRING.prop_map(Content::CData),
        arb_comment().prop_map(Content::Comment),
        arb_processing_instruction().prop_map(Content::ProcessingInstruction),
    ];

    leaf.prop_recursive(
        8,   // levels deep
        256, // maximum size of 256 nodes
        10,  // up to 10 items per collection
        |inner| {
            (
                arb_name(ELEMENT_NAMES),
                prop::collection::vec(inner, 0..10),
                prop::collection::vec(arb_attribute(), 0..4),
            )
                .prop_map(|(name, children, attributes)| {
                    Content::Element(Element {
                        name,
                        attributes: unduplicate_attributes(attributes),
                        children,
                    })
                })
        },
    )
}

prop_compose! {
    fn arb_element()(name in arb_name(ELEMENT_NAMES),
                     children in prop::collection::vec(arb_content(), 0..4),
                     attributes in prop::collection::vec(arb_attribute(), 0..4)) -> Element {
        Element {
            name,
            attributes: unduplicate_attributes(attributes),
            children,
        }
    }
}

// an element can't have two attributes with the same expanded name
fn unduplicate_attributes(attributes: Vec<(Name, String)>) -> Vec<(Name, String)> {
    let mut seen = HashSet::default();
    attributes
        .into_iter()
        .filter(|(name, _)| seen.insert((name.namespace.clone(), name.localname.clone())))
        .collect()
}

fn arb_document_content() -> impl Strategy<Value = DocumentContent> {
    prop_oneof![
        arb_comment().prop_map(DocumentContent::Comment),
        arb_processing_instruction().prop_map(DocumentContent::ProcessingInstruction),
    ]
}

/// Generate a random XML document.
///
/// This produces a value that can be built into a [`Dom`](crate::Dom)
/// node using its `build` method. Every generated document can be built
/// without error.
///
/// Example:
///
/// ```notrust
/// use proptest::prelude::*;
/// use xmldom::proptest::arb_document;
/// use xmldom::Dom;
///
/// proptest! {
///   #[test]
///   fn test_serialize_parse(fixed in arb_document()) {
///     let mut dom = Dom::new();
///     let node = fixed.build(&mut dom).unwrap();
///     let serialized = dom.to_string(node).unwrap();
///     let parsed = dom.parse(&serialized);
///     prop_assert!(parsed.is_ok(), "Cannot parse: {:?}", serialized);
///   }
/// }
/// ```
pub fn arb_document() -> impl Strategy<Value = Document> {
    let before = prop::collection::vec(arb_document_content(), 0..4);
    let after = prop::collection::vec(arb_document_content(), 0..4);
    (before, arb_element(), after).prop_map(|(before, document_element, after)| Document {
        before,
        document_element,
        after,
    })
}
