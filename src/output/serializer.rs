use genawaiter::rc::gen;
use genawaiter::yield_;

use crate::access::NodeEdge;
use crate::domdata::{Dom, Node};
use crate::xmlvalue::{Attribute, Document, DocumentType, Element, Value};

/// What a piece of serialized output represents in the XML tree.
///
/// The XML writer renders these into text; the pretty printer uses them to
/// decide on indentation and newlines.
#[derive(Debug)]
pub(crate) enum Output<'a> {
    /// `<?xml version="1.0" encoding="UTF-8"?>`
    XmlDeclaration(&'a Document),
    /// `<!DOCTYPE foo SYSTEM "foo.dtd">`
    DocumentType(&'a DocumentType),
    /// Start tag open, i.e `<foo` or `<ns:foo`
    StartTagOpen(&'a Element),
    /// Attribute node, i.e. `foo="bar"`, including namespace declarations
    Attribute(Node, &'a Attribute),
    /// Start tag close, either `>` or ` />`
    StartTagClose,
    /// End tag, i.e. `</foo>` or `</ns:foo>`
    EndTag(&'a Element),
    /// Text, i.e. `foo`
    Text(&'a str),
    /// CDATA section, i.e. `<![CDATA[foo]]>`
    CData(&'a str),
    /// Comment, i.e. `<!--foo-->`
    Comment(&'a str),
    /// Processing instruction, i.e. `<?foo bar?>`
    ProcessingInstruction(&'a str, &'a str),
}

pub(crate) fn gen_outputs(dom: &Dom, node: Node) -> impl Iterator<Item = (Node, Output)> + '_ {
    gen!({
        for edge in dom.traverse(node) {
            match edge {
                NodeEdge::Start(current_node) => {
                    let gen = gen_edge_start(dom, current_node);
                    for output in gen {
                        yield_!((current_node, output));
                    }
                }
                NodeEdge::End(current_node) => {
                    if let Value::Element(element) = dom.value(current_node) {
                        yield_!((current_node, Output::EndTag(element)));
                    }
                }
            }
        }
    })
    .into_iter()
}

fn gen_edge_start(dom: &Dom, node: Node) -> impl Iterator<Item = Output> + '_ {
    gen!({
        match dom.value(node) {
            Value::Document(document) => {
                yield_!(Output::XmlDeclaration(document));
            }
            Value::DocumentType(doctype) => {
                yield_!(Output::DocumentType(doctype));
            }
            Value::DocumentFragment => {}
            Value::Element(element) => {
                yield_!(Output::StartTagOpen(element));
                for attribute_node in element.attributes.iter() {
                    if let Some(attribute) = dom.attribute(attribute_node) {
                        yield_!(Output::Attribute(attribute_node, attribute));
                    }
                }
                yield_!(Output::StartTagClose);
            }
            // an attribute on its own is written as its value
            Value::Attribute(attribute) => {
                yield_!(Output::Text(attribute.value()));
            }
            Value::Text(text) => {
                yield_!(Output::Text(text.get()));
            }
            Value::CDataSection(text) => {
                yield_!(Output::CData(text.get()));
            }
            Value::Comment(comment) => {
                yield_!(Output::Comment(comment.get()));
            }
            Value::ProcessingInstruction(pi) => {
                yield_!(Output::ProcessingInstruction(pi.target(), pi.data()));
            }
        }
    })
    .into_iter()
}
