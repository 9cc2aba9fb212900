use std::io;
use std::marker::PhantomData;

use crate::config::Configuration;
use crate::domdata::{Dom, Node};
use crate::entity::{serialize_attribute, serialize_text};
use crate::error::Error;
use crate::output::Normalizer;
use crate::xmlvalue::{Attribute, DocumentType, Element};

use super::fullname::{qualified, ElementNames, NamespaceNormalizer};
use super::{Output, Pretty};

pub(crate) struct XmlSerializer<'a, N: Normalizer> {
    dom: &'a Dom,
    config: &'a Configuration,
    namespaces: NamespaceNormalizer<'a>,
    // the names decided for the open elements
    names: Vec<ElementNames>,
    normalizer: PhantomData<N>,
}

impl<'a, N: Normalizer> XmlSerializer<'a, N> {
    pub(crate) fn new(dom: &'a Dom, config: &'a Configuration) -> Self {
        Self {
            dom,
            config,
            namespaces: NamespaceNormalizer::new(dom),
            names: Vec::new(),
            normalizer: PhantomData,
        }
    }

    pub(crate) fn serialize<W: io::Write>(
        &mut self,
        w: &mut W,
        outputs: impl Iterator<Item = (Node, Output<'a>)>,
    ) -> Result<(), Error> {
        for (node, output) in outputs {
            if let Some(text) = self.render_output(node, &output)? {
                w.write_all(text.as_bytes())?;
            }
        }
        Ok(())
    }

    pub(crate) fn serialize_pretty<W: io::Write>(
        &mut self,
        w: &mut W,
        outputs: impl Iterator<Item = (Node, Output<'a>)>,
    ) -> Result<(), Error> {
        let mut pretty = Pretty::new(self.dom);
        for (node, output) in outputs {
            let (indentation, newline) = pretty.prettify(node, &output);
            // suppressed tokens take no room at all
            let Some(text) = self.render_output(node, &output)? else {
                continue;
            };
            if indentation > 0 {
                w.write_all(self.config.indent_character.repeat(indentation).as_bytes())?;
            }
            w.write_all(text.as_bytes())?;
            if newline {
                w.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn element_name(&self, element: &Element) -> String {
        match self.names.last() {
            Some(names) if self.config.namespaces => {
                qualified(&names.prefix, element.name.local_name())
            }
            _ => element.tag_name(),
        }
    }

    fn start_tag_open(&mut self, node: Node, element: &Element) -> Result<String, Error> {
        let names = if self.config.namespaces {
            self.namespaces.push(node)?
        } else {
            ElementNames::default()
        };
        self.names.push(names);
        let mut text = format!("<{}", self.element_name(element));
        if self.config.namespaces && self.config.namespace_declarations {
            if let Some(names) = self.names.last() {
                for (name, namespace) in names.declaration_attributes() {
                    text.push_str(&format!(
                        " {}=\"{}\"",
                        name,
                        serialize_attribute(namespace)
                    ));
                }
            }
        }
        Ok(text)
    }

    fn attribute(&self, node: Node, attribute: &Attribute) -> Option<String> {
        let name = if attribute.is_namespace_declaration() {
            // declarations were decided at the start tag
            if self.config.namespaces || !self.config.namespace_declarations {
                return None;
            }
            attribute.name.qualified_name().into_owned()
        } else if self.config.namespaces {
            let prefix = self.names.last().and_then(|names| {
                names
                    .attributes
                    .iter()
                    .find(|(a, _)| *a == node)
                    .map(|(_, prefix)| prefix.as_str())
            });
            match prefix {
                Some(prefix) => qualified(prefix, attribute.name.local_name()),
                None => attribute.name.qualified_name().into_owned(),
            }
        } else {
            attribute.name.qualified_name().into_owned()
        };
        let value = N::normalize(attribute.value());
        Some(format!(" {}=\"{}\"", name, serialize_attribute(&value)))
    }

    fn document_type(doctype: &DocumentType) -> String {
        let mut text = format!("<!DOCTYPE {}", doctype.name());
        if !doctype.public_id().is_empty() {
            text.push_str(&format!(
                " PUBLIC \"{}\" \"{}\"",
                doctype.public_id(),
                doctype.system_id()
            ));
        } else if !doctype.system_id().is_empty() {
            text.push_str(&format!(" SYSTEM \"{}\"", doctype.system_id()));
        }
        if !doctype.internal_subset().is_empty() {
            text.push_str(&format!(" [{}]", doctype.internal_subset()));
        }
        text.push('>');
        text
    }

    /// The text for an output token, or `None` if nothing is written for
    /// it.
    pub(crate) fn render_output(
        &mut self,
        node: Node,
        output: &Output<'a>,
    ) -> Result<Option<String>, Error> {
        use Output::*;
        let r = match output {
            XmlDeclaration(document) => {
                if self.config.omit_xml_declaration {
                    return Ok(None);
                }
                let mut text = format!(
                    "<?xml version=\"{}\" encoding=\"UTF-8\"",
                    document.xml_version().unwrap_or("1.0")
                );
                if let Some(standalone) = document.xml_standalone() {
                    text.push_str(if standalone {
                        " standalone=\"yes\""
                    } else {
                        " standalone=\"no\""
                    });
                }
                text.push_str("?>");
                text
            }
            DocumentType(doctype) => Self::document_type(doctype),
            StartTagOpen(element) => self.start_tag_open(node, element)?,
            Attribute(attribute_node, attribute) => match self.attribute(*attribute_node, attribute) {
                Some(text) => text,
                None => return Ok(None),
            },
            StartTagClose => {
                if self.dom.first_child(node).is_none() {
                    " />".to_string()
                } else {
                    ">".to_string()
                }
            }
            EndTag(element) => {
                let r = if self.dom.first_child(node).is_some() {
                    format!("</{}>", self.element_name(element))
                } else {
                    "".to_string()
                };
                self.names.pop();
                if self.config.namespaces {
                    self.namespaces.pop();
                }
                r
            }
            Text(text) => serialize_text(&N::normalize(text)).into_owned(),
            CData(text) => {
                let text = N::normalize(text);
                format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
            }
            Comment(text) => {
                Dom::check_character_data(self.dom.value(node))?;
                format!("<!--{}-->", text)
            }
            ProcessingInstruction(target, data) => {
                Dom::check_character_data(self.dom.value(node))?;
                if data.is_empty() {
                    format!("<?{}?>", target)
                } else {
                    format!("<?{} {}?>", target, data)
                }
            }
        };
        Ok(Some(r))
    }
}
