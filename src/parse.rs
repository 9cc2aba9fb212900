use std::io::Read;

use ahash::HashSet;
use log::trace;

use crate::config::Configuration;
use crate::domdata::{Dom, Node};
use crate::encoding::decode;
use crate::error::Error;
use crate::event::{Event, EventReader};
use crate::name::QName;
use crate::xmlvalue::{Comment, ProcessingInstruction, Text, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Prolog,
    InElement,
    Epilog,
}

fn is_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

// attributes must be unique by qualified name, and by expanded name when
// they are in a namespace
fn check_duplicates(attributes: &[(QName, String)]) -> Result<(), Error> {
    let mut qualified_names = HashSet::default();
    let mut expanded_names = HashSet::default();
    for (name, _) in attributes {
        if !qualified_names.insert(name.qualified_name()) {
            return Err(Error::InvalidCharacter(format!(
                "attribute {} appears twice",
                name.qualified_name()
            )));
        }
        if !name.namespace_uri().is_empty()
            && !expanded_names.insert((name.namespace_uri(), name.local_name()))
        {
            return Err(Error::NamespaceError(format!(
                "attribute {{{}}}{} appears twice",
                name.namespace_uri(),
                name.local_name()
            )));
        }
    }
    Ok(())
}

struct DocumentBuilder<'a> {
    dom: &'a mut Dom,
    config: &'a Configuration,
    document: Node,
    current: Node,
    state: State,
}

impl<'a> DocumentBuilder<'a> {
    fn new(dom: &'a mut Dom, config: &'a Configuration) -> Self {
        let document = dom.create_document();
        DocumentBuilder {
            dom,
            config,
            document,
            current: document,
            state: State::Prolog,
        }
    }

    fn transition(&mut self, state: State) {
        trace!("builder {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn append(&mut self, value: Value) -> Result<Node, Error> {
        let node = self.dom.new_owned(self.document, value);
        self.current
            .get()
            .checked_append(node.get(), self.dom.arena_mut())?;
        Ok(node)
    }

    fn build(mut self, mut reader: EventReader) -> Result<Node, Error> {
        while let Some(event) = reader.next_event()? {
            self.event(event)?;
        }
        match self.state {
            State::Epilog => Ok(self.document),
            _ => Err(Error::MalformedInput(
                "document has no document element".to_string(),
            )),
        }
    }

    fn event(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::Declaration {
                version,
                encoding,
                standalone,
            } => {
                if let Value::Document(document) = self.dom.value_mut(self.document) {
                    document.xml_version = Some(version);
                    document.xml_encoding = encoding;
                    document.xml_standalone = standalone;
                }
            }
            Event::Doctype {
                name,
                public_id,
                system_id,
                internal_subset,
            } => {
                if self.state != State::Prolog {
                    return Err(Error::HierarchyRequest(
                        "document type declaration after the document element".to_string(),
                    ));
                }
                let doctype = self.dom.new_document_type(
                    self.document,
                    &name,
                    &public_id,
                    &system_id,
                    &internal_subset,
                );
                self.document
                    .get()
                    .checked_append(doctype.get(), self.dom.arena_mut())?;
            }
            Event::StartElement { name, attributes } => {
                match self.state {
                    State::Prolog => self.transition(State::InElement),
                    State::InElement => {}
                    State::Epilog => {
                        return Err(Error::HierarchyRequest(
                            "document has more than one document element".to_string(),
                        ))
                    }
                }
                self.start_element(name, attributes)?;
            }
            Event::EndElement { .. } => {
                let parent = self.dom.parent_node(self.current).ok_or_else(|| {
                    Error::MalformedInput("end tag without a start tag".to_string())
                })?;
                self.current = parent;
                if parent == self.document {
                    self.transition(State::Epilog);
                }
            }
            Event::Chars(text) => self.chars(text)?,
            Event::CData(text) => {
                if self.config.cdata_sections {
                    self.append(Value::CDataSection(Text::new(text)))?;
                } else {
                    self.text(text)?;
                }
            }
            Event::Comment(text) => {
                if self.config.comments {
                    self.append(Value::Comment(Comment::new(text)))?;
                } else {
                    trace!("dropping comment");
                }
            }
            Event::ProcessingInstruction { target, data } => {
                // the XML declaration is not a processing instruction
                if target.eq_ignore_ascii_case("xml") {
                    trace!("dropping xml processing instruction");
                } else {
                    self.append(Value::ProcessingInstruction(ProcessingInstruction::new(
                        target, data,
                    )))?;
                }
            }
        }
        Ok(())
    }

    fn start_element(&mut self, name: QName, attributes: Vec<(QName, String)>) -> Result<(), Error> {
        check_duplicates(&attributes)?;
        let element = self.dom.new_element(self.document, name);
        self.current
            .get()
            .checked_append(element.get(), self.dom.arena_mut())?;
        for (name, value) in attributes {
            let attribute = self.dom.new_attribute(self.document, name, &value);
            self.dom.attach_attribute(element, attribute);
        }
        self.current = element;
        Ok(())
    }

    fn chars(&mut self, text: String) -> Result<(), Error> {
        match self.state {
            State::Prolog | State::Epilog if !is_whitespace(&text) => {
                let section = if self.state == State::Prolog {
                    "prolog"
                } else {
                    "trailing section"
                };
                Err(Error::HierarchyRequest(format!(
                    "content is not allowed in {}",
                    section
                )))
            }
            State::Prolog | State::Epilog => {
                trace!("discarding whitespace outside the document element");
                Ok(())
            }
            State::InElement => {
                if !self.config.element_content_whitespace && is_whitespace(&text) {
                    trace!("discarding element content whitespace");
                    return Ok(());
                }
                self.text(text)
            }
        }
    }

    // adjacent text ends up in a single node
    fn text(&mut self, text: String) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        if let Some(last) = self.dom.last_child(self.current) {
            if let Value::Text(previous) = self.dom.value_mut(last) {
                previous.text.push_str(&text);
                return Ok(());
            }
        }
        self.append(Value::Text(Text::new(text)))?;
        Ok(())
    }
}

/// ## Parsing
impl Dom {
    /// Parse a string containing an XML document, with the default
    /// [`Configuration`].
    ///
    /// The result is the document node. Its document element can be
    /// obtained with [`Dom::document_element`].
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<p xmlns="urn:x">Example</p>"#).unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.namespace_uri(p), "urn:x");
    /// assert_eq!(dom.text_content(p), "Example");
    /// ```
    pub fn parse(&mut self, xml: &str) -> Result<Node, Error> {
        self.parse_with_config(xml, &Configuration::default())
    }

    /// Parse a string with the given configuration.
    ///
    /// The `cdata-sections`, `comments`, `element-content-whitespace` and
    /// `namespaces` options affect parsing. Nothing is left behind in the
    /// `Dom` when parsing fails.
    pub fn parse_with_config(&mut self, xml: &str, config: &Configuration) -> Result<Node, Error> {
        let builder = DocumentBuilder::new(self, config);
        let document = builder.document;
        let result = builder.build(EventReader::new(xml, config.namespaces));
        if let Err(e) = &result {
            trace!("parse failed: {}", e);
            self.remove_subtree(document);
        }
        result
    }

    /// Parse bytes. The encoding is taken from a byte order mark or the XML
    /// declaration, and defaults to UTF-8.
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<Node, Error> {
        let xml = decode(bytes)?;
        self.parse(&xml)
    }

    /// Parse bytes with the given configuration.
    pub fn parse_bytes_with_config(
        &mut self,
        bytes: &[u8],
        config: &Configuration,
    ) -> Result<Node, Error> {
        let xml = decode(bytes)?;
        self.parse_with_config(&xml, config)
    }

    /// Read a document from a byte source and parse it.
    pub fn parse_reader(&mut self, mut reader: impl Read) -> Result<Node, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes)
    }

    // free a subtree including the attributes of its elements
    fn remove_subtree(&mut self, node: Node) {
        let attributes = self
            .descendants(node)
            .flat_map(|n| self.attributes(n))
            .collect::<Vec<_>>();
        for attribute in attributes {
            attribute.get().remove(self.arena_mut());
        }
        node.get().remove_subtree(self.arena_mut());
    }
}
