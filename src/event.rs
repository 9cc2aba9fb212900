// turns xmlparser tokens into a flat stream of events for the builder.
// attributes are gathered until the start tag closes, references are
// expanded and names are resolved against the namespace declarations in
// scope.

use std::collections::VecDeque;

use xmlparser::{ElementEnd, ExternalId, StrSpan, Token, Tokenizer};

use crate::entity::{normalize_line_ends, parse_references};
use crate::error::Error;
use crate::name::{QName, XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::output::qualified;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Declaration {
        version: String,
        encoding: Option<String>,
        standalone: Option<bool>,
    },
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
        internal_subset: String,
    },
    StartElement {
        name: QName,
        attributes: Vec<(QName, String)>,
    },
    EndElement {
        name: QName,
    },
    Chars(String),
    CData(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

// a start tag whose attributes are still being read
struct StartTag<'a> {
    prefix: &'a str,
    local: &'a str,
    attributes: Vec<(&'a str, &'a str, String)>,
}

struct OpenElement {
    written: String,
    name: QName,
    // how many bindings were in scope before this element
    scope_length: usize,
}

struct DoctypeStart {
    name: String,
    public_id: String,
    system_id: String,
    subset_start: usize,
}

pub(crate) struct EventReader<'a> {
    xml: &'a str,
    tokenizer: Tokenizer<'a>,
    namespaces: bool,
    bindings: Vec<(String, String)>,
    open: Vec<OpenElement>,
    start_tag: Option<StartTag<'a>>,
    doctype: Option<DoctypeStart>,
    pending: VecDeque<Event>,
    failure: Option<Error>,
    // end of the last token that was read successfully
    position: usize,
    root_closed: bool,
    done: bool,
}

fn external_ids(external_id: Option<ExternalId>) -> (String, String) {
    match external_id {
        Some(ExternalId::System(system)) => (String::new(), system.as_str().to_string()),
        Some(ExternalId::Public(public, system)) => {
            (public.as_str().to_string(), system.as_str().to_string())
        }
        None => (String::new(), String::new()),
    }
}

fn token_end(token: &Token) -> usize {
    let span: &StrSpan = match token {
        Token::Declaration { span, .. }
        | Token::ProcessingInstruction { span, .. }
        | Token::Comment { span, .. }
        | Token::DtdStart { span, .. }
        | Token::EmptyDtd { span, .. }
        | Token::EntityDeclaration { span, .. }
        | Token::DtdEnd { span }
        | Token::ElementStart { span, .. }
        | Token::Attribute { span, .. }
        | Token::ElementEnd { span, .. }
        | Token::Cdata { span, .. } => span,
        Token::Text { text } => text,
    };
    span.end()
}

// Namespaces in XML constraints on a single declaration
fn check_declaration(prefix: &str, namespace: &str) -> Result<(), Error> {
    if prefix == "xmlns" {
        return Err(Error::NamespaceError(
            "the xmlns prefix cannot be declared".to_string(),
        ));
    }
    if namespace == XMLNS_NAMESPACE {
        return Err(Error::NamespaceError(
            "the XMLNS namespace cannot be declared".to_string(),
        ));
    }
    if (prefix == "xml") != (namespace == XML_NAMESPACE) {
        return Err(Error::NamespaceError(
            "the xml prefix and the XML namespace must be used together".to_string(),
        ));
    }
    if !prefix.is_empty() && namespace.is_empty() {
        return Err(Error::NamespaceError(format!(
            "prefix {:?} cannot be undeclared",
            prefix
        )));
    }
    Ok(())
}

impl<'a> EventReader<'a> {
    pub(crate) fn new(xml: &'a str, namespaces: bool) -> Self {
        EventReader {
            xml,
            tokenizer: Tokenizer::from(xml),
            namespaces,
            bindings: Vec::new(),
            open: Vec::new(),
            start_tag: None,
            doctype: None,
            pending: VecDeque::new(),
            failure: None,
            position: 0,
            root_closed: false,
            done: false,
        }
    }

    fn namespace_by_prefix(&self, prefix: &str) -> &str {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map_or("", |(_, ns)| ns.as_str())
    }

    fn resolve(&self, prefix: &str, local: &str, is_element: bool) -> Result<QName, Error> {
        if !self.namespaces {
            return Ok(QName::plain(&qualified(prefix, local)));
        }
        let namespace = match prefix {
            "" if is_element => self.namespace_by_prefix(""),
            "" => "",
            "xml" => XML_NAMESPACE,
            "xmlns" if is_element => {
                return Err(Error::NamespaceError(format!(
                    "element {}:{} uses the xmlns prefix",
                    prefix, local
                )))
            }
            _ => {
                let namespace = self.namespace_by_prefix(prefix);
                if namespace.is_empty() {
                    return Err(Error::NamespaceError(format!(
                        "prefix {:?} is not bound",
                        prefix
                    )));
                }
                namespace
            }
        };
        Ok(QName::new(namespace, prefix, local))
    }

    fn attribute_name(&self, prefix: &str, local: &str) -> Result<QName, Error> {
        if self.namespaces {
            if prefix == "xmlns" {
                return Ok(QName::new(XMLNS_NAMESPACE, "xmlns", local));
            }
            if prefix.is_empty() && local == "xmlns" {
                return Ok(QName::new(XMLNS_NAMESPACE, "", "xmlns"));
            }
        }
        self.resolve(prefix, local, false)
    }

    fn open_element(&mut self, start_tag: StartTag<'a>) -> Result<Event, Error> {
        let scope_length = self.bindings.len();
        if self.namespaces {
            for (prefix, local, value) in &start_tag.attributes {
                let declared = match (*prefix, *local) {
                    ("xmlns", local) => local,
                    ("", "xmlns") => "",
                    _ => continue,
                };
                check_declaration(declared, value)?;
                self.bindings.push((declared.to_string(), value.clone()));
            }
        }
        let name = self.resolve(start_tag.prefix, start_tag.local, true)?;
        let mut attributes = Vec::with_capacity(start_tag.attributes.len());
        for (prefix, local, value) in start_tag.attributes {
            attributes.push((self.attribute_name(prefix, local)?, value));
        }
        self.open.push(OpenElement {
            written: qualified(start_tag.prefix, start_tag.local),
            name: name.clone(),
            scope_length,
        });
        Ok(Event::StartElement { name, attributes })
    }

    fn close_element(&mut self, written: Option<String>) -> Result<Event, Error> {
        let open = self.open.pop().ok_or_else(|| {
            Error::MalformedInput("end tag without a start tag".to_string())
        })?;
        if let Some(written) = written {
            if written != open.written {
                return Err(Error::MalformedInput(format!(
                    "expected </{}>, found </{}>",
                    open.written, written
                )));
            }
        }
        self.bindings.truncate(open.scope_length);
        if self.open.is_empty() {
            self.root_closed = true;
        }
        Ok(Event::EndElement { name: open.name })
    }

    fn process_token(&mut self, token: Token<'a>) -> Result<(), Error> {
        match token {
            Token::Declaration {
                version,
                encoding,
                standalone,
                ..
            } => {
                self.pending.push_back(Event::Declaration {
                    version: version.as_str().to_string(),
                    encoding: encoding.map(|e| e.as_str().to_string()),
                    standalone,
                });
            }
            Token::ProcessingInstruction {
                target, content, ..
            } => {
                self.pending.push_back(Event::ProcessingInstruction {
                    target: target.as_str().to_string(),
                    data: content
                        .map(|c| normalize_line_ends(c.as_str()).into_owned())
                        .unwrap_or_default(),
                });
            }
            Token::Comment { text, .. } => {
                self.pending.push_back(Event::Comment(
                    normalize_line_ends(text.as_str()).into_owned(),
                ));
            }
            Token::DtdStart {
                name,
                external_id,
                span,
            } => {
                let (public_id, system_id) = external_ids(external_id);
                self.doctype = Some(DoctypeStart {
                    name: name.as_str().to_string(),
                    public_id,
                    system_id,
                    subset_start: span.end(),
                });
            }
            Token::EmptyDtd {
                name, external_id, ..
            } => {
                let (public_id, system_id) = external_ids(external_id);
                self.pending.push_back(Event::Doctype {
                    name: name.as_str().to_string(),
                    public_id,
                    system_id,
                    internal_subset: String::new(),
                });
            }
            Token::DtdEnd { span } => {
                if let Some(doctype) = self.doctype.take() {
                    let subset = self
                        .xml
                        .get(doctype.subset_start..span.start())
                        .unwrap_or_default();
                    let subset = subset.strip_prefix('[').unwrap_or(subset);
                    self.pending.push_back(Event::Doctype {
                        name: doctype.name,
                        public_id: doctype.public_id,
                        system_id: doctype.system_id,
                        internal_subset: normalize_line_ends(subset).into_owned(),
                    });
                }
            }
            // entities are not expanded; any reference to them fails later
            Token::EntityDeclaration { .. } => {}
            Token::ElementStart { prefix, local, .. } => {
                self.start_tag = Some(StartTag {
                    prefix: prefix.as_str(),
                    local: local.as_str(),
                    attributes: Vec::new(),
                });
            }
            Token::Attribute {
                prefix,
                local,
                value,
                ..
            } => {
                let value = parse_references(value.as_str(), true)?.into_owned();
                if let Some(start_tag) = self.start_tag.as_mut() {
                    start_tag
                        .attributes
                        .push((prefix.as_str(), local.as_str(), value));
                }
            }
            Token::ElementEnd { end, .. } => match end {
                ElementEnd::Open | ElementEnd::Empty => {
                    let start_tag = self.start_tag.take().ok_or_else(|| {
                        Error::MalformedInput("start tag end without a start tag".to_string())
                    })?;
                    let event = self.open_element(start_tag)?;
                    self.pending.push_back(event);
                    if matches!(end, ElementEnd::Empty) {
                        let event = self.close_element(None)?;
                        self.pending.push_back(event);
                    }
                }
                ElementEnd::Close(prefix, local) => {
                    let event =
                        self.close_element(Some(qualified(prefix.as_str(), local.as_str())))?;
                    self.pending.push_back(event);
                }
            },
            Token::Text { text } => {
                let text = parse_references(text.as_str(), false)?.into_owned();
                self.pending.push_back(Event::Chars(text));
            }
            Token::Cdata { text, .. } => {
                self.pending.push_back(Event::CData(
                    normalize_line_ends(text.as_str()).into_owned(),
                ));
            }
        }
        Ok(())
    }

    // xmlparser refuses text outside the document element outright. hand
    // such text to the builder as characters so it can say where the
    // content was; the tokenizer error follows it.
    fn stray_text(&self) -> Option<String> {
        if !self.open.is_empty() || self.start_tag.is_some() {
            return None;
        }
        let rest = self.xml.get(self.position..)?.trim_start();
        if rest.is_empty() || rest.starts_with('<') {
            return None;
        }
        let text = rest.split('<').next().unwrap_or(rest);
        Some(text.to_string())
    }

    // xmlparser also refuses a second element after the document element
    fn second_root(&self) -> bool {
        if !self.root_closed || !self.open.is_empty() {
            return false;
        }
        let rest = self.xml.get(self.position..).unwrap_or_default().trim_start();
        rest.strip_prefix('<')
            .and_then(|r| r.chars().next())
            .map_or(false, |c| c != '!' && c != '?' && c != '/')
    }

    /// The next event, `None` at the end of the input.
    pub(crate) fn next_event(&mut self) -> Result<Option<Event>, Error> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            if let Some(failure) = self.failure.take() {
                return Err(failure);
            }
            if self.done {
                return Ok(None);
            }
            match self.tokenizer.next() {
                None => {
                    self.done = true;
                    if let Some(open) = self.open.last() {
                        return Err(Error::MalformedInput(format!(
                            "element <{}> is not closed",
                            open.written
                        )));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    if self.second_root() {
                        self.failure = Some(Error::HierarchyRequest(
                            "document has more than one document element".to_string(),
                        ));
                        continue;
                    }
                    if let Some(text) = self.stray_text() {
                        self.pending.push_back(Event::Chars(text));
                    }
                    self.failure = Some(e.into());
                }
                Some(Ok(token)) => {
                    self.position = token_end(&token);
                    if let Err(e) = self.process_token(token) {
                        self.done = true;
                        return Err(e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(xml: &str) -> Result<Vec<Event>, Error> {
        let mut reader = EventReader::new(xml, true);
        let mut events = Vec::new();
        while let Some(event) = reader.next_event()? {
            events.push(event);
        }
        Ok(events)
    }

    #[test]
    fn test_empty_element_gives_start_and_end() {
        let events = events(r#"<a b="B"/>"#).unwrap();
        assert_eq!(
            events,
            vec![
                Event::StartElement {
                    name: QName::plain("a"),
                    attributes: vec![(QName::plain("b"), "B".to_string())],
                },
                Event::EndElement {
                    name: QName::plain("a")
                },
            ]
        );
    }

    #[test]
    fn test_namespace_resolution() {
        let events = events(r#"<p:a xmlns:p="urn:p" p:x="1"><b/></p:a>"#).unwrap();
        match &events[0] {
            Event::StartElement { name, attributes } => {
                assert_eq!(name, &QName::new("urn:p", "p", "a"));
                assert_eq!(attributes[0].0, QName::new(XMLNS_NAMESPACE, "xmlns", "p"));
                assert_eq!(attributes[1].0, QName::new("urn:p", "p", "x"));
            }
            _ => unreachable!(),
        }
        match &events[1] {
            Event::StartElement { name, .. } => assert_eq!(name, &QName::plain("b")),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_default_namespace_not_on_attributes() {
        let events = events(r#"<a xmlns="urn:d" x="1"/>"#).unwrap();
        match &events[0] {
            Event::StartElement { name, attributes } => {
                assert_eq!(name.namespace_uri(), "urn:d");
                assert_eq!(attributes[1].0, QName::plain("x"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_unbound_prefix() {
        assert!(matches!(events("<p:a/>"), Err(Error::NamespaceError(_))));
        assert!(matches!(
            events(r#"<a p:x="1"/>"#),
            Err(Error::NamespaceError(_))
        ));
    }

    #[test]
    fn test_namespaces_off_keeps_names() {
        let mut reader = EventReader::new("<p:a/>", false);
        match reader.next_event().unwrap() {
            Some(Event::StartElement { name, .. }) => {
                assert_eq!(name, QName::plain("p:a"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(matches!(
            events("<a><b></a></b>"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_unclosed_element() {
        assert!(matches!(events("<a><b></b>"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_references_expanded() {
        let events = events("<a>x &lt; &#x79;</a>").unwrap();
        assert_eq!(events[1], Event::Chars("x < y".to_string()));
    }

    #[test]
    fn test_stray_text_in_prolog() {
        let mut reader = EventReader::new("<?xml version=\"1.0\"?>\ninvalid.\n<root/>", true);
        assert!(matches!(
            reader.next_event().unwrap(),
            Some(Event::Declaration { .. })
        ));
        assert_eq!(
            reader.next_event().unwrap(),
            Some(Event::Chars("invalid.\n".to_string()))
        );
        assert!(reader.next_event().is_err());
    }

    #[test]
    fn test_doctype() {
        let events = events(
            r#"<!DOCTYPE a SYSTEM "a.dtd" [<!ENTITY e "x">]><a/>"#,
        )
        .unwrap();
        assert_eq!(
            events[0],
            Event::Doctype {
                name: "a".to_string(),
                public_id: "".to_string(),
                system_id: "a.dtd".to_string(),
                internal_subset: r#"<!ENTITY e "x">"#.to_string(),
            }
        );
    }
}
