use crate::domdata::Node;
use crate::error::Error;
use crate::name::{check_name, QName};
use crate::nodemap::NamedNodeMap;

/// The kind of a node, with the DOM integer codes.
///
/// This is the one canonical enumeration of node kinds; get its code with
/// [`NodeType::code`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NodeType {
    /// An element.
    Element,
    /// An attribute. Attributes are owned by an element but are not its
    /// children.
    Attribute,
    /// Text.
    Text,
    /// A CDATA section.
    CDataSection,
    /// Reserved; never constructed by this crate.
    EntityReference,
    /// A processing instruction.
    ProcessingInstruction,
    /// A comment.
    Comment,
    /// The document node. Note that this is not the same as the document
    /// element.
    Document,
    /// A document type declaration.
    DocumentType,
    /// A document fragment.
    DocumentFragment,
}

impl NodeType {
    /// The DOM `nodeType` code.
    pub fn code(&self) -> u16 {
        match self {
            NodeType::Element => 1,
            NodeType::Attribute => 2,
            NodeType::Text => 3,
            NodeType::CDataSection => 4,
            NodeType::EntityReference => 5,
            NodeType::ProcessingInstruction => 7,
            NodeType::Comment => 8,
            NodeType::Document => 9,
            NodeType::DocumentType => 10,
            NodeType::DocumentFragment => 11,
        }
    }
}

/// The payload of a node.
///
/// Access it using [`Dom::value`](crate::Dom::value).
#[derive(Debug, Clone)]
pub enum Value {
    /// The document node that holds everything.
    Document(Document),
    /// `<!DOCTYPE ...>`
    DocumentType(DocumentType),
    /// A container whose children are moved on insertion.
    DocumentFragment,
    /// Element; it has a name and attributes.
    Element(Element),
    /// Attribute; it has a name, a value and possibly an owner element.
    Attribute(Attribute),
    /// Text.
    Text(Text),
    /// CDATA section. Same payload as text.
    CDataSection(Text),
    /// Comment.
    Comment(Comment),
    /// Processing instruction.
    ProcessingInstruction(ProcessingInstruction),
}

impl Value {
    /// Returns the type of the value.
    pub fn node_type(&self) -> NodeType {
        match self {
            Value::Document(_) => NodeType::Document,
            Value::DocumentType(_) => NodeType::DocumentType,
            Value::DocumentFragment => NodeType::DocumentFragment,
            Value::Element(_) => NodeType::Element,
            Value::Attribute(_) => NodeType::Attribute,
            Value::Text(_) => NodeType::Text,
            Value::CDataSection(_) => NodeType::CDataSection,
            Value::Comment(_) => NodeType::Comment,
            Value::ProcessingInstruction(_) => NodeType::ProcessingInstruction,
        }
    }

    pub(crate) fn qname(&self) -> Option<&QName> {
        match self {
            Value::Element(element) => Some(&element.name),
            Value::Attribute(attribute) => Some(&attribute.name),
            _ => None,
        }
    }

    // the character data of text-like values
    pub(crate) fn character_data(&self) -> Option<&str> {
        match self {
            Value::Text(text) | Value::CDataSection(text) => Some(text.get()),
            Value::Comment(comment) => Some(comment.get()),
            Value::ProcessingInstruction(pi) => Some(pi.data()),
            _ => None,
        }
    }
}

/// Information about the document taken from its XML declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub(crate) xml_version: Option<String>,
    pub(crate) xml_encoding: Option<String>,
    pub(crate) xml_standalone: Option<bool>,
}

impl Document {
    /// The version from the XML declaration, if any.
    pub fn xml_version(&self) -> Option<&str> {
        self.xml_version.as_deref()
    }

    /// The encoding from the XML declaration, if any.
    pub fn xml_encoding(&self) -> Option<&str> {
        self.xml_encoding.as_deref()
    }

    /// The standalone flag from the XML declaration, if any.
    pub fn xml_standalone(&self) -> Option<bool> {
        self.xml_standalone
    }
}

/// A document type declaration. Its internal subset is kept verbatim and
/// never expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    pub(crate) name: String,
    pub(crate) public_id: String,
    pub(crate) system_id: String,
    pub(crate) internal_subset: String,
}

impl DocumentType {
    /// The name of the document element this declaration applies to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Public identifier; empty if absent.
    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    /// System identifier; empty if absent.
    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// The internal subset as written, without the brackets.
    pub fn internal_subset(&self) -> &str {
        &self.internal_subset
    }
}

/// XML element value.
///
/// Example: `<foo/>` or `<foo bar="baz"/>`.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) name: QName,
    pub(crate) attributes: NamedNodeMap,
}

impl Element {
    pub(crate) fn new(name: QName) -> Self {
        Element {
            name,
            attributes: NamedNodeMap::new(),
        }
    }

    /// The name of the element.
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// The tag name: `prefix:localName` or `localName`.
    pub fn tag_name(&self) -> String {
        self.name.qualified_name().into_owned()
    }

    /// The attribute nodes of this element.
    pub fn attributes(&self) -> &NamedNodeMap {
        &self.attributes
    }
}

/// XML attribute value.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub(crate) name: QName,
    pub(crate) value: String,
    pub(crate) owner_element: Option<Node>,
}

impl Attribute {
    pub(crate) fn new(name: QName, value: String) -> Self {
        Attribute {
            name,
            value,
            owner_element: None,
        }
    }

    /// The name of the attribute.
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// The attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The element that owns this attribute, if any.
    pub fn owner_element(&self) -> Option<Node> {
        self.owner_element
    }

    /// Is this a namespace declaration (`xmlns` or `xmlns:*`)?
    pub fn is_namespace_declaration(&self) -> bool {
        self.name.is_declaration()
    }
}

/// XML text value.
///
/// Example: `Bar` in `<foo>Bar</foo>`.
#[derive(Debug, Clone)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    /// Get the text value.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Set the text value.
    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }
}

pub(crate) fn check_comment(text: &str) -> Result<(), Error> {
    if text.contains("--") || text.ends_with('-') {
        return Err(Error::InvalidCharacter(format!(
            "comment {:?} contains \"--\" or ends with \"-\"",
            text
        )));
    }
    Ok(())
}

/// XML comment.
///
/// Example: `<!-- foo -->`.
#[derive(Debug, Clone)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    /// Get the comment text.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Set the comment text.
    ///
    /// Rejects comments that contain `--` as illegal.
    pub fn set<S: Into<String>>(&mut self, text: S) -> Result<(), Error> {
        let text = text.into();
        check_comment(&text)?;
        self.text = text;
        Ok(())
    }
}

pub(crate) fn check_pi_target(target: &str) -> Result<(), Error> {
    check_name(target)?;
    if target.eq_ignore_ascii_case("xml") {
        return Err(Error::InvalidCharacter(format!(
            "processing instruction target {:?} is reserved",
            target
        )));
    }
    Ok(())
}

pub(crate) fn check_pi_data(data: &str) -> Result<(), Error> {
    if data.contains("?>") {
        return Err(Error::InvalidCharacter(format!(
            "processing instruction data {:?} contains \"?>\"",
            data
        )));
    }
    Ok(())
}

/// XML processing instruction value.
///
/// Example: `<?foo?>` or `<?foo bar?>`.
#[derive(Debug, Clone)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: String,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: String) -> Self {
        ProcessingInstruction { target, data }
    }

    /// Get processing instruction target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get processing instruction data. Empty if there is none.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Set data.
    ///
    /// Rejects data that contains `?>`.
    pub fn set_data<S: Into<String>>(&mut self, data: S) -> Result<(), Error> {
        let data = data.into();
        check_pi_data(&data)?;
        self.data = data;
        Ok(())
    }
}
