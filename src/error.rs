use std::fmt;

/// Errors raised by tree operations, the parser and the serializer.
///
/// This is a closed set modelled after the DOM exception codes. Use
/// [`Error::code`] to obtain the DOM code where there is one.
#[derive(Debug)]
pub enum Error {
    /// A structural constraint was violated: wrong parent kind, a second
    /// document element, a cycle, or content outside the document element.
    HierarchyRequest(String),
    /// A node was used in a document that did not create it. Use
    /// [`Dom::import_node`](crate::Dom::import_node) or
    /// [`Dom::adopt_node`](crate::Dom::adopt_node) first.
    WrongDocument,
    /// The node is not a child (or attribute) of the node it was looked up
    /// in, or a configuration parameter is unknown.
    NotFound(String),
    /// A name does not match the XML `Name` production, or character data
    /// contains a forbidden sequence (`--` in a comment, `?>` in a
    /// processing instruction).
    InvalidCharacter(String),
    /// The requested operation or feature is not supported.
    NotSupported(String),
    /// The attribute is already owned by another element.
    AttributeInUse,
    /// A namespace constraint could not be satisfied.
    NamespaceError(String),
    /// The input could not be tokenized as XML.
    MalformedInput(String),
    /// Reading the input or writing the output failed.
    Io(std::io::Error),
}

impl Error {
    /// The DOM exception code for this error, if it has one.
    ///
    /// ```rust
    /// use xmldom::Error;
    ///
    /// assert_eq!(Error::WrongDocument.code(), Some(4));
    /// assert_eq!(Error::MalformedInput("oops".into()).code(), None);
    /// ```
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::HierarchyRequest(_) => Some(3),
            Error::WrongDocument => Some(4),
            Error::InvalidCharacter(_) => Some(5),
            Error::NotFound(_) => Some(8),
            Error::NotSupported(_) => Some(9),
            Error::AttributeInUse => Some(10),
            Error::NamespaceError(_) => Some(14),
            Error::MalformedInput(_) | Error::Io(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HierarchyRequest(s) => write!(f, "HierarchyRequest: {}", s),
            Error::WrongDocument => write!(f, "WrongDocument: node is used in a different document"),
            Error::NotFound(s) => write!(f, "NotFound: {}", s),
            Error::InvalidCharacter(s) => write!(f, "InvalidCharacter: {}", s),
            Error::NotSupported(s) => write!(f, "NotSupported: {}", s),
            Error::AttributeInUse => write!(f, "AttributeInUse: attribute is owned by another element"),
            Error::NamespaceError(s) => write!(f, "NamespaceError: {}", s),
            Error::MalformedInput(s) => write!(f, "MalformedInput: {}", s),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::MalformedInput(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<indextree::NodeError> for Error {
    #[inline]
    fn from(e: indextree::NodeError) -> Self {
        Error::HierarchyRequest(e.to_string())
    }
}
