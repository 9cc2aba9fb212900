use std::borrow::Cow;

use crate::error::Error;

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// The namespace of namespace declaration attributes (`xmlns`, `xmlns:*`).
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

// sorted, non-overlapping ranges of the XML 1.0 (5th edition) NameStartChar
const NAME_START_RANGES: &[(u32, u32)] = &[
    (0x3A, 0x3A),
    (0x41, 0x5A),
    (0x5F, 0x5F),
    (0x61, 0x7A),
    (0xC0, 0xD6),
    (0xD8, 0xF6),
    (0xF8, 0x2FF),
    (0x370, 0x37D),
    (0x37F, 0x1FFF),
    (0x200C, 0x200D),
    (0x2070, 0x218F),
    (0x2C00, 0x2FEF),
    (0x3001, 0xD7FF),
    (0xF900, 0xFDCF),
    (0xFDF0, 0xFFFD),
    (0x10000, 0xEFFFF),
];

// NameChar additions on top of NameStartChar
const NAME_RANGES: &[(u32, u32)] = &[
    (0x2D, 0x2E),
    (0x30, 0x39),
    (0xB7, 0xB7),
    (0x300, 0x36F),
    (0x203F, 0x2040),
];

fn in_ranges(ranges: &[(u32, u32)], c: char) -> bool {
    let c = c as u32;
    ranges
        .binary_search_by(|&(start, end)| {
            if c < start {
                std::cmp::Ordering::Greater
            } else if c > end {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Is this character allowed as the first character of an XML name?
pub fn is_name_start_char(c: char) -> bool {
    in_ranges(NAME_START_RANGES, c)
}

/// Is this character allowed after the first character of an XML name?
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || in_ranges(NAME_RANGES, c)
}

/// Check whether a string matches the XML `Name` production.
///
/// ```rust
/// use xmldom::is_valid_name;
///
/// assert!(is_valid_name("foo"));
/// assert!(is_valid_name("svg:rect"));
/// assert!(!is_valid_name("1abc"));
/// assert!(!is_valid_name(""));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// Like [`is_valid_name`], but for raw bytes. Invalid UTF-8 is rejected.
pub fn is_valid_name_bytes(name: &[u8]) -> bool {
    std::str::from_utf8(name).map_or(false, is_valid_name)
}

pub(crate) fn check_name(name: &str) -> Result<(), Error> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidCharacter(format!("invalid XML name: {:?}", name)))
    }
}

/// The expanded name of an element or attribute, together with the prefix
/// it is written with.
///
/// Nodes created without namespace processing have an empty namespace and
/// prefix; their whole name is stored as the local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QName {
    pub(crate) namespace_uri: String,
    pub(crate) prefix: String,
    pub(crate) local_name: String,
}

impl QName {
    pub(crate) fn new(namespace_uri: &str, prefix: &str, local_name: &str) -> Self {
        QName {
            namespace_uri: namespace_uri.to_string(),
            prefix: prefix.to_string(),
            local_name: local_name.to_string(),
        }
    }

    /// A name without namespace processing.
    pub(crate) fn plain(name: &str) -> Self {
        QName::new("", "", name)
    }

    /// Validate and split a qualified name, checking the namespace
    /// constraints of Namespaces in XML.
    ///
    /// The name must be an XML name with at most one colon separating
    /// two non-empty parts. The `xml` prefix only binds the XML namespace
    /// and `xmlns` only binds the XMLNS namespace.
    pub(crate) fn parse(namespace_uri: &str, qualified_name: &str) -> Result<Self, Error> {
        check_name(qualified_name)?;
        let (prefix, local_name) = split_qualified_name(qualified_name)?;
        if !prefix.is_empty() && namespace_uri.is_empty() {
            return Err(Error::NamespaceError(format!(
                "prefix {:?} used without a namespace",
                prefix
            )));
        }
        if prefix == "xml" && namespace_uri != XML_NAMESPACE {
            return Err(Error::NamespaceError(
                "the xml prefix can only be bound to the XML namespace".to_string(),
            ));
        }
        let is_xmlns = prefix == "xmlns" || qualified_name == "xmlns";
        if is_xmlns != (namespace_uri == XMLNS_NAMESPACE) {
            return Err(Error::NamespaceError(format!(
                "{:?} and the XMLNS namespace must be used together",
                qualified_name
            )));
        }
        Ok(QName::new(namespace_uri, prefix, local_name))
    }

    /// The namespace URI; empty if the name is not in a namespace.
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// The prefix; empty if there is none.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The part of the name after the prefix.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The name as written: `prefix:localName` or `localName`.
    pub fn qualified_name(&self) -> Cow<str> {
        if self.prefix.is_empty() {
            Cow::Borrowed(&self.local_name)
        } else {
            Cow::Owned(format!("{}:{}", self.prefix, self.local_name))
        }
    }

    /// For a namespace declaration attribute, the prefix it declares. The
    /// default namespace declaration (`xmlns`) declares the empty prefix.
    pub(crate) fn declared_prefix(&self) -> Option<&str> {
        if self.prefix == "xmlns" {
            return Some(&self.local_name);
        }
        if self.prefix.is_empty() {
            if self.local_name == "xmlns" {
                return Some("");
            }
            // created without namespace processing
            return self.local_name.strip_prefix("xmlns:");
        }
        None
    }

    pub(crate) fn is_declaration(&self) -> bool {
        self.declared_prefix().is_some()
    }
}

/// Split a qualified name into prefix and local name.
///
/// Two colons, a leading or trailing colon, or an empty part are rejected.
pub(crate) fn split_qualified_name(qualified_name: &str) -> Result<(&str, &str), Error> {
    let mut parts = qualified_name.split(':');
    let first = parts.next().unwrap_or_default();
    let (prefix, local_name) = match (parts.next(), parts.next()) {
        (None, _) => ("", first),
        (Some(second), None) => (first, second),
        (Some(_), Some(_)) => {
            return Err(Error::InvalidCharacter(format!(
                "qualified name {:?} has more than one colon",
                qualified_name
            )))
        }
    };
    if local_name.is_empty() || (qualified_name.contains(':') && prefix.is_empty()) {
        return Err(Error::InvalidCharacter(format!(
            "qualified name {:?} has an empty part",
            qualified_name
        )));
    }
    if !local_name.chars().next().map_or(false, is_name_start_char) {
        return Err(Error::InvalidCharacter(format!(
            "local name of {:?} does not start with a name character",
            qualified_name
        )));
    }
    Ok((prefix, local_name))
}
