use crate::error::Error;

/// The value of a configuration parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// A flag.
    Bool(bool),
    /// A string such as the indentation.
    String(String),
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Parameter::Bool(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::String(value.to_string())
    }
}

/// Options for parsing and serialization.
///
/// Every option has a DOM parameter name that can be used with
/// [`Configuration::set_parameter`] and [`Configuration::get_parameter`].
///
/// ```rust
/// use xmldom::{Configuration, Parameter};
///
/// let mut config = Configuration::default();
/// config.set_parameter("format-pretty-print", true).unwrap();
/// assert!(config.pretty_print);
/// assert_eq!(
///     config.get_parameter("xml-declaration").unwrap(),
///     Parameter::Bool(true)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Configuration {
    /// `cdata-sections`: keep CDATA sections as their own nodes when
    /// parsing. Otherwise their content becomes text.
    pub cdata_sections: bool,
    /// `comments`: keep comments when parsing.
    pub comments: bool,
    /// `element-content-whitespace`: keep text nodes that consist only of
    /// whitespace when parsing.
    pub element_content_whitespace: bool,
    /// `namespaces`: process namespaces when parsing and normalize them
    /// when serializing. Otherwise names are taken as written.
    pub namespaces: bool,
    /// `namespace-declarations`: write `xmlns` attributes.
    pub namespace_declarations: bool,
    /// `normalize-characters`: apply Unicode NFC to text and attribute
    /// values when serializing. Needs the `icu` feature.
    pub normalize_characters: bool,
    /// The inverse of `xml-declaration`: don't write the XML declaration.
    pub omit_xml_declaration: bool,
    /// `format-pretty-print`: indent the output.
    pub pretty_print: bool,
    /// `indent-character`: the indentation per level when pretty printing.
    pub indent_character: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            cdata_sections: true,
            comments: true,
            element_content_whitespace: true,
            namespaces: true,
            namespace_declarations: true,
            normalize_characters: false,
            omit_xml_declaration: false,
            pretty_print: false,
            indent_character: "    ".to_string(),
        }
    }
}

const PARAMETER_NAMES: &[&str] = &[
    "cdata-sections",
    "comments",
    "element-content-whitespace",
    "namespaces",
    "namespace-declarations",
    "normalize-characters",
    "xml-declaration",
    "format-pretty-print",
    "indent-character",
];

impl Configuration {
    /// The names of the recognized parameters.
    pub fn parameter_names() -> &'static [&'static str] {
        PARAMETER_NAMES
    }

    /// Get a parameter by its DOM name. Names are case-insensitive.
    pub fn get_parameter(&self, name: &str) -> Result<Parameter, Error> {
        let value = match name.to_ascii_lowercase().as_str() {
            "cdata-sections" => self.cdata_sections,
            "comments" => self.comments,
            "element-content-whitespace" => self.element_content_whitespace,
            "namespaces" => self.namespaces,
            "namespace-declarations" => self.namespace_declarations,
            "normalize-characters" => self.normalize_characters,
            "xml-declaration" => !self.omit_xml_declaration,
            "format-pretty-print" => self.pretty_print,
            "indent-character" => return Ok(Parameter::String(self.indent_character.clone())),
            _ => return Err(Error::NotFound(format!("unknown parameter {:?}", name))),
        };
        Ok(Parameter::Bool(value))
    }

    /// Set a parameter by its DOM name.
    ///
    /// An unknown name is [`Error::NotFound`]; a value of the wrong type,
    /// or a value this build can't honour, is [`Error::NotSupported`].
    pub fn set_parameter(&mut self, name: &str, value: impl Into<Parameter>) -> Result<(), Error> {
        let value = value.into();
        self.check_parameter(name, &value)?;
        let lower = name.to_ascii_lowercase();
        match (lower.as_str(), value) {
            ("indent-character", Parameter::String(s)) => self.indent_character = s,
            (name, Parameter::Bool(b)) => {
                let field = match name {
                    "cdata-sections" => &mut self.cdata_sections,
                    "comments" => &mut self.comments,
                    "element-content-whitespace" => &mut self.element_content_whitespace,
                    "namespaces" => &mut self.namespaces,
                    "namespace-declarations" => &mut self.namespace_declarations,
                    "normalize-characters" => &mut self.normalize_characters,
                    "format-pretty-print" => &mut self.pretty_print,
                    "xml-declaration" => {
                        self.omit_xml_declaration = !b;
                        return Ok(());
                    }
                    _ => return Err(Error::NotFound(format!("unknown parameter {:?}", name))),
                };
                *field = b;
            }
            (name, _) => {
                return Err(Error::NotSupported(format!(
                    "wrong value type for parameter {:?}",
                    name
                )))
            }
        }
        Ok(())
    }

    /// Could this parameter be set to this value?
    pub fn can_set_parameter(&self, name: &str, value: impl Into<Parameter>) -> bool {
        self.check_parameter(name, &value.into()).is_ok()
    }

    fn check_parameter(&self, name: &str, value: &Parameter) -> Result<(), Error> {
        let lower = name.to_ascii_lowercase();
        if !PARAMETER_NAMES.contains(&lower.as_str()) {
            return Err(Error::NotFound(format!("unknown parameter {:?}", name)));
        }
        match (lower.as_str(), value) {
            ("indent-character", Parameter::String(_)) => Ok(()),
            ("indent-character", _) | (_, Parameter::String(_)) => Err(Error::NotSupported(
                format!("wrong value type for parameter {:?}", name),
            )),
            ("normalize-characters", Parameter::Bool(true)) if !cfg!(feature = "icu") => {
                Err(Error::NotSupported(
                    "normalize-characters needs the icu feature".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}
