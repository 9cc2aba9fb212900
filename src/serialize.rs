use std::io::Write;

use crate::config::Configuration;
use crate::domdata::{Dom, Node};
use crate::error::Error;
#[cfg(feature = "icu")]
use crate::output::NfcNormalizer;
use crate::output::{gen_outputs, NoopNormalizer, Normalizer, XmlSerializer};

/// ## Serialization
impl Dom {
    /// Write a node and its descendants as UTF-8 XML.
    ///
    /// The XML declaration is only written when the node is a document.
    /// Namespace prefixes and declarations are worked out so that the
    /// output means the same as the tree; the tree itself isn't changed.
    ///
    /// Comments are written as `<!--data-->` with no space added around
    /// the data, so a comment's data is the same after parsing the output
    /// again.
    ///
    /// ```rust
    /// use xmldom::{Configuration, Dom};
    ///
    /// let mut dom = Dom::new();
    /// let doc = dom.create_document();
    /// let root = dom.create_element_ns(doc, "urn:doc", "root").unwrap();
    /// dom.append_child(doc, root).unwrap();
    ///
    /// let mut buf = Vec::new();
    /// dom.serialize(doc, &Configuration::default(), &mut buf).unwrap();
    /// assert_eq!(
    ///     String::from_utf8(buf).unwrap(),
    ///     r#"<?xml version="1.0" encoding="UTF-8"?><root xmlns="urn:doc" />"#
    /// );
    /// ```
    pub fn serialize(
        &self,
        node: Node,
        config: &Configuration,
        w: &mut impl Write,
    ) -> Result<(), Error> {
        #[cfg(feature = "icu")]
        if config.normalize_characters {
            return self.serialize_with::<NfcNormalizer>(node, config, w);
        }
        self.serialize_with::<NoopNormalizer>(node, config, w)
    }

    fn serialize_with<N: Normalizer>(
        &self,
        node: Node,
        config: &Configuration,
        w: &mut impl Write,
    ) -> Result<(), Error> {
        let mut serializer = XmlSerializer::<N>::new(self, config);
        let outputs = gen_outputs(self, node);
        if config.pretty_print {
            serializer.serialize_pretty(w, outputs)
        } else {
            serializer.serialize(w, outputs)
        }
    }

    /// Serialize a node to a string.
    pub fn serialize_to_string(&self, node: Node, config: &Configuration) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.serialize(node, config, &mut buf)?;
        // we only ever write UTF-8
        String::from_utf8(buf).map_err(|e| Error::MalformedInput(e.to_string()))
    }

    /// Serialize a node to a string with the default options, but without
    /// the XML declaration.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<a x="&lt;"><b/>text</a>"#).unwrap();
    /// assert_eq!(dom.to_string(doc).unwrap(), r#"<a x="&lt;"><b />text</a>"#);
    /// ```
    pub fn to_string(&self, node: Node) -> Result<String, Error> {
        let config = Configuration {
            omit_xml_declaration: true,
            ..Default::default()
        };
        self.serialize_to_string(node, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_declaration_only_for_documents() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a><b/></a>").unwrap();
        let config = Configuration::default();
        let a = dom.document_element(doc).unwrap();
        assert_eq!(
            dom.serialize_to_string(doc, &config).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?><a><b /></a>"#
        );
        assert_eq!(dom.serialize_to_string(a, &config).unwrap(), "<a><b /></a>");
    }

    #[test]
    fn test_standalone_kept() {
        let mut dom = Dom::new();
        let doc = dom
            .parse(r#"<?xml version="1.0" standalone="no"?><a/>"#)
            .unwrap();
        assert_snapshot!(
            dom.serialize_to_string(doc, &Configuration::default()).unwrap(),
            @r###"<?xml version="1.0" encoding="UTF-8" standalone="no"?><a />"###
        );
    }

    #[test]
    fn test_escaping() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let a = dom.create_element(doc, "a").unwrap();
        dom.append_child(doc, a).unwrap();
        dom.set_attribute(a, "v", "\"x\"\n<").unwrap();
        let t = dom.create_text_node(doc, "1 < 2 & 'q'");
        dom.append_child(a, t).unwrap();
        assert_snapshot!(
            dom.to_string(doc).unwrap(),
            @r###"<a v="&quot;x&quot;&#xA;&lt;">1 &lt; 2 &amp; &apos;q&apos;</a>"###
        );
    }

    #[test]
    fn test_cdata_split() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a/>").unwrap();
        let a = dom.document_element(doc).unwrap();
        let cdata = dom.create_cdata_section(doc, "x]]>y");
        dom.append_child(a, cdata).unwrap();
        assert_snapshot!(
            dom.to_string(doc).unwrap(),
            @"<a><![CDATA[x]]]]><![CDATA[>y]]></a>"
        );
    }

    #[test]
    fn test_doctype() {
        let mut dom = Dom::new();
        let doc = dom
            .parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "x.dtd"><html/>"#)
            .unwrap();
        assert_snapshot!(
            dom.to_string(doc).unwrap(),
            @r###"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "x.dtd"><html />"###
        );
    }

    #[test]
    fn test_namespace_declarations_off() {
        let mut dom = Dom::new();
        let doc = dom
            .parse(r#"<p:a xmlns:p="urn:p" xmlns="urn:d"><b/></p:a>"#)
            .unwrap();
        let config = Configuration {
            namespace_declarations: false,
            omit_xml_declaration: true,
            ..Default::default()
        };
        assert_eq!(
            dom.serialize_to_string(doc, &config).unwrap(),
            "<p:a><b /></p:a>"
        );
    }

    #[test]
    fn test_namespaces_off_writes_names_as_is() {
        let mut dom = Dom::new();
        let config = Configuration {
            namespaces: false,
            omit_xml_declaration: true,
            ..Default::default()
        };
        let doc = dom
            .parse_with_config(r#"<p:a xmlns:q="urn:q"><p:b/></p:a>"#, &config)
            .unwrap();
        assert_eq!(
            dom.serialize_to_string(doc, &config).unwrap(),
            r#"<p:a xmlns:q="urn:q"><p:b /></p:a>"#
        );
    }

    #[test]
    fn test_subtree_gets_declarations() {
        let mut dom = Dom::new();
        let doc = dom
            .parse(r#"<a xmlns:p="urn:p"><p:b p:x="1"/></a>"#)
            .unwrap();
        let a = dom.document_element(doc).unwrap();
        let b = dom.first_child(a).unwrap();
        assert_eq!(
            dom.to_string(b).unwrap(),
            r#"<p:b xmlns:p="urn:p" p:x="1" />"#
        );
    }

    #[test]
    fn test_comment_data_unpadded() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a><!--x--><!-- y --></a>").unwrap();
        let a = dom.document_element(doc).unwrap();
        let output = dom.to_string(a).unwrap();
        assert_eq!(output, "<a><!--x--><!-- y --></a>");
        let reparsed = dom.parse(&output).unwrap();
        let a = dom.document_element(reparsed).unwrap();
        let comment = dom.first_child(a).unwrap();
        assert_eq!(dom.node_value(comment), Some("x"));
    }

    #[test]
    fn test_invalid_comment_is_fatal() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a><!--ok--></a>").unwrap();
        let a = dom.document_element(doc).unwrap();
        let comment = dom.first_child(a).unwrap();
        if let crate::Value::Comment(c) = dom.value_mut(comment) {
            c.text = "a--b".to_string();
        }
        assert!(matches!(
            dom.to_string(doc),
            Err(Error::InvalidCharacter(_))
        ));
    }

    #[cfg(feature = "icu")]
    #[test]
    fn test_normalize_characters() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a>e\u{301}</a>").unwrap();
        let mut config = Configuration::default();
        config.omit_xml_declaration = true;
        config.set_parameter("normalize-characters", true).unwrap();
        assert_eq!(
            dom.serialize_to_string(doc, &config).unwrap(),
            "<a>\u{e9}</a>"
        );
    }
}
