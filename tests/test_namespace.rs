use proptest::prelude::*;

use xmldom::{Dom, Error, XMLNS_NAMESPACE, XML_NAMESPACE};

#[test]
fn test_lookup_namespace_uri() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(r#"<a xmlns="urn:d" xmlns:p="urn:p"><b xmlns:p="urn:q"><c/></b></a>"#)
        .unwrap();
    let a = dom.document_element(doc).unwrap();
    let b = dom.first_child(a).unwrap();
    let c = dom.first_child(b).unwrap();
    assert_eq!(dom.lookup_namespace_uri(c, "p"), Some("urn:q"));
    assert_eq!(dom.lookup_namespace_uri(c, ""), Some("urn:d"));
    assert_eq!(dom.lookup_namespace_uri(a, "p"), Some("urn:p"));
    assert_eq!(dom.lookup_namespace_uri(c, "unknown"), None);
    assert_eq!(dom.lookup_namespace_uri(c, "xml"), Some(XML_NAMESPACE));
}

#[test]
fn test_lookup_from_attribute() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<a xmlns:p="urn:p" p:x="1"/>"#).unwrap();
    let a = dom.document_element(doc).unwrap();
    let x = dom.get_attribute_node_ns(a, "urn:p", "x").unwrap();
    assert_eq!(dom.lookup_namespace_uri(x, "p"), Some("urn:p"));
    assert_eq!(dom.lookup_prefix(x, "urn:p"), Some("p"));
}

#[test]
fn test_lookup_uses_element_names() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let a = dom.create_element_ns(doc, "urn:p", "p:a").unwrap();
    dom.append_child(doc, a).unwrap();
    let b = dom.create_element(doc, "b").unwrap();
    dom.append_child(a, b).unwrap();
    assert_eq!(dom.lookup_namespace_uri(b, "p"), Some("urn:p"));
    assert_eq!(dom.lookup_prefix(b, "urn:p"), Some("p"));
}

#[test]
fn test_in_scope_namespaces() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(r#"<a xmlns="urn:d" xmlns:p="urn:p"><b xmlns="" xmlns:q="urn:q"/></a>"#)
        .unwrap();
    let a = dom.document_element(doc).unwrap();
    let b = dom.first_child(a).unwrap();
    let namespaces = dom.in_scope_namespaces(b);
    let mut entries = namespaces
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect::<Vec<_>>();
    entries.sort();
    assert_eq!(
        entries,
        vec![("p", "urn:p"), ("q", "urn:q"), ("xml", XML_NAMESPACE)]
    );
}

#[test]
fn test_declaration_attributes_are_in_xmlns_namespace() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<a xmlns="urn:d" xmlns:p="urn:p"/>"#).unwrap();
    let a = dom.document_element(doc).unwrap();
    for attribute in dom.attributes(a) {
        assert_eq!(dom.namespace_uri(attribute), XMLNS_NAMESPACE);
    }
    assert_eq!(dom.get_attribute_ns(a, XMLNS_NAMESPACE, "p"), Some("urn:p"));
    assert_eq!(dom.get_attribute_ns(a, XMLNS_NAMESPACE, "xmlns"), Some("urn:d"));
}

#[test]
fn test_normalize_namespaces_adds_declarations() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let root = dom.create_element_ns(doc, "urn:a", "root").unwrap();
    dom.append_child(doc, root).unwrap();
    let child = dom.create_element_ns(doc, "urn:b", "child").unwrap();
    dom.append_child(root, child).unwrap();
    dom.set_attribute_ns(child, "urn:c", "x", "1").unwrap();

    dom.normalize_namespaces(doc).unwrap();

    assert_eq!(dom.get_attribute(root, "xmlns"), Some("urn:a"));
    // the default namespace is taken, so the child gets a prefix
    assert_eq!(dom.prefix(child), "NS1");
    assert_eq!(dom.get_attribute(child, "xmlns:NS1"), Some("urn:b"));
    let x = dom.get_attribute_node_ns(child, "urn:c", "x").unwrap();
    assert_eq!(dom.prefix(x), "NS2");
    assert_eq!(dom.get_attribute(child, "xmlns:NS2"), Some("urn:c"));

    // the declarations in the tree are enough on their own
    let config = xmldom::Configuration {
        namespaces: false,
        omit_xml_declaration: true,
        ..Default::default()
    };
    let raw = dom.serialize_to_string(doc, &config).unwrap();
    let reparsed = dom.parse(&raw).unwrap();
    assert!(dom.compare(doc, reparsed), "{}", raw);
}

#[test]
fn test_normalize_namespaces_is_idempotent() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(r#"<a xmlns:p="urn:p"><p:b xmlns:p="urn:q"/></a>"#)
        .unwrap();
    let a = dom.document_element(doc).unwrap();
    let c = dom.create_element_ns(doc, "urn:p", "p:c").unwrap();
    let b = dom.first_child(a).unwrap();
    dom.append_child(b, c).unwrap();

    dom.normalize_namespaces(doc).unwrap();
    let once = dom.to_string(doc).unwrap();
    dom.normalize_namespaces(doc).unwrap();
    assert_eq!(dom.to_string(doc).unwrap(), once);
    assert_eq!(dom.lookup_namespace_uri(c, dom.prefix(c)), Some("urn:p"));
}

#[test]
fn test_create_element_ns_errors() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    assert!(matches!(
        dom.create_element_ns(doc, "", "p:a"),
        Err(Error::NamespaceError(_))
    ));
    assert!(matches!(
        dom.create_element_ns(doc, "urn:x", "xml:a"),
        Err(Error::NamespaceError(_))
    ));
    assert!(matches!(
        dom.create_element_ns(doc, "urn:x", "a:b:c"),
        Err(Error::InvalidCharacter(_))
    ));
    assert!(matches!(
        dom.create_element_ns(doc, "urn:x", "1a"),
        Err(Error::InvalidCharacter(_))
    ));
    assert!(dom.create_element_ns(doc, XML_NAMESPACE, "xml:a").is_ok());
}

const PREFIXES: &[&str] = &["a", "b", "c"];
const NAMESPACES: &[&str] = &["urn:1", "urn:2", "urn:3"];

proptest! {
    #[test]
    fn test_lookup_finds_nearest_declaration(
        levels in prop::collection::vec(
            prop::option::of((prop::sample::select(PREFIXES), prop::sample::select(NAMESPACES))),
            1..8,
        )
    ) {
        let mut xml = String::new();
        for (depth, declaration) in levels.iter().enumerate() {
            match declaration {
                Some((prefix, namespace)) => {
                    xml.push_str(&format!("<e{} xmlns:{}=\"{}\">", depth, prefix, namespace))
                }
                None => xml.push_str(&format!("<e{}>", depth)),
            }
        }
        for depth in (0..levels.len()).rev() {
            xml.push_str(&format!("</e{}>", depth));
        }

        let mut dom = Dom::new();
        let doc = dom.parse(&xml).unwrap();
        let deepest = dom.descendants(doc).last().unwrap();
        for prefix in PREFIXES {
            let expected = levels
                .iter()
                .rev()
                .flatten()
                .find(|(p, _)| p == prefix)
                .map(|(_, namespace)| *namespace);
            prop_assert_eq!(dom.lookup_namespace_uri(deepest, prefix), expected);
        }
    }
}
