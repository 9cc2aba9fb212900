use xmldom::{Configuration, Dom, Error};

#[test]
fn test_prolog_content_rejected() {
    let mut dom = Dom::new();
    let err = dom
        .parse("<?xml version=\"1.0\"?>\n\ninvalid.\n<root/>")
        .unwrap_err();
    assert!(matches!(err, Error::HierarchyRequest(_)));
    assert_eq!(
        err.to_string(),
        "HierarchyRequest: content is not allowed in prolog"
    );
}

#[test]
fn test_trailing_content_rejected() {
    let mut dom = Dom::new();
    let err = dom
        .parse("<?xml version=\"1.0\"?><a/>trailing")
        .unwrap_err();
    assert!(matches!(err, Error::HierarchyRequest(_)));
    assert_eq!(
        err.to_string(),
        "HierarchyRequest: content is not allowed in trailing section"
    );
}

#[test]
fn test_leading_trailing_whitespace_permitted() {
    let mut dom = Dom::new();
    let doc = dom.parse("<?xml version=\"1.0\"?>\n\n<w/>\n\n").unwrap();
    let children = dom.child_nodes(doc);
    assert_eq!(children.len(), 1);
    assert_eq!(dom.tag_name(children[0]).unwrap(), "w");
}

const SHADOWING: &str =
    r#"<r xmlns:p="urn:a"><p:x xmlns:p="urn:b"><p:y xmlns:p="urn:c"/></p:x><p:x/></r>"#;

#[test]
fn test_nested_same_prefix_shadowing() {
    let mut dom = Dom::new();
    let doc = dom.parse(SHADOWING).unwrap();
    let r = dom.document_element(doc).unwrap();
    let first_x = dom.first_child(r).unwrap();
    let y = dom.first_child(first_x).unwrap();
    let second_x = dom.last_child(r).unwrap();

    assert_eq!(dom.namespace_uri(r), "");
    assert_eq!(dom.namespace_uri(first_x), "urn:b");
    assert_eq!(dom.namespace_uri(y), "urn:c");
    assert_eq!(dom.namespace_uri(second_x), "urn:a");
}

#[test]
fn test_default_namespace_pretty_printed() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let root = dom.create_element_ns(doc, "urn:doc", "rootElement").unwrap();
    dom.append_child(doc, root).unwrap();
    let child = dom.create_element_ns(doc, "urn:doc", "childElement").unwrap();
    dom.append_child(root, child).unwrap();
    let text = dom.create_text_node(doc, "text");
    dom.append_child(child, text).unwrap();

    let config = Configuration {
        pretty_print: true,
        namespace_declarations: true,
        ..Default::default()
    };
    assert_eq!(
        dom.serialize_to_string(doc, &config).unwrap(),
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<rootElement xmlns=\"urn:doc\">\n",
            "    <childElement>text</childElement>\n",
            "</rootElement>\n"
        )
    );
}

#[test]
fn test_default_namespace_pretty_printed_empty_child() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let root = dom.create_element_ns(doc, "urn:doc", "rootElement").unwrap();
    dom.append_child(doc, root).unwrap();
    let child = dom.create_element_ns(doc, "urn:doc", "childElement").unwrap();
    dom.append_child(root, child).unwrap();

    let config = Configuration {
        pretty_print: true,
        ..Default::default()
    };
    assert_eq!(
        dom.serialize_to_string(doc, &config).unwrap(),
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<rootElement xmlns=\"urn:doc\">\n",
            "    <childElement />\n",
            "</rootElement>\n"
        )
    );
}

#[test]
fn test_synthetic_prefix_generation() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let outer = dom.create_element_ns(doc, "urn:y", "outer").unwrap();
    dom.append_child(doc, outer).unwrap();
    let e = dom.create_element_ns(doc, "urn:x", "e").unwrap();
    dom.append_child(outer, e).unwrap();

    assert_eq!(
        dom.to_string(doc).unwrap(),
        r#"<outer xmlns="urn:y"><NS1:e xmlns:NS1="urn:x" /></outer>"#
    );
    // the tree itself is not changed by serialization
    assert_eq!(dom.prefix(e), "");
}

#[test]
fn test_synthetic_prefix_with_declared_default() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<outer xmlns="urn:y"/>"#).unwrap();
    let outer = dom.document_element(doc).unwrap();
    let e = dom.create_element_ns(doc, "urn:x", "e").unwrap();
    dom.append_child(outer, e).unwrap();

    let serialized = dom.to_string(doc).unwrap();
    assert_eq!(
        serialized,
        r#"<outer xmlns="urn:y"><NS1:e xmlns:NS1="urn:x" /></outer>"#
    );
    let reparsed = dom.parse(&serialized).unwrap();
    assert!(dom.compare(doc, reparsed));
}

#[test]
fn test_get_elements_by_tag_name_ns_wildcard() {
    let mut dom = Dom::new();
    let doc = dom.parse(SHADOWING).unwrap();
    let r = dom.document_element(doc).unwrap();
    let first_x = dom.first_child(r).unwrap();
    let second_x = dom.last_child(r).unwrap();

    assert_eq!(
        dom.get_elements_by_tag_name_ns(r, "*", "x"),
        vec![first_x, second_x]
    );
}
