use rstest::rstest;

use xmldom::{Dom, Error};

#[rstest]
#[case("<a x='1' y='2'/>", "<a y='2' x='1'/>", true, true)]
#[case(r#"<p:a xmlns:p="urn:x"/>"#, r#"<a xmlns="urn:x"/>"#, false, true)]
#[case("<a>text</a>", "<a>te<![CDATA[xt]]></a>", false, true)]
#[case("<a><!--x--></a>", "<a><!--y--></a>", false, false)]
#[case("<a><?pi x?></a>", "<a><?pi x?></a>", true, true)]
#[case("<a>x</a>", "<a><![CDATA[x]]></a>", false, true)]
#[case("<a x='1'/>", "<a x='2'/>", false, false)]
fn test_equality(
    #[case] left: &str,
    #[case] right: &str,
    #[case] equal_node: bool,
    #[case] same_infoset: bool,
) {
    let mut dom = Dom::new();
    let a = dom.parse(left).unwrap();
    let b = dom.parse(right).unwrap();
    assert_eq!(dom.is_equal_node(a, b), equal_node);
    assert_eq!(dom.compare(a, b), same_infoset);
}

#[test]
fn test_shallow_clone() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<a x="1"><b/>text</a>"#).unwrap();
    let a = dom.document_element(doc).unwrap();
    let copy = dom.clone_node(a, false).unwrap();
    assert_eq!(dom.get_attribute(copy, "x"), Some("1"));
    assert_eq!(dom.first_child(copy), None);
    assert_eq!(dom.parent_node(copy), None);
    assert_eq!(dom.owner_document(copy), Some(doc));

    // the copied attribute is independent
    dom.set_attribute(copy, "x", "2").unwrap();
    assert_eq!(dom.get_attribute(a, "x"), Some("1"));
}

#[test]
fn test_import_keeps_source() {
    let mut dom = Dom::new();
    let doc1 = dom.parse(r#"<a x="1"><b>text</b></a>"#).unwrap();
    let doc2 = dom.parse("<c/>").unwrap();
    let a = dom.document_element(doc1).unwrap();
    let c = dom.document_element(doc2).unwrap();

    let imported = dom.import_node(doc2, a, true).unwrap();
    dom.append_child(c, imported).unwrap();
    assert_eq!(
        dom.to_string(doc2).unwrap(),
        r#"<c><a x="1"><b>text</b></a></c>"#
    );
    assert_eq!(
        dom.to_string(doc1).unwrap(),
        r#"<a x="1"><b>text</b></a>"#
    );
    for n in dom.descendants(imported) {
        assert_eq!(dom.owner_document(n), Some(doc2));
    }
}

#[test]
fn test_adopt_moves_subtree() {
    let mut dom = Dom::new();
    let doc1 = dom.parse(r#"<a><b y="2"><d/></b></a>"#).unwrap();
    let doc2 = dom.parse("<c/>").unwrap();
    let a = dom.document_element(doc1).unwrap();
    let b = dom.first_child(a).unwrap();

    // not adopted yet
    let c = dom.document_element(doc2).unwrap();
    assert!(matches!(
        dom.append_child(c, b),
        Err(Error::WrongDocument)
    ));

    assert_eq!(dom.adopt_node(doc2, b).unwrap(), b);
    assert_eq!(dom.parent_node(b), None);
    assert!(!dom.has_child_nodes(a));
    for n in dom.descendants(b) {
        assert_eq!(dom.owner_document(n), Some(doc2));
    }
    let y = dom.get_attribute_node(b, "y").unwrap();
    assert_eq!(dom.owner_document(y), Some(doc2));

    dom.append_child(c, b).unwrap();
    assert_eq!(dom.to_string(doc2).unwrap(), r#"<c><b y="2"><d /></b></c>"#);
}

#[test]
fn test_documents_cannot_be_transferred() {
    let mut dom = Dom::new();
    let doc1 = dom.parse("<!DOCTYPE a><a/>").unwrap();
    let doc2 = dom.parse("<c/>").unwrap();
    let doctype = dom.doctype(doc1).unwrap();
    assert!(matches!(
        dom.adopt_node(doc2, doc1),
        Err(Error::NotSupported(_))
    ));
    assert!(matches!(
        dom.adopt_node(doc2, doctype),
        Err(Error::NotSupported(_))
    ));
    assert!(matches!(
        dom.import_node(doc2, doctype, false),
        Err(Error::NotSupported(_))
    ));
    // nothing moved
    assert_eq!(dom.parent_node(doctype), Some(doc1));
}
