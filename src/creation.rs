use crate::domdata::{Dom, Node};
use crate::error::Error;
use crate::name::{check_name, split_qualified_name, QName};
use crate::xmlvalue::{
    check_comment, check_pi_data, check_pi_target, Attribute, Comment, Document, DocumentType,
    Element, ProcessingInstruction, Text, Value,
};

/// ## Creation
///
/// Nodes are always minted by a document. The factories take the document
/// node (or any node owned by it) as their first argument. The new node is
/// unattached: use [`Dom::append_child`] and friends to put it in the tree.
impl Dom {
    /// Create a new, empty document.
    ///
    /// ```rust
    /// use xmldom::Dom;
    ///
    /// let mut dom = Dom::new();
    /// let doc = dom.create_document();
    /// let root = dom.create_element(doc, "root").unwrap();
    /// dom.append_child(doc, root).unwrap();
    /// assert_eq!(dom.document_element(doc), Some(root));
    /// ```
    pub fn create_document(&mut self) -> Node {
        self.new_node(None, Value::Document(Document::default()))
    }

    // the document that owns the node; a document owns itself here
    pub(crate) fn document_node(&self, node: Node) -> Node {
        self.node_data(node).owner.unwrap_or(node)
    }

    pub(crate) fn new_owned(&mut self, doc: Node, value: Value) -> Node {
        let doc = self.document_node(doc);
        self.new_node(Some(doc), value)
    }

    /// Create an element without namespace processing.
    ///
    /// The tag name must be an XML name, otherwise
    /// [`Error::InvalidCharacter`] is returned.
    pub fn create_element(&mut self, doc: Node, tag_name: &str) -> Result<Node, Error> {
        check_name(tag_name)?;
        Ok(self.new_element(doc, QName::plain(tag_name)))
    }

    /// Create an element in a namespace.
    ///
    /// The qualified name is split into prefix and local name. An empty
    /// namespace URI means no namespace.
    ///
    /// ```rust
    /// use xmldom::Dom;
    ///
    /// let mut dom = Dom::new();
    /// let doc = dom.create_document();
    /// let e = dom.create_element_ns(doc, "urn:a", "p:e").unwrap();
    /// assert_eq!(dom.prefix(e), "p");
    /// assert_eq!(dom.local_name(e), "e");
    /// assert_eq!(dom.namespace_uri(e), "urn:a");
    /// ```
    pub fn create_element_ns(
        &mut self,
        doc: Node,
        namespace_uri: &str,
        qualified_name: &str,
    ) -> Result<Node, Error> {
        let name = QName::parse(namespace_uri, qualified_name)?;
        Ok(self.new_element(doc, name))
    }

    pub(crate) fn new_element(&mut self, doc: Node, name: QName) -> Node {
        self.new_owned(doc, Value::Element(Element::new(name)))
    }

    /// Create an attribute without namespace processing. Its value is
    /// empty.
    pub fn create_attribute(&mut self, doc: Node, name: &str) -> Result<Node, Error> {
        check_name(name)?;
        Ok(self.new_attribute(doc, QName::plain(name), ""))
    }

    /// Create an attribute in a namespace. Its value is empty.
    ///
    /// Namespace declaration attributes (`xmlns`, `xmlns:p`) must use the
    /// XMLNS namespace.
    pub fn create_attribute_ns(
        &mut self,
        doc: Node,
        namespace_uri: &str,
        qualified_name: &str,
    ) -> Result<Node, Error> {
        let name = QName::parse(namespace_uri, qualified_name)?;
        Ok(self.new_attribute(doc, name, ""))
    }

    pub(crate) fn new_attribute(&mut self, doc: Node, name: QName, value: &str) -> Node {
        self.new_owned(
            doc,
            Value::Attribute(Attribute::new(name, value.to_string())),
        )
    }

    /// Create a text node.
    pub fn create_text_node(&mut self, doc: Node, data: &str) -> Node {
        self.new_owned(doc, Value::Text(Text::new(data.to_string())))
    }

    /// Create a CDATA section.
    pub fn create_cdata_section(&mut self, doc: Node, data: &str) -> Node {
        self.new_owned(doc, Value::CDataSection(Text::new(data.to_string())))
    }

    /// Create a comment.
    ///
    /// Comments containing `--` or ending in `-` are rejected with
    /// [`Error::InvalidCharacter`].
    pub fn create_comment(&mut self, doc: Node, data: &str) -> Result<Node, Error> {
        check_comment(data)?;
        Ok(self.new_owned(doc, Value::Comment(Comment::new(data.to_string()))))
    }

    /// Create a processing instruction.
    ///
    /// The target must be a name other than `xml` (in any case), and the
    /// data may not contain `?>`.
    pub fn create_processing_instruction(
        &mut self,
        doc: Node,
        target: &str,
        data: &str,
    ) -> Result<Node, Error> {
        check_pi_target(target)?;
        check_pi_data(data)?;
        Ok(self.new_owned(
            doc,
            Value::ProcessingInstruction(ProcessingInstruction::new(
                target.to_string(),
                data.to_string(),
            )),
        ))
    }

    /// Create an empty document fragment.
    pub fn create_document_fragment(&mut self, doc: Node) -> Node {
        self.new_owned(doc, Value::DocumentFragment)
    }

    /// Create a document type declaration.
    ///
    /// The name is a qualified name; public and system identifiers may be
    /// empty.
    pub fn create_document_type(
        &mut self,
        doc: Node,
        qualified_name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<Node, Error> {
        check_name(qualified_name)?;
        split_qualified_name(qualified_name)?;
        Ok(self.new_document_type(doc, qualified_name, public_id, system_id, ""))
    }

    pub(crate) fn new_document_type(
        &mut self,
        doc: Node,
        name: &str,
        public_id: &str,
        system_id: &str,
        internal_subset: &str,
    ) -> Node {
        self.new_owned(
            doc,
            Value::DocumentType(DocumentType {
                name: name.to_string(),
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
                internal_subset: internal_subset.to_string(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmlvalue::NodeType;

    #[test]
    fn test_factories_set_owner() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let e = dom.create_element(doc, "e").unwrap();
        let t = dom.create_text_node(e, "text");
        assert_eq!(dom.owner_document(e), Some(doc));
        assert_eq!(dom.owner_document(t), Some(doc));
        assert_eq!(dom.owner_document(doc), None);
        assert_eq!(dom.parent_node(e), None);
    }

    #[test]
    fn test_create_element_invalid_name() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert!(matches!(
            dom.create_element(doc, "1abc"),
            Err(Error::InvalidCharacter(_))
        ));
        assert!(matches!(
            dom.create_element_ns(doc, "urn:a", "a:b:c"),
            Err(Error::InvalidCharacter(_))
        ));
        assert!(matches!(
            dom.create_element_ns(doc, "", "p:e"),
            Err(Error::NamespaceError(_))
        ));
    }

    #[test]
    fn test_create_character_data() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert!(matches!(
            dom.create_comment(doc, "a--b"),
            Err(Error::InvalidCharacter(_))
        ));
        assert!(matches!(
            dom.create_processing_instruction(doc, "XML", ""),
            Err(Error::InvalidCharacter(_))
        ));
        assert!(matches!(
            dom.create_processing_instruction(doc, "pi", "a?>b"),
            Err(Error::InvalidCharacter(_))
        ));
        let cdata = dom.create_cdata_section(doc, "a]]>b");
        assert_eq!(dom.node_type(cdata), NodeType::CDataSection);
        assert_eq!(dom.data(cdata), Some("a]]>b"));
    }

    #[test]
    fn test_create_document_type() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let doctype = dom
            .create_document_type(doc, "html", "", "about:legacy-compat")
            .unwrap();
        assert_eq!(dom.node_name(doctype), "html");
        assert_eq!(
            dom.document_type(doctype).unwrap().system_id(),
            "about:legacy-compat"
        );
        assert!(dom.create_document_type(doc, "a b", "", "").is_err());
    }
}
