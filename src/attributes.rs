use crate::domdata::{Dom, Node};
use crate::error::Error;
use crate::name::{check_name, QName};
use crate::nodemap::NamedNodeMap;

/// ## Attributes
///
/// Attributes are nodes owned by an element through its
/// [`NamedNodeMap`]; they are never children. The plain variants look
/// attributes up by qualified name, the `_ns` variants by namespace URI
/// and local name.
impl Dom {
    fn attribute_map(&self, element: Node) -> Option<&NamedNodeMap> {
        self.element(element).map(|e| &e.attributes)
    }

    fn element_check(&self, element: Node) -> Result<(), Error> {
        if self.is_element(element) {
            Ok(())
        } else {
            Err(Error::HierarchyRequest(format!(
                "{} nodes have no attributes",
                self.node_name(element)
            )))
        }
    }

    /// A snapshot of the attribute nodes of an element, in insertion order.
    /// Empty for other nodes.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<p b="1" a="2"/>"#).unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let names = dom
    ///     .attributes(p)
    ///     .into_iter()
    ///     .map(|a| dom.node_name(a).into_owned())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(names, vec!["b", "a"]);
    /// ```
    pub fn attributes(&self, element: Node) -> Vec<Node> {
        self.attribute_map(element)
            .map(|map| map.iter().collect())
            .unwrap_or_default()
    }

    /// Does the element have any attributes?
    pub fn has_attributes(&self, element: Node) -> bool {
        self.attribute_map(element)
            .map_or(false, |map| !map.is_empty())
    }

    /// The attribute node with this qualified name.
    pub fn get_attribute_node(&self, element: Node, name: &str) -> Option<Node> {
        self.attribute_map(element)?.get(name)
    }

    /// The attribute node with this namespace URI and local name.
    pub fn get_attribute_node_ns(
        &self,
        element: Node,
        namespace_uri: &str,
        local_name: &str,
    ) -> Option<Node> {
        self.attribute_map(element)?.iter().find(|a| {
            self.attribute(*a).map_or(false, |attribute| {
                attribute.name.namespace_uri() == namespace_uri
                    && attribute.name.local_name() == local_name
            })
        })
    }

    /// The value of the attribute with this qualified name.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<p a="1"/>"#).unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.get_attribute(p, "a"), Some("1"));
    /// assert_eq!(dom.get_attribute(p, "b"), None);
    /// ```
    pub fn get_attribute(&self, element: Node, name: &str) -> Option<&str> {
        let node = self.get_attribute_node(element, name)?;
        self.attribute(node).map(|a| a.value())
    }

    /// The value of the attribute with this namespace URI and local name.
    pub fn get_attribute_ns(
        &self,
        element: Node,
        namespace_uri: &str,
        local_name: &str,
    ) -> Option<&str> {
        let node = self.get_attribute_node_ns(element, namespace_uri, local_name)?;
        self.attribute(node).map(|a| a.value())
    }

    /// Does the element have an attribute with this qualified name?
    pub fn has_attribute(&self, element: Node, name: &str) -> bool {
        self.get_attribute_node(element, name).is_some()
    }

    /// Does the element have an attribute with this namespace URI and
    /// local name?
    pub fn has_attribute_ns(&self, element: Node, namespace_uri: &str, local_name: &str) -> bool {
        self.get_attribute_node_ns(element, namespace_uri, local_name)
            .is_some()
    }

    /// Set an attribute by qualified name, without namespace processing.
    ///
    /// If the attribute exists its value is replaced.
    pub fn set_attribute(&mut self, element: Node, name: &str, value: &str) -> Result<(), Error> {
        self.element_check(element)?;
        check_name(name)?;
        if let Some(existing) = self.get_attribute_node(element, name) {
            self.set_attribute_value(existing, value);
            return Ok(());
        }
        let attribute = self.new_attribute(element, QName::plain(name), value);
        self.attach_attribute(element, attribute);
        Ok(())
    }

    /// Set an attribute in a namespace.
    ///
    /// If an attribute with the same namespace URI and local name exists
    /// its value and prefix are replaced.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse("<p/>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// dom.set_attribute_ns(p, "urn:a", "a:x", "1").unwrap();
    /// dom.set_attribute_ns(p, "urn:a", "b:x", "2").unwrap();
    /// assert_eq!(dom.get_attribute(p, "b:x"), Some("2"));
    /// assert_eq!(dom.get_attribute(p, "a:x"), None);
    /// ```
    pub fn set_attribute_ns(
        &mut self,
        element: Node,
        namespace_uri: &str,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), Error> {
        self.element_check(element)?;
        let name = QName::parse(namespace_uri, qualified_name)?;
        if let Some(existing) = self.get_attribute_node_ns(element, namespace_uri, &name.local_name)
        {
            self.rename_attribute(existing, name);
            self.set_attribute_value(existing, value);
            return Ok(());
        }
        let attribute = self.new_attribute(element, name, value);
        self.attach_attribute(element, attribute);
        Ok(())
    }

    /// Remove the attribute with this qualified name. Returns the removed
    /// attribute node, if there was one.
    pub fn remove_attribute(&mut self, element: Node, name: &str) -> Option<Node> {
        let node = self.get_attribute_node(element, name)?;
        self.detach_attribute(element, node);
        Some(node)
    }

    /// Remove the attribute with this namespace URI and local name.
    pub fn remove_attribute_ns(
        &mut self,
        element: Node,
        namespace_uri: &str,
        local_name: &str,
    ) -> Option<Node> {
        let node = self.get_attribute_node_ns(element, namespace_uri, local_name)?;
        self.detach_attribute(element, node);
        Some(node)
    }

    /// Add an attribute node to an element, replacing the attribute with
    /// the same qualified name.
    ///
    /// Returns the replaced attribute, which is now unowned. An attribute
    /// owned by another element is [`Error::AttributeInUse`]; an attribute
    /// from another document is [`Error::WrongDocument`].
    pub fn set_attribute_node(
        &mut self,
        element: Node,
        attribute: Node,
    ) -> Result<Option<Node>, Error> {
        self.attribute_node_check(element, attribute)?;
        if self.owner_element(attribute) == Some(element) {
            return Ok(Some(attribute));
        }
        let name = self.node_name(attribute).into_owned();
        let old = self.get_attribute_node(element, &name);
        self.replace_attribute(element, old, attribute);
        Ok(old)
    }

    /// Like [`Dom::set_attribute_node`] but replaces the attribute with the
    /// same namespace URI and local name.
    pub fn set_attribute_node_ns(
        &mut self,
        element: Node,
        attribute: Node,
    ) -> Result<Option<Node>, Error> {
        self.attribute_node_check(element, attribute)?;
        if self.owner_element(attribute) == Some(element) {
            return Ok(Some(attribute));
        }
        let old = self.get_attribute_node_ns(
            element,
            self.namespace_uri(attribute),
            self.local_name(attribute),
        );
        self.replace_attribute(element, old, attribute);
        Ok(old)
    }

    /// Remove an attribute node from an element. Ownership returns to the
    /// caller: the attribute can be added to another element.
    ///
    /// Returns [`Error::NotFound`] if the element does not own the
    /// attribute.
    pub fn remove_attribute_node(&mut self, element: Node, attribute: Node) -> Result<Node, Error> {
        if self.owner_element(attribute) != Some(element) {
            return Err(Error::NotFound(
                "attribute is not owned by this element".to_string(),
            ));
        }
        self.detach_attribute(element, attribute);
        Ok(attribute)
    }

    /// The element owning this attribute.
    pub fn owner_element(&self, attribute: Node) -> Option<Node> {
        self.attribute(attribute)?.owner_element
    }

    /// The value of an attribute node.
    pub fn attribute_value(&self, attribute: Node) -> Option<&str> {
        self.attribute(attribute).map(|a| a.value())
    }

    /// Set the value of an attribute node. Does nothing for other nodes.
    pub fn set_attribute_value(&mut self, attribute: Node, value: &str) {
        if let Some(attribute) = self.attribute_mut(attribute) {
            attribute.value = value.to_string();
        }
    }

    fn attribute_node_check(&self, element: Node, attribute: Node) -> Result<(), Error> {
        self.element_check(element)?;
        if !self.is_attribute(attribute) {
            return Err(Error::HierarchyRequest(format!(
                "{} is not an attribute",
                self.node_name(attribute)
            )));
        }
        if self.document_node(element) != self.document_node(attribute) {
            return Err(Error::WrongDocument);
        }
        match self.owner_element(attribute) {
            Some(owner) if owner != element => Err(Error::AttributeInUse),
            _ => Ok(()),
        }
    }

    fn replace_attribute(&mut self, element: Node, old: Option<Node>, attribute: Node) {
        match old {
            Some(old) => {
                let name = self.node_name(attribute).into_owned();
                let displaced = self
                    .element_mut(element)
                    .and_then(|e| e.attributes.replace(old, name, attribute));
                self.release_attribute(old);
                if let Some(displaced) = displaced {
                    self.release_attribute(displaced);
                }
                if let Some(attribute) = self.attribute_mut(attribute) {
                    attribute.owner_element = Some(element);
                }
            }
            None => self.attach_attribute(element, attribute),
        }
    }

    // add an unowned attribute to the element's map. an attribute with the
    // same qualified name is dropped from the element.
    pub(crate) fn attach_attribute(&mut self, element: Node, attribute: Node) {
        let name = self.node_name(attribute).into_owned();
        let replaced = self
            .element_mut(element)
            .and_then(|e| e.attributes.insert(name, attribute));
        if let Some(replaced) = replaced {
            self.release_attribute(replaced);
        }
        if let Some(attribute) = self.attribute_mut(attribute) {
            attribute.owner_element = Some(element);
        }
    }

    pub(crate) fn detach_attribute(&mut self, element: Node, attribute: Node) {
        if let Some(e) = self.element_mut(element) {
            e.attributes.remove_node(attribute);
        }
        self.release_attribute(attribute);
    }

    fn release_attribute(&mut self, attribute: Node) {
        if let Some(a) = self.attribute_mut(attribute) {
            a.owner_element = None;
        }
    }

    // give an attribute a new name, keeping the owner's index in sync
    pub(crate) fn rename_attribute(&mut self, attribute: Node, name: QName) {
        let qualified_name = name.qualified_name().into_owned();
        let owner = match self.attribute_mut(attribute) {
            Some(a) => {
                a.name = name;
                a.owner_element
            }
            None => return,
        };
        let displaced = owner
            .and_then(|o| self.element_mut(o))
            .and_then(|e| e.attributes.rekey(attribute, qualified_name));
        if let Some(displaced) = displaced {
            self.release_attribute(displaced);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_attribute() {
        let mut dom = Dom::new();
        let doc = dom.parse("<p/>").unwrap();
        let p = dom.document_element(doc).unwrap();
        dom.set_attribute(p, "a", "1").unwrap();
        dom.set_attribute(p, "a", "2").unwrap();
        assert_eq!(dom.get_attribute(p, "a"), Some("2"));
        assert_eq!(dom.attributes(p).len(), 1);
        assert!(dom.set_attribute(p, "1a", "x").is_err());
    }

    #[test]
    fn test_attribute_not_a_child() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<p a="1"/>"#).unwrap();
        let p = dom.document_element(doc).unwrap();
        let a = dom.get_attribute_node(p, "a").unwrap();
        assert_eq!(dom.parent_node(a), None);
        assert_eq!(dom.owner_element(a), Some(p));
        assert!(!dom.has_child_nodes(p));
    }

    #[test]
    fn test_attribute_in_use() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<p a="1"><q/></p>"#).unwrap();
        let p = dom.document_element(doc).unwrap();
        let q = dom.first_child(p).unwrap();
        let a = dom.get_attribute_node(p, "a").unwrap();
        assert!(matches!(
            dom.set_attribute_node(q, a),
            Err(Error::AttributeInUse)
        ));
        dom.remove_attribute_node(p, a).unwrap();
        assert_eq!(dom.set_attribute_node(q, a).unwrap(), None);
        assert_eq!(dom.owner_element(a), Some(q));
        assert!(matches!(
            dom.remove_attribute_node(p, a),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_set_attribute_node_replaces() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<p a="1" b="2"/>"#).unwrap();
        let p = dom.document_element(doc).unwrap();
        let old = dom.get_attribute_node(p, "a").unwrap();
        let new = dom.create_attribute(doc, "a").unwrap();
        dom.set_attribute_value(new, "3");
        assert_eq!(dom.set_attribute_node(p, new).unwrap(), Some(old));
        assert_eq!(dom.owner_element(old), None);
        assert_eq!(dom.attributes(p), vec![new, dom.get_attribute_node(p, "b").unwrap()]);
    }

    #[test]
    fn test_set_attribute_ns_takes_over_qualified_name() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<p xmlns:a="urn:a" a:x="1"/>"#).unwrap();
        let p = dom.document_element(doc).unwrap();
        dom.set_attribute(p, "b:x", "plain").unwrap();
        let plain = dom.get_attribute_node(p, "b:x").unwrap();

        dom.set_attribute_ns(p, "urn:a", "b:x", "2").unwrap();
        let names = dom
            .attributes(p)
            .into_iter()
            .map(|a| dom.node_name(a).into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["xmlns:a", "b:x"]);
        assert_eq!(dom.owner_element(plain), None);
        assert_eq!(dom.get_attribute_ns(p, "urn:a", "x"), Some("2"));
        assert!(dom.to_string(doc).is_ok());

        assert!(dom.remove_attribute(p, "b:x").is_some());
        assert_eq!(dom.attributes(p).len(), 1);
    }

    #[test]
    fn test_set_attribute_node_ns_takes_over_qualified_name() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<p xmlns:a="urn:a" a:x="1" b:x="plain" xmlns:b="urn:b"/>"#).unwrap();
        let p = dom.document_element(doc).unwrap();
        let plain = dom.get_attribute_node(p, "b:x").unwrap();
        let old = dom.get_attribute_node(p, "a:x").unwrap();
        // same expanded name as a:x, same qualified name as the other one
        let new = dom.create_attribute_ns(doc, "urn:a", "b:x").unwrap();
        assert_eq!(dom.set_attribute_node_ns(p, new).unwrap(), Some(old));
        assert_eq!(dom.owner_element(plain), None);
        assert_eq!(dom.owner_element(old), None);
        assert_eq!(dom.get_attribute_node(p, "b:x"), Some(new));
        assert_eq!(dom.attributes(p).len(), 3);
    }

    #[test]
    fn test_attribute_ns() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<p xmlns:x="urn:x" x:a="1"/>"#).unwrap();
        let p = dom.document_element(doc).unwrap();
        assert_eq!(dom.get_attribute_ns(p, "urn:x", "a"), Some("1"));
        assert!(dom.has_attribute_ns(p, "urn:x", "a"));
        assert!(dom.remove_attribute_ns(p, "urn:x", "a").is_some());
        assert!(!dom.has_attribute(p, "x:a"));
    }
}
