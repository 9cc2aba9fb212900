use ahash::HashMap;

use crate::domdata::{Dom, Node};
use crate::error::Error;
use crate::name::{QName, XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::output::{declared_bindings, NamespaceNormalizer};
use crate::xmlvalue::Value;
use crate::NodeEdge;

/// ## Namespaces
///
/// Namespace bindings come from `xmlns` and `xmlns:prefix` attributes and
/// from the names of elements themselves. The `xml` and `xmlns` prefixes
/// are always bound.
impl Dom {
    // the element to start looking from for any node kind
    fn lookup_element(&self, node: Node) -> Option<Node> {
        match self.value(node) {
            Value::Element(_) => Some(node),
            Value::Document(_) => self.document_element(node),
            Value::Attribute(attribute) => attribute.owner_element(),
            Value::DocumentType(_) | Value::DocumentFragment => None,
            _ => self
                .parent_node(node)
                .filter(|parent| self.is_element(*parent)),
        }
    }

    // elements from this one up, stopping at the first non-element
    fn element_ancestors(&self, element: Node) -> impl Iterator<Item = Node> + '_ {
        self.ancestors(element).take_while(|n| self.is_element(*n))
    }

    /// Look up the namespace URI bound to a prefix. The empty prefix looks
    /// up the default namespace.
    ///
    /// Returns [`None`] if the prefix is not bound.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<a xmlns:p="urn:p"><b xmlns="urn:d"/></a>"#).unwrap();
    /// let a = dom.document_element(doc).unwrap();
    /// let b = dom.first_child(a).unwrap();
    /// assert_eq!(dom.lookup_namespace_uri(b, "p"), Some("urn:p"));
    /// assert_eq!(dom.lookup_namespace_uri(b, ""), Some("urn:d"));
    /// assert_eq!(dom.lookup_namespace_uri(a, ""), None);
    /// ```
    pub fn lookup_namespace_uri(&self, node: Node, prefix: &str) -> Option<&str> {
        match prefix {
            "xml" => return Some(XML_NAMESPACE),
            "xmlns" => return Some(XMLNS_NAMESPACE),
            _ => {}
        }
        let element = self.lookup_element(node)?;
        for ancestor in self.element_ancestors(element) {
            let Some(e) = self.element(ancestor) else {
                break;
            };
            if !e.name.namespace_uri().is_empty() && e.name.prefix() == prefix {
                return Some(e.name.namespace_uri());
            }
            if let Some(namespace) = self.declaration(ancestor, prefix) {
                return if namespace.is_empty() {
                    None
                } else {
                    Some(namespace)
                };
            }
        }
        None
    }

    // the value of this element's own declaration for a prefix
    fn declaration(&self, element: Node, prefix: &str) -> Option<&str> {
        self.element(element)?
            .attributes
            .iter()
            .filter_map(|a| self.attribute(a))
            .filter(|a| a.name.declared_prefix() == Some(prefix))
            .map(|a| a.value())
            .last()
    }

    /// Look up a prefix bound to a namespace URI.
    ///
    /// Declarations that are shadowed by a nearer declaration of the same
    /// prefix are skipped. Returns [`None`] for the empty namespace and if
    /// no prefix is bound; the default namespace does not count.
    pub fn lookup_prefix(&self, node: Node, namespace_uri: &str) -> Option<&str> {
        if namespace_uri.is_empty() {
            return None;
        }
        let start = self.lookup_element(node)?;
        for ancestor in self.element_ancestors(start) {
            let Some(e) = self.element(ancestor) else {
                break;
            };
            let prefix = e.name.prefix();
            if e.name.namespace_uri() == namespace_uri
                && !prefix.is_empty()
                && self.lookup_namespace_uri(start, prefix) == Some(namespace_uri)
            {
                return Some(prefix);
            }
            for attribute in e.attributes.iter() {
                let Some(a) = self.attribute(attribute) else {
                    continue;
                };
                match a.name.declared_prefix() {
                    Some(prefix)
                        if !prefix.is_empty()
                            && a.value() == namespace_uri
                            && self.lookup_namespace_uri(start, prefix) == Some(namespace_uri) =>
                    {
                        return Some(prefix)
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Is this namespace URI the default namespace in scope? The empty
    /// namespace is the default when no default is declared.
    pub fn is_default_namespace(&self, node: Node, namespace_uri: &str) -> bool {
        self.lookup_namespace_uri(node, "").unwrap_or("") == namespace_uri
    }

    /// All namespace bindings in scope for a node: prefix to namespace URI,
    /// with the empty prefix for the default namespace. The `xml` prefix
    /// is always included.
    ///
    /// An element's own namespaced name binds its prefix just like a
    /// declaration does, so this agrees with
    /// [`lookup_namespace_uri`](Dom::lookup_namespace_uri) for every prefix.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.parse(r#"<a xmlns:p="urn:p" xmlns="urn:d"><b xmlns=""/></a>"#).unwrap();
    /// let a = dom.document_element(doc).unwrap();
    /// let b = dom.first_child(a).unwrap();
    /// let namespaces = dom.in_scope_namespaces(b);
    /// assert_eq!(namespaces.get("p").map(String::as_str), Some("urn:p"));
    /// assert_eq!(namespaces.get(""), None);
    /// ```
    pub fn in_scope_namespaces(&self, node: Node) -> HashMap<String, String> {
        let mut namespaces = HashMap::default();
        if let Some(element) = self.lookup_element(node) {
            // innermost first, so the first binding of a prefix wins
            for (prefix, namespace) in self.effective_bindings(element) {
                namespaces
                    .entry(prefix.to_string())
                    .or_insert_with(|| namespace.to_string());
            }
        }
        namespaces.retain(|_, namespace| !namespace.is_empty());
        namespaces.insert("xml".to_string(), XML_NAMESPACE.to_string());
        namespaces
    }

    // bindings from this element up, innermost first; an element's name
    // binding comes before its declarations
    fn effective_bindings(&self, element: Node) -> Vec<(&str, &str)> {
        let mut bindings = Vec::new();
        for ancestor in self.element_ancestors(element) {
            let Some(e) = self.element(ancestor) else {
                break;
            };
            if !e.name.namespace_uri().is_empty() {
                bindings.push((e.name.prefix(), e.name.namespace_uri()));
            }
            for attribute in e.attributes.iter() {
                if let Some(a) = self.attribute(attribute) {
                    match a.name.declared_prefix() {
                        Some("xml") | Some("xmlns") | None => {}
                        Some(prefix) => bindings.push((prefix, a.value())),
                    }
                }
            }
        }
        bindings
    }

    /// Normalize the namespaces of a subtree in place.
    ///
    /// Afterwards every element and attribute carries the namespace
    /// declarations its name needs: missing declarations are added,
    /// conflicting ones are overwritten, and prefixes that cannot be used
    /// are replaced by synthesized prefixes (`NS1`, `NS2`, ...).
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let doc = dom.create_document();
    /// let root = dom.create_element_ns(doc, "urn:a", "p:root").unwrap();
    /// dom.append_child(doc, root).unwrap();
    /// dom.normalize_namespaces(doc).unwrap();
    /// assert_eq!(dom.get_attribute(root, "xmlns:p"), Some("urn:a"));
    /// ```
    pub fn normalize_namespaces(&mut self, node: Node) -> Result<(), Error> {
        // start from what the ancestors declare
        let inherited = match self.parent_node(node) {
            Some(parent) if self.is_element(parent) => {
                let mut bindings = declared_bindings(self, parent);
                bindings.reverse();
                bindings
            }
            _ => Vec::new(),
        };
        let mut decisions = Vec::new();
        {
            let mut normalizer = NamespaceNormalizer::with_scope(self, inherited);
            for edge in self.traverse(node) {
                match edge {
                    NodeEdge::Start(n) if self.is_element(n) => {
                        decisions.push((n, normalizer.push(n)?));
                    }
                    NodeEdge::End(n) if self.is_element(n) => normalizer.pop(),
                    _ => {}
                }
            }
        }
        for (element, names) in decisions {
            let name = match self.element(element) {
                Some(e) => e.name.clone(),
                None => continue,
            };
            if name.prefix() != names.prefix {
                let name = QName::new(name.namespace_uri(), &names.prefix, name.local_name());
                if let Some(e) = self.element_mut(element) {
                    e.name = name;
                }
            }
            for (attribute, prefix) in &names.attributes {
                let Some(name) = self.attribute(*attribute).map(|a| a.name.clone()) else {
                    continue;
                };
                if name.prefix() != prefix {
                    let name = QName::new(name.namespace_uri(), prefix, name.local_name());
                    self.rename_attribute(*attribute, name);
                }
            }
            for (qualified_name, namespace) in names.declaration_attributes() {
                self.set_attribute_ns(element, XMLNS_NAMESPACE, &qualified_name, namespace)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_from_text_delegates_to_parent() {
        let mut dom = Dom::new();
        let doc = dom
            .parse(r#"<a xmlns:p="urn:p"><?pi data?>text</a>"#)
            .unwrap();
        let a = dom.document_element(doc).unwrap();
        for child in dom.child_nodes(a) {
            assert_eq!(dom.lookup_namespace_uri(child, "p"), Some("urn:p"));
            assert_eq!(dom.lookup_prefix(child, "urn:p"), Some("p"));
        }
        assert_eq!(dom.lookup_namespace_uri(doc, "p"), Some("urn:p"));
    }

    #[test]
    fn test_lookup_prefix_skips_shadowed() {
        let mut dom = Dom::new();
        let doc = dom
            .parse(r#"<a xmlns:p="urn:a"><b xmlns:p="urn:b"/></a>"#)
            .unwrap();
        let a = dom.document_element(doc).unwrap();
        let b = dom.first_child(a).unwrap();
        assert_eq!(dom.lookup_prefix(b, "urn:a"), None);
        assert_eq!(dom.lookup_prefix(b, "urn:b"), Some("p"));
        assert_eq!(dom.lookup_prefix(a, "urn:a"), Some("p"));
    }

    #[test]
    fn test_is_default_namespace() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<a xmlns="urn:d"><b xmlns=""/></a>"#).unwrap();
        let a = dom.document_element(doc).unwrap();
        let b = dom.first_child(a).unwrap();
        assert!(dom.is_default_namespace(a, "urn:d"));
        assert!(dom.is_default_namespace(b, ""));
        assert!(!dom.is_default_namespace(b, "urn:d"));
    }

    #[test]
    fn test_reserved_prefixes() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a/>").unwrap();
        assert_eq!(dom.lookup_namespace_uri(doc, "xml"), Some(XML_NAMESPACE));
        assert_eq!(dom.lookup_namespace_uri(doc, "xmlns"), Some(XMLNS_NAMESPACE));
    }

    #[test]
    fn test_normalize_namespaces_renames() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let outer = dom.create_element_ns(doc, "urn:y", "outer").unwrap();
        let inner = dom.create_element_ns(doc, "urn:x", "e").unwrap();
        dom.append_child(doc, outer).unwrap();
        dom.append_child(outer, inner).unwrap();
        dom.normalize_namespaces(doc).unwrap();
        assert_eq!(dom.get_attribute(outer, "xmlns"), Some("urn:y"));
        assert_eq!(dom.prefix(inner), "NS1");
        assert_eq!(dom.get_attribute(inner, "xmlns:NS1"), Some("urn:x"));
        assert_eq!(dom.lookup_namespace_uri(inner, "NS1"), Some("urn:x"));
    }

    #[test]
    fn test_normalize_namespaces_subtree_sees_ancestors() {
        let mut dom = Dom::new();
        let doc = dom.parse(r#"<a xmlns="urn:a"/>"#).unwrap();
        let a = dom.document_element(doc).unwrap();
        let b = dom.create_element(doc, "b").unwrap();
        let c = dom.create_element_ns(doc, "urn:a", "c").unwrap();
        dom.append_child(a, b).unwrap();
        dom.append_child(a, c).unwrap();

        dom.normalize_namespaces(b).unwrap();
        assert_eq!(dom.get_attribute(b, "xmlns"), Some(""));
        assert_eq!(dom.namespace_uri(b), "");
        assert_eq!(dom.lookup_namespace_uri(b, ""), None);

        dom.normalize_namespaces(c).unwrap();
        assert_eq!(dom.attributes(c).len(), 0);
        assert_eq!(dom.lookup_namespace_uri(c, ""), Some("urn:a"));
    }

    #[test]
    fn test_in_scope_namespaces_includes_element_names() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let a = dom.create_element_ns(doc, "urn:a", "p:a").unwrap();
        let b = dom.create_element(doc, "b").unwrap();
        dom.append_child(doc, a).unwrap();
        dom.append_child(a, b).unwrap();

        let namespaces = dom.in_scope_namespaces(b);
        assert_eq!(namespaces.get("p").map(String::as_str), Some("urn:a"));
        for (prefix, namespace) in &namespaces {
            assert_eq!(
                dom.lookup_namespace_uri(b, prefix),
                Some(namespace.as_str())
            );
        }
    }
}
