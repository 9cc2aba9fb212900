use crate::domdata::{Dom, Node};
use crate::xmlvalue::Value;

// a child as seen by the infoset comparison: runs of text and CDATA are one
// piece of character data
enum Item {
    Text(String),
    Node(Node),
}

/// ## Comparison
impl Dom {
    /// DOM structural equality.
    ///
    /// Two nodes are equal if they have the same type, names, value and
    /// attributes (in any order), and their children are equal in order.
    /// Prefixes and namespace declarations count; node identity and owner
    /// documents don't.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let a = dom.parse(r#"<a x="1" y="2">text</a>"#).unwrap();
    /// let b = dom.parse(r#"<a y="2" x="1">text</a>"#).unwrap();
    /// let c = dom.parse(r#"<a x="1">text</a>"#).unwrap();
    /// assert!(dom.is_equal_node(a, b));
    /// assert!(!dom.is_equal_node(a, c));
    /// ```
    pub fn is_equal_node(&self, a: Node, b: Node) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            if !self.shallow_equal(a, b) {
                return false;
            }
            let a_children = self.child_nodes(a);
            let b_children = self.child_nodes(b);
            if a_children.len() != b_children.len() {
                return false;
            }
            stack.extend(a_children.into_iter().zip(b_children));
        }
        true
    }

    fn shallow_equal(&self, a: Node, b: Node) -> bool {
        match (self.value(a), self.value(b)) {
            (Value::Element(ea), Value::Element(eb)) => {
                ea.name == eb.name
                    && ea.attributes.len() == eb.attributes.len()
                    && ea.attributes.iter().all(|attribute| {
                        eb.attributes
                            .iter()
                            .any(|other| self.shallow_equal(attribute, other))
                    })
            }
            (Value::Attribute(aa), Value::Attribute(ab)) => {
                aa.name == ab.name && aa.value() == ab.value()
            }
            (Value::Text(ta), Value::Text(tb))
            | (Value::CDataSection(ta), Value::CDataSection(tb)) => ta.get() == tb.get(),
            (Value::Comment(ca), Value::Comment(cb)) => ca.get() == cb.get(),
            (Value::ProcessingInstruction(pa), Value::ProcessingInstruction(pb)) => {
                pa.target() == pb.target() && pa.data() == pb.data()
            }
            (Value::DocumentType(da), Value::DocumentType(db)) => da == db,
            (Value::Document(_), Value::Document(_)) => true,
            (Value::DocumentFragment, Value::DocumentFragment) => true,
            _ => false,
        }
    }

    /// Compare two nodes by their namespace-aware information content.
    ///
    /// Elements and attributes are compared by namespace URI and local
    /// name, so prefixes don't matter. Namespace declaration attributes are
    /// ignored, and adjacent text and CDATA sections are compared as one
    /// piece of text. This is the equivalence a serialize and parse round
    /// trip preserves.
    ///
    /// ```rust
    /// let mut dom = xmldom::Dom::new();
    /// let a = dom.parse(r#"<p:a xmlns:p="urn:x">t<![CDATA[ext]]></p:a>"#).unwrap();
    /// let b = dom.parse(r#"<a xmlns="urn:x">text</a>"#).unwrap();
    /// assert!(dom.compare(a, b));
    /// ```
    pub fn compare(&self, a: Node, b: Node) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            if !self.infoset_shallow_equal(a, b) {
                return false;
            }
            let a_items = self.infoset_children(a);
            let b_items = self.infoset_children(b);
            if a_items.len() != b_items.len() {
                return false;
            }
            for (a_item, b_item) in a_items.into_iter().zip(b_items) {
                match (a_item, b_item) {
                    (Item::Text(ta), Item::Text(tb)) => {
                        if ta != tb {
                            return false;
                        }
                    }
                    (Item::Node(na), Item::Node(nb)) => stack.push((na, nb)),
                    _ => return false,
                }
            }
        }
        true
    }

    fn infoset_children(&self, node: Node) -> Vec<Item> {
        let mut items: Vec<Item> = Vec::new();
        for child in self.children(node) {
            match self.value(child) {
                Value::Text(text) | Value::CDataSection(text) => {
                    if text.get().is_empty() {
                        continue;
                    }
                    if let Some(Item::Text(previous)) = items.last_mut() {
                        previous.push_str(text.get());
                    } else {
                        items.push(Item::Text(text.get().to_string()));
                    }
                }
                _ => items.push(Item::Node(child)),
            }
        }
        items
    }

    // (namespace, local name, value) of the attributes that are not
    // namespace declarations, sorted
    fn infoset_attributes(&self, element: Node) -> Vec<(&str, &str, &str)> {
        let mut attributes = self
            .attributes(element)
            .into_iter()
            .filter_map(|a| self.attribute(a))
            .filter(|a| !a.is_namespace_declaration())
            .map(|a| (a.name.namespace_uri(), a.name.local_name(), a.value()))
            .collect::<Vec<_>>();
        attributes.sort_unstable();
        attributes
    }

    fn infoset_shallow_equal(&self, a: Node, b: Node) -> bool {
        match (self.value(a), self.value(b)) {
            (Value::Element(ea), Value::Element(eb)) => {
                ea.name.namespace_uri() == eb.name.namespace_uri()
                    && ea.name.local_name() == eb.name.local_name()
                    && self.infoset_attributes(a) == self.infoset_attributes(b)
            }
            (Value::Attribute(aa), Value::Attribute(ab)) => {
                aa.name.namespace_uri() == ab.name.namespace_uri()
                    && aa.name.local_name() == ab.name.local_name()
                    && aa.value() == ab.value()
            }
            (Value::Text(ta), Value::Text(tb))
            | (Value::Text(ta), Value::CDataSection(tb))
            | (Value::CDataSection(ta), Value::Text(tb))
            | (Value::CDataSection(ta), Value::CDataSection(tb)) => ta.get() == tb.get(),
            (Value::Document(_), Value::Document(_))
            | (Value::DocumentFragment, Value::DocumentFragment)
            | (Value::DocumentType(_), Value::DocumentType(_))
            | (Value::Comment(_), Value::Comment(_))
            | (Value::ProcessingInstruction(_), Value::ProcessingInstruction(_)) => {
                self.shallow_equal(a, b)
            }
            _ => false,
        }
    }
}
