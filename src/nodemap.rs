// the attribute container of an element: a hash index by qualified name
// plus a vector that keeps insertion order for iteration

use ahash::HashMap;

use crate::domdata::Node;

/// An ordered, name-keyed collection of attribute nodes owned by an element.
///
/// Iteration is in insertion order. Replacing an attribute with the same
/// qualified name keeps its position.
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    order: Vec<Node>,
    index: HashMap<String, Node>,
}

impl NamedNodeMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Get the attribute node by its qualified name.
    pub fn get(&self, qualified_name: &str) -> Option<Node> {
        self.index.get(qualified_name).copied()
    }

    /// Returns `true` if an attribute with this qualified name exists.
    pub fn contains_key(&self, qualified_name: &str) -> bool {
        self.index.contains_key(qualified_name)
    }

    /// Returns `true` if this node is in the map.
    pub fn contains(&self, node: Node) -> bool {
        self.order.contains(&node)
    }

    /// The attribute at a position in insertion order.
    pub fn item(&self, index: usize) -> Option<Node> {
        self.order.get(index).copied()
    }

    /// Iterate over the attribute nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.order.iter().copied()
    }

    /// Insert an attribute node. If there is already one with the same
    /// qualified name it is replaced in place and returned.
    pub(crate) fn insert(&mut self, qualified_name: String, node: Node) -> Option<Node> {
        match self.index.insert(qualified_name, node) {
            Some(old) => {
                if let Some(slot) = self.order.iter_mut().find(|n| **n == old) {
                    *slot = node;
                }
                Some(old)
            }
            None => {
                self.order.push(node);
                None
            }
        }
    }

    /// Replace a given attribute node with another one, keeping its
    /// position. A different attribute that already has the new qualified
    /// name is dropped and returned.
    pub(crate) fn replace(&mut self, old: Node, qualified_name: String, node: Node) -> Option<Node> {
        self.index.retain(|_, n| *n != old);
        let displaced = self.claim(qualified_name, node);
        if let Some(slot) = self.order.iter_mut().find(|n| **n == old) {
            *slot = node;
        } else {
            self.order.push(node);
        }
        displaced
    }

    /// Remove an attribute node. Returns `false` if it wasn't there.
    pub(crate) fn remove_node(&mut self, node: Node) -> bool {
        let len = self.order.len();
        self.order.retain(|n| *n != node);
        self.index.retain(|_, n| *n != node);
        self.order.len() != len
    }

    /// The attribute was renamed; update the index. A different attribute
    /// that already has the new qualified name is dropped and returned.
    pub(crate) fn rekey(&mut self, node: Node, qualified_name: String) -> Option<Node> {
        self.index.retain(|_, n| *n != node);
        self.claim(qualified_name, node)
    }

    // point a name at a node; whatever else held the name leaves the map
    fn claim(&mut self, qualified_name: String, node: Node) -> Option<Node> {
        let displaced = self
            .index
            .insert(qualified_name, node)
            .filter(|n| *n != node)?;
        self.order.retain(|n| *n != displaced);
        Some(displaced)
    }
}
