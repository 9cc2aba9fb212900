use indextree::{Arena, NodeId};

use crate::xmlvalue::Value;

pub(crate) type DomArena = Arena<NodeData>;

/// A node in the XML tree.
///
/// This is a lightweight handle and can be copied. It is only meaningful
/// together with the [`Dom`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

// what the arena stores per node: the payload plus the document that
// minted it. a document has no owner.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) owner: Option<Node>,
    pub(crate) value: Value,
}

/// The `Dom` struct owns the nodes of one or more XML documents.
///
/// Every node lives in an arena owned by the `Dom`; [`Node`] handles are
/// indices into it. Detached subtrees stay alive and can be reattached;
/// memory is released when the `Dom` is dropped.
///
/// The functionality is spread over several sections: node creation,
/// read-only access, manipulation, namespace lookup, cloning, comparison,
/// parsing and serialization.
///
/// A `Dom` is not internally synchronized; mutate it from one place at a
/// time.
pub struct Dom {
    pub(crate) arena: DomArena,
}

impl Dom {
    /// Create a new, empty `Dom`.
    pub fn new() -> Self {
        Dom {
            arena: DomArena::new(),
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &DomArena {
        &self.arena
    }

    #[inline]
    pub(crate) fn arena_mut(&mut self) -> &mut DomArena {
        &mut self.arena
    }

    #[inline]
    pub(crate) fn node_data(&self, node: Node) -> &NodeData {
        self.arena[node.get()].get()
    }

    pub(crate) fn new_node(&mut self, owner: Option<Node>, value: Value) -> Node {
        Node::new(self.arena.new_node(NodeData { owner, value }))
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
