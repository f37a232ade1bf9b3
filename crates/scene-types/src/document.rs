use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::node::{NodeId, NodeKind, SceneNode};

/// The scene graph: an arena of nodes plus the host's object order.
///
/// Nodes reference each other by [`NodeId`]; a node may be referenced by any
/// number of parents (boolean operands, array bases, clone sources).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    nodes: SlotMap<NodeId, SceneNode>,
    /// Insertion order, which is the order objects are listed by the host.
    order: Vec<NodeId>,
}

impl SceneDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its handle.
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = self.nodes.insert(node);
        self.order.push(id);
        id
    }

    /// Remove a node. References held by other nodes become dangling.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.order.retain(|o| *o != id);
        self.nodes.remove(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a node up by its internal name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.nodes.get(*id).is_some_and(|n| n.name == name))
    }

    /// All nodes in host order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(*id).map(|n| (*id, n)))
    }

    /// Direct dependencies of a node: its children followed by the nodes its
    /// parameters reference.
    pub fn out_list(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut out = node.children.clone();
        for r in node.kind.references() {
            if !out.contains(&r) {
                out.push(r);
            }
        }
        out
    }

    /// Every node reachable through `out_list`, excluding `id` itself.
    /// Cycles are tolerated.
    pub fn out_list_recursive(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        seen.insert(id);
        let mut result = Vec::new();
        let mut stack = self.out_list(id);
        stack.reverse();
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            result.push(next);
            let mut more = self.out_list(next);
            more.reverse();
            stack.extend(more);
        }
        result
    }

    /// Nodes whose `out_list` contains `id`.
    pub fn in_list(&self, id: NodeId) -> Vec<NodeId> {
        self.iter()
            .filter(|(other, _)| *other != id)
            .filter(|(other, _)| self.out_list(*other).contains(&id))
            .map(|(other, _)| other)
            .collect()
    }

    /// Reverse of the `children` edges of every node.
    pub fn parent_index(&self) -> ParentIndex {
        let mut parents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for (id, node) in self.iter() {
            for child in &node.children {
                let entry = parents.entry(*child).or_default();
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        }
        ParentIndex { parents }
    }

    /// True if any transitive container of `id` satisfies `pred`. Only
    /// `children` edges count; parameter references such as clone sources
    /// do not make a node owned.
    pub fn has_ancestor(
        &self,
        index: &ParentIndex,
        id: NodeId,
        pred: impl Fn(&NodeKind) -> bool,
    ) -> bool {
        let mut seen = HashSet::new();
        let mut stack = index.parents(id).to_vec();
        while let Some(parent) = stack.pop() {
            if !seen.insert(parent) {
                continue;
            }
            if self.nodes.get(parent).is_some_and(|n| pred(&n.kind)) {
                return true;
            }
            stack.extend_from_slice(index.parents(parent));
        }
        false
    }

    /// Re-normalise every placement quaternion. Hosts occasionally store
    /// rotations that drifted away from unit length.
    pub fn normalize_rotations(&mut self) {
        for node in self.nodes.values_mut() {
            node.placement.rotation = node.placement.rotation.normalized();
        }
    }
}

/// Containment parents of each node, from [`SceneDocument::parent_index`].
#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    parents: HashMap<NodeId, Vec<NodeId>>,
}

impl ParentIndex {
    /// Nodes listing `id` among their children, in host order.
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.parents.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
