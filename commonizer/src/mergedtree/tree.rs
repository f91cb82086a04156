//! Arena holding the merged tree

use crate::error::CommonizerError;
use crate::mergedtree::key::NodeKey;
use crate::mergedtree::node::{Declaration, MergedNode};
use commonizer_metadata::{ClassifierId, PackageName};
use indexmap::IndexMap;

/// Handle of a node inside a [`MergedTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Declarations of every target aligned by identity.
///
/// Module nodes are the roots. Children keep the order in which their keys
/// were first seen (earlier targets first), which makes every traversal
/// deterministic for a given input order.
#[derive(Debug, Clone)]
pub struct MergedTree {
    target_count: usize,
    nodes: Vec<MergedNode>,
    modules: IndexMap<NodeKey, NodeId>,
}

impl MergedTree {
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            nodes: Vec::new(),
            modules: IndexMap::new(),
        }
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &MergedNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut MergedNode {
        &mut self.nodes[id.0]
    }

    pub fn modules(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.modules.values().copied()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children()
    }

    /// Record `declaration` for one target under `parent`, creating the node
    /// on first sight of `key`. A second declaration with the same key from
    /// the same target is ignored.
    pub(crate) fn insert(
        &mut self,
        parent: Option<NodeId>,
        key: NodeKey,
        target_index: usize,
        declaration: Declaration,
    ) -> Result<NodeId, CommonizerError> {
        let existing = match parent {
            Some(parent) => self.node(parent).child(&key),
            None => self.modules.get(&key).copied(),
        };

        let id = match existing {
            Some(id) => id,
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes
                    .push(MergedNode::new(key.clone(), parent, self.target_count));
                match parent {
                    Some(parent) => self.node_mut(parent).add_child(key, id),
                    None => {
                        self.modules.insert(key, id);
                    }
                }
                id
            }
        };

        if !self.node_mut(id).fill_slot(target_index, declaration)? {
            tracing::trace!(
                node = %self.path(id),
                target_index,
                "duplicate declaration ignored"
            );
        }
        Ok(id)
    }

    /// All nodes in pre-order: every parent before its children
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.modules().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            order.push(id);
            let mut children: Vec<NodeId> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        order
    }

    /// Human-readable location of a node, for diagnostics
    pub fn path(&self, id: NodeId) -> String {
        let mut keys = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            keys.push(node.key().to_string());
            current = node.parent();
        }
        keys.reverse();
        keys.join(" / ")
    }

    /// The classifier identity of a class or type-alias node
    pub fn classifier_id(&self, id: NodeId) -> Option<ClassifierId> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            match node.key() {
                NodeKey::Class(name) | NodeKey::TypeAlias(name) => names.push(name.clone()),
                NodeKey::Package(package) => {
                    if names.is_empty() {
                        return None;
                    }
                    names.reverse();
                    let mut names = names.into_iter();
                    let first = names.next()?;
                    return Some(
                        names.fold(ClassifierId::new(package.clone(), first.as_str()), |id, name| {
                            id.nested(name.as_str())
                        }),
                    );
                }
                _ => return None,
            }
            current = node.parent();
        }
        None
    }

    /// The package a node is declared in
    pub fn package_of(&self, id: NodeId) -> Option<&PackageName> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if let NodeKey::Package(package) = node.key() {
                return Some(package);
            }
            current = node.parent();
        }
        None
    }

    /// Follow a path of keys from a module root
    pub fn find(&self, path: &[NodeKey]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut current = self.modules.get(first).copied()?;
        for key in rest {
            current = self.node(current).child(key)?;
        }
        Some(current)
    }
}
