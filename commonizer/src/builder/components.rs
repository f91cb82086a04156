// Builder Components
// Per-target state shared by both builder passes

use crate::builder::arena::{DeclId, DeclarationArena, Marker};
use crate::mergedtree::{Declaration, MergedNode, MergedTree, NodeId};
use crate::target::{CommonizerTarget, TargetSlot};
use std::collections::HashMap;

/// Everything built for one target: its own declarations, the skeletons of
/// its dependee declarations and which merged node produced which
/// declaration
#[derive(Debug, Clone)]
pub struct TargetBuilderComponents {
    target: CommonizerTarget,
    slot: TargetSlot,
    pub(crate) declarations: DeclarationArena,
    pub(crate) dependencies: DeclarationArena,
    pub(crate) built: HashMap<NodeId, DeclId>,
}

impl TargetBuilderComponents {
    pub fn new(target: CommonizerTarget, slot: TargetSlot) -> Self {
        let name = target.to_string();
        Self {
            declarations: DeclarationArena::new(name.clone()),
            dependencies: DeclarationArena::new(format!("dependencies of {name}")),
            target,
            slot,
            built: HashMap::new(),
        }
    }

    pub fn target(&self) -> &CommonizerTarget {
        &self.target
    }

    pub fn slot(&self) -> TargetSlot {
        self.slot
    }

    pub fn declarations(&self) -> &DeclarationArena {
        &self.declarations
    }

    pub fn dependencies(&self) -> &DeclarationArena {
        &self.dependencies
    }

    /// The declaration this target sees for a merged node, if it has one:
    /// the leaf's own slot, or the commonized slot for the shared target
    pub(crate) fn source<'t>(&self, node: &'t MergedNode) -> Option<&'t Declaration> {
        match self.slot {
            TargetSlot::Leaf(index) => node.target_declaration(index),
            TargetSlot::Shared => node.common_declaration(),
        }
    }

    pub(crate) fn marker(&self, node: &MergedNode) -> Marker {
        match self.slot {
            TargetSlot::Shared => Marker::Expect,
            TargetSlot::Leaf(_) if node.is_commonized() => Marker::Actual,
            TargetSlot::Leaf(_) => Marker::Plain,
        }
    }

    pub(crate) fn into_arenas(self) -> (CommonizerTarget, DeclarationArena, DeclarationArena) {
        (self.target, self.declarations, self.dependencies)
    }
}

/// Builder components for every leaf target, in order, then the shared target
pub(crate) fn components_for(
    leaf_targets: impl IntoIterator<Item = CommonizerTarget>,
    shared_target: CommonizerTarget,
) -> Vec<TargetBuilderComponents> {
    let mut components: Vec<TargetBuilderComponents> = leaf_targets
        .into_iter()
        .enumerate()
        .map(|(index, target)| TargetBuilderComponents::new(target, TargetSlot::Leaf(index)))
        .collect();
    components.push(TargetBuilderComponents::new(shared_target, TargetSlot::Shared));
    components
}

/// Name under which a merged node's declaration is built
pub(crate) fn declaration_name(tree: &MergedTree, id: NodeId, declaration: &Declaration) -> String {
    match declaration {
        Declaration::Module(header) => header.name.to_string(),
        Declaration::Package(name) => name.to_string(),
        Declaration::Class(header) => header.name.to_string(),
        Declaration::Function(function) => function.name.to_string(),
        Declaration::Property(property) => property.name.to_string(),
        Declaration::TypeAlias(alias) => alias.name.to_string(),
        Declaration::Constructor(_) => tree.node(id).key().to_string(),
    }
}
