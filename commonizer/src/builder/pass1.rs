//! First builder pass: skeletons and classifier registration
//!
//! Allocates one skeleton per merged node that exists for the target and
//! registers every classifier skeleton by id, so the second pass can resolve
//! references regardless of declaration order.

use crate::builder::arena::{DeclId, DeclarationKind};
use crate::builder::components::{declaration_name, TargetBuilderComponents};
use crate::error::CommonizerError;
use crate::mergedtree::{MergedTree, NodeId};
use std::collections::HashMap;

/// Which arena of the components receives the skeletons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDestination {
    Declarations,
    Dependencies,
}

pub struct DeclarationsBuilderPass1<'a> {
    tree: &'a MergedTree,
    destination: BuildDestination,
}

impl<'a> DeclarationsBuilderPass1<'a> {
    pub fn new(tree: &'a MergedTree, destination: BuildDestination) -> Self {
        Self { tree, destination }
    }

    pub fn run(&self, components: &mut TargetBuilderComponents) -> Result<usize, CommonizerError> {
        let mut built: HashMap<NodeId, DeclId> = HashMap::new();

        for id in self.tree.depth_first() {
            let node = self.tree.node(id);
            let owner = match node.parent() {
                None => None,
                Some(parent) => match built.get(&parent) {
                    Some(&owner) => Some(owner),
                    None => continue,
                },
            };
            let Some(declaration) = components.source(node) else {
                continue;
            };

            let marker = components.marker(node);
            let kind = DeclarationKind::of(declaration);
            let name = declaration_name(self.tree, id, declaration);
            let classifier = if node.key().is_classifier() {
                self.tree.classifier_id(id)
            } else {
                None
            };

            let arena = match self.destination {
                BuildDestination::Declarations => &mut components.declarations,
                BuildDestination::Dependencies => &mut components.dependencies,
            };
            let decl_id = arena.allocate(kind, name, owner, marker);
            if let Some(classifier) = classifier {
                arena.register_classifier(classifier, decl_id)?;
            }
            built.insert(id, decl_id);
        }

        let count = built.len();
        // Pass 2 only fills the target's own declarations
        if self.destination == BuildDestination::Declarations {
            components.built = built;
        }
        tracing::trace!(
            target_name = %components.target(),
            destination = ?self.destination,
            skeletons = count,
            "builder pass 1 finished"
        );
        Ok(count)
    }
}
