//! Commonization visitor
//!
//! Fills the commonized slot of every node of a merged tree in three phases:
//!
//! 1. Modules and packages, in tree order.
//! 2. Classifiers, in dependency order. A classifier depends on its owner and
//!    on every classifier its header mentions (supertypes, type parameter
//!    bounds, alias underlying type). Strongly connected components are
//!    resolved together: every member is assumed to commonize, members that
//!    fail are withdrawn, and the component is retried until it is stable.
//!    Each commonized classifier is added to the classifier index before the
//!    next component is visited.
//! 3. Everything else, in tree order.
//!
//! A node is left as-is when any target lacks it, when its owner was left
//! as-is, or when its strategy rejects the declarations.

use super::{commonize, CommonizationContext};
use crate::classifiers::ClassifierIndex;
use crate::error::CommonizerError;
use crate::mergedtree::{CommonSlot, Declaration, MergedTree, NodeId, NodeKey};
use commonizer_metadata::ClassifierId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommonizationStats {
    pub commonized: usize,
    pub left_as_is: usize,
    pub classifiers: usize,
    /// Classifier dependency cycles resolved as one unit
    pub cycles: usize,
}

pub struct CommonizationVisitor<'a> {
    tree: &'a mut MergedTree,
    classifiers: &'a mut ClassifierIndex,
    stats: CommonizationStats,
}

impl<'a> CommonizationVisitor<'a> {
    pub fn new(tree: &'a mut MergedTree, classifiers: &'a mut ClassifierIndex) -> Self {
        Self {
            tree,
            classifiers,
            stats: CommonizationStats::default(),
        }
    }

    pub fn visit(mut self) -> Result<CommonizationStats, CommonizerError> {
        let order = self.tree.depth_first();

        for &id in &order {
            if matches!(self.tree.node(id).key(), NodeKey::Module(_) | NodeKey::Package(_)) {
                let result = self.commonize_member(id);
                self.write(id, result)?;
            }
        }

        for component in self.classifier_components(&order) {
            self.commonize_component(&component)?;
        }

        for &id in &order {
            let key = self.tree.node(id).key();
            if !key.is_classifier() && !matches!(key, NodeKey::Module(_) | NodeKey::Package(_)) {
                let result = self.commonize_member(id);
                self.write(id, result)?;
            }
        }

        tracing::debug!(
            commonized = self.stats.commonized,
            left_as_is = self.stats.left_as_is,
            classifiers = self.stats.classifiers,
            cycles = self.stats.cycles,
            "commonization finished"
        );
        Ok(self.stats)
    }

    fn owner_commonized(&self, id: NodeId, pending: &HashSet<ClassifierId>) -> bool {
        match self.tree.node(id).parent() {
            None => true,
            Some(parent) => {
                self.tree.node(parent).is_commonized()
                    || self
                        .tree
                        .classifier_id(parent)
                        .is_some_and(|owner| pending.contains(&owner))
            }
        }
    }

    fn commonize_member(&self, id: NodeId) -> Option<Declaration> {
        if !self.owner_commonized(id, &HashSet::new()) {
            return None;
        }
        let declarations = self.tree.node(id).all_present()?;
        commonize(&declarations, &CommonizationContext::new(self.classifiers))
    }

    fn commonize_classifier(
        &self,
        id: NodeId,
        classifier: &ClassifierId,
        pending: &HashSet<ClassifierId>,
    ) -> Option<Declaration> {
        if !self.owner_commonized(id, pending) {
            return None;
        }
        let declarations = self.tree.node(id).all_present()?;
        let context = CommonizationContext::new(self.classifiers)
            .with_current_classifier(classifier)
            .with_pending(pending);
        commonize(&declarations, &context)
    }

    /// Classifier nodes grouped into strongly connected components,
    /// dependencies first; members of a component are in tree order
    fn classifier_components(&self, order: &[NodeId]) -> Vec<Vec<(NodeId, ClassifierId)>> {
        let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
        let mut indices: HashMap<ClassifierId, NodeIndex> = HashMap::new();
        let mut classifier_ids: HashMap<NodeId, ClassifierId> = HashMap::new();

        for &id in order {
            if !self.tree.node(id).key().is_classifier() {
                continue;
            }
            if let Some(classifier) = self.tree.classifier_id(id) {
                indices.insert(classifier.clone(), graph.add_node(id));
                classifier_ids.insert(id, classifier);
            }
        }

        for index in graph.node_indices().collect::<Vec<_>>() {
            let id = graph[index];
            let node = self.tree.node(id);
            let mut dependencies: Vec<NodeIndex> = Vec::new();

            if let Some(owner) = node.parent().and_then(|parent| classifier_ids.get(&parent)) {
                dependencies.extend(indices.get(owner).copied());
            }
            for declaration in node.slots().iter().filter_map(|slot| slot.as_present()) {
                declaration.for_each_classifier(&mut |referenced| {
                    if let Some(&dependency) = indices.get(referenced) {
                        dependencies.push(dependency);
                    }
                });
            }

            dependencies.sort();
            dependencies.dedup();
            for dependency in dependencies {
                if dependency != index {
                    graph.add_edge(index, dependency, ());
                }
            }
        }

        tarjan_scc(&graph)
            .into_iter()
            .map(|component| {
                let mut members: Vec<(NodeId, ClassifierId)> = component
                    .into_iter()
                    .filter_map(|index| {
                        let id = graph[index];
                        classifier_ids.get(&id).map(|classifier| (id, classifier.clone()))
                    })
                    .collect();
                members.sort_by_key(|(id, _)| *id);
                members
            })
            .collect()
    }

    fn commonize_component(
        &mut self,
        component: &[(NodeId, ClassifierId)],
    ) -> Result<(), CommonizerError> {
        if component.len() > 1 {
            self.stats.cycles += 1;
            tracing::trace!(
                members = component.len(),
                first = %component[0].1,
                "resolving classifier cycle"
            );
        }

        let mut pending: HashSet<ClassifierId> = component
            .iter()
            .map(|(_, classifier)| classifier.clone())
            .collect();
        let results = loop {
            let results: Vec<Option<Declaration>> = component
                .iter()
                .map(|(id, classifier)| self.commonize_classifier(*id, classifier, &pending))
                .collect();
            let withdrawn: Vec<&ClassifierId> = component
                .iter()
                .zip(&results)
                .filter(|((_, classifier), result)| result.is_none() && pending.contains(classifier))
                .map(|((_, classifier), _)| classifier)
                .collect();
            if withdrawn.is_empty() {
                break results;
            }
            for classifier in withdrawn {
                pending.remove(classifier);
            }
        };

        for ((id, classifier), result) in component.iter().zip(results) {
            let commonized = result.is_some();
            self.write(*id, result)?;
            if commonized {
                self.classifiers.add_commonized(classifier.clone())?;
                self.stats.classifiers += 1;
            }
        }
        Ok(())
    }

    fn write(&mut self, id: NodeId, result: Option<Declaration>) -> Result<(), CommonizerError> {
        let common = match result {
            Some(declaration) => {
                self.stats.commonized += 1;
                tracing::trace!(
                    kind = declaration.kind_name(),
                    node = %self.tree.path(id),
                    "commonized"
                );
                CommonSlot::Commonized(declaration)
            }
            None => {
                self.stats.left_as_is += 1;
                tracing::trace!(node = %self.tree.path(id), "left as is");
                CommonSlot::LeftAsIs
            }
        };
        self.tree.node_mut(id).set_common(common)
    }
}
