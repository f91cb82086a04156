//! Classifier index
//!
//! Resolves type references that escape the node under consideration. The
//! index is partitioned by origin and only ever appended to during a run:
//!
//! - **commonized**: classifiers commonized so far (dependency tree first,
//!   then the main tree)
//! - **forward declarations**: opaque classifiers referenced inside the
//!   configured forward-declaration packages
//! - **dependee libraries**: classifiers provided by each leaf target's
//!   dependencies, plus those provided to the shared target
//! - **target declarations**: classifiers each leaf target declares in its
//!   own modules

use crate::error::CommonizerError;
use crate::target::{LeafTarget, SharedTarget, TargetSlot};
use commonizer_metadata::{Class, ClassifierId, Module, Type};
use std::collections::{HashMap, HashSet};

/// What is known about a classifier that is not part of the tree being built
#[derive(Debug, Clone, PartialEq)]
pub enum ProvidedClassifier {
    Class,
    TypeAlias {
        type_parameter_count: usize,
        underlying_type: Type,
    },
}

/// The classifiers of one origin
#[derive(Debug, Clone, Default)]
pub struct ProvidedClassifiers {
    partition: String,
    classifiers: HashMap<ClassifierId, ProvidedClassifier>,
}

impl ProvidedClassifiers {
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            classifiers: HashMap::new(),
        }
    }

    /// Index every class (nested ones included) and type alias of `modules`
    pub fn from_modules(
        partition: impl Into<String>,
        modules: &[Module],
    ) -> Result<Self, CommonizerError> {
        let mut provided = Self::new(partition);
        for module in modules {
            for package in &module.packages {
                for class in &package.classes {
                    let id = ClassifierId::new(package.name.clone(), class.name().as_str());
                    provided.add_class_tree(id, class)?;
                }
                for type_alias in &package.type_aliases {
                    provided.add(
                        ClassifierId::new(package.name.clone(), type_alias.name.as_str()),
                        ProvidedClassifier::TypeAlias {
                            type_parameter_count: type_alias.type_parameters.len(),
                            underlying_type: type_alias.underlying_type.clone(),
                        },
                    )?;
                }
            }
        }
        Ok(provided)
    }

    fn add_class_tree(&mut self, id: ClassifierId, class: &Class) -> Result<(), CommonizerError> {
        for nested in &class.classes {
            self.add_class_tree(id.nested(nested.name().as_str()), nested)?;
        }
        self.add(id, ProvidedClassifier::Class)
    }

    pub fn add(
        &mut self,
        id: ClassifierId,
        classifier: ProvidedClassifier,
    ) -> Result<(), CommonizerError> {
        if self.classifiers.contains_key(&id) {
            return Err(CommonizerError::ClassifierCollision {
                partition: self.partition.clone(),
                classifier: id,
            });
        }
        self.classifiers.insert(id, classifier);
        Ok(())
    }

    pub fn get(&self, id: &ClassifierId) -> Option<&ProvidedClassifier> {
        self.classifiers.get(id)
    }

    pub fn contains(&self, id: &ClassifierId) -> bool {
        self.classifiers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

/// Expansion of a type alias reference
#[derive(Debug, Clone, Copy)]
pub struct AliasExpansion<'a> {
    pub type_parameter_count: usize,
    pub underlying_type: &'a Type,
}

#[derive(Debug, Clone)]
pub struct ClassifierIndex {
    leaf_targets: Vec<LeafTarget>,
    shared_target: SharedTarget,
    commonized: HashSet<ClassifierId>,
    forward_declarations: HashSet<ClassifierId>,
    leaf_dependee_libraries: Vec<ProvidedClassifiers>,
    shared_dependee_library: ProvidedClassifiers,
    target_declarations: Vec<ProvidedClassifiers>,
}

impl ClassifierIndex {
    /// `leaf_dependee_libraries` must hold one entry per leaf target, in order
    pub fn new(
        leaf_targets: Vec<LeafTarget>,
        leaf_dependee_libraries: Vec<ProvidedClassifiers>,
        shared_dependee_library: ProvidedClassifiers,
    ) -> Self {
        let shared_target = SharedTarget::new(leaf_targets.iter().cloned());
        let target_declarations = leaf_targets
            .iter()
            .map(|target| ProvidedClassifiers::new(format!("declarations of {target}")))
            .collect();
        Self {
            leaf_targets,
            shared_target,
            commonized: HashSet::new(),
            forward_declarations: HashSet::new(),
            leaf_dependee_libraries,
            shared_dependee_library,
            target_declarations,
        }
    }

    pub fn leaf_targets(&self) -> &[LeafTarget] {
        &self.leaf_targets
    }

    pub fn target_name(&self, slot: TargetSlot) -> String {
        match slot {
            TargetSlot::Leaf(index) => self
                .leaf_targets
                .get(index)
                .map(ToString::to_string)
                .unwrap_or_else(|| format!("#{index}")),
            TargetSlot::Shared => self.shared_target.to_string(),
        }
    }

    pub fn add_commonized(&mut self, id: ClassifierId) -> Result<(), CommonizerError> {
        if !self.commonized.insert(id.clone()) {
            return Err(CommonizerError::ClassifierCollision {
                partition: "commonized classifiers".to_string(),
                classifier: id,
            });
        }
        Ok(())
    }

    pub fn is_commonized(&self, id: &ClassifierId) -> bool {
        self.commonized.contains(id)
    }

    pub fn commonized_count(&self) -> usize {
        self.commonized.len()
    }

    /// Forward declarations are a set: repeated references are expected
    pub fn add_forward_declaration(&mut self, id: ClassifierId) {
        self.forward_declarations.insert(id);
    }

    pub fn is_forward_declaration(&self, id: &ClassifierId) -> bool {
        self.forward_declarations.contains(id)
    }

    pub fn add_target_declaration(
        &mut self,
        target_index: usize,
        id: ClassifierId,
        classifier: ProvidedClassifier,
    ) -> Result<(), CommonizerError> {
        let count = self.target_declarations.len();
        let partition = self.target_declarations.get_mut(target_index).ok_or_else(|| {
            CommonizerError::SlotOutOfRange {
                key: id.to_string(),
                index: target_index,
                count,
            }
        })?;
        partition.add(id, classifier)
    }

    pub fn shared_dependee_library(&self) -> &ProvidedClassifiers {
        &self.shared_dependee_library
    }

    pub fn leaf_dependee_library(&self, target_index: usize) -> Option<&ProvidedClassifiers> {
        self.leaf_dependee_libraries.get(target_index)
    }

    /// True if the classifier exists identically on every target: provided to
    /// the shared target, commonized in this run, or forward declared
    pub fn is_commonly_available(&self, id: &ClassifierId) -> bool {
        self.shared_dependee_library.contains(id)
            || self.commonized.contains(id)
            || self.forward_declarations.contains(id)
    }

    /// True if `slot` can refer to the classifier without it being built
    /// in this run
    pub fn is_externally_resolvable(&self, slot: TargetSlot, id: &ClassifierId) -> bool {
        if self.shared_dependee_library.contains(id) || self.forward_declarations.contains(id) {
            return true;
        }
        match slot {
            TargetSlot::Leaf(index) => self
                .leaf_dependee_libraries
                .get(index)
                .is_some_and(|library| library.contains(id)),
            TargetSlot::Shared => false,
        }
    }

    /// Look up a type alias visible to one leaf target: its own declarations
    /// first, then its dependencies, then the shared dependencies
    pub fn type_alias(&self, target_index: usize, id: &ClassifierId) -> Option<AliasExpansion<'_>> {
        let candidates = [
            self.target_declarations.get(target_index),
            self.leaf_dependee_libraries.get(target_index),
            Some(&self.shared_dependee_library),
        ];
        candidates
            .into_iter()
            .flatten()
            .find_map(|partition| match partition.get(id) {
                Some(ProvidedClassifier::TypeAlias {
                    type_parameter_count,
                    underlying_type,
                }) => Some(AliasExpansion {
                    type_parameter_count: *type_parameter_count,
                    underlying_type,
                }),
                _ => None,
            })
    }
}
