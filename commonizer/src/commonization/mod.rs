//! Commonization strategies
//!
//! A strategy takes one declaration per leaf target (in target order) and
//! either produces the declaration valid for the shared target or reports
//! that the declarations are incompatible. Strategies are pure: the only
//! state they see is the read-only [`CommonizationContext`].
//!
//! Every strategy is order-independent: permuting the input declarations
//! (together with their target positions) never changes the outcome.

pub mod classifiers;
pub mod members;
pub mod policy;
pub mod types;
pub mod visitor;

pub use visitor::{CommonizationStats, CommonizationVisitor};

use crate::classifiers::ClassifierIndex;
use crate::mergedtree::{Declaration, ModuleHeader};
use commonizer_metadata::ClassifierId;
use std::collections::HashSet;

/// Read-only view used while commonizing a single node
#[derive(Debug, Clone, Copy)]
pub struct CommonizationContext<'a> {
    classifiers: &'a ClassifierIndex,
    current_classifier: Option<&'a ClassifierId>,
    pending: Option<&'a HashSet<ClassifierId>>,
}

impl<'a> CommonizationContext<'a> {
    pub fn new(classifiers: &'a ClassifierIndex) -> Self {
        Self {
            classifiers,
            current_classifier: None,
            pending: None,
        }
    }

    /// The classifier whose header is being commonized; references to it
    /// from its own signature are always available
    pub fn with_current_classifier(mut self, id: &'a ClassifierId) -> Self {
        self.current_classifier = Some(id);
        self
    }

    /// Classifiers of a dependency cycle that are assumed to commonize while
    /// the cycle is being resolved
    pub fn with_pending(mut self, pending: &'a HashSet<ClassifierId>) -> Self {
        self.pending = Some(pending);
        self
    }

    pub fn classifiers(&self) -> &'a ClassifierIndex {
        self.classifiers
    }

    pub fn is_available(&self, id: &ClassifierId) -> bool {
        self.current_classifier == Some(id)
            || self.pending.is_some_and(|pending| pending.contains(id))
            || self.classifiers.is_commonly_available(id)
    }
}

/// Commonize one node's declarations.
///
/// `declarations` must hold one entry per leaf target, in target order, all
/// of the same kind. Returns `None` when they cannot be commonized.
pub fn commonize(
    declarations: &[&Declaration],
    context: &CommonizationContext<'_>,
) -> Option<Declaration> {
    let first = *declarations.first()?;
    match first {
        Declaration::Module(header) => {
            let same = declarations.iter().all(|declaration| {
                matches!(declaration, Declaration::Module(other) if other.name == header.name)
            });
            same.then(|| {
                Declaration::Module(ModuleHeader {
                    name: header.name.clone(),
                    location: header.location.clone(),
                })
            })
        }
        Declaration::Package(name) => {
            let same = declarations
                .iter()
                .all(|declaration| matches!(declaration, Declaration::Package(other) if other == name));
            same.then(|| Declaration::Package(name.clone()))
        }
        Declaration::Class(_) => {
            let headers = collect(declarations, |declaration| match declaration {
                Declaration::Class(header) => Some(header),
                _ => None,
            })?;
            classifiers::commonize_class(&headers, context).map(Declaration::Class)
        }
        Declaration::TypeAlias(_) => {
            let aliases = collect(declarations, |declaration| match declaration {
                Declaration::TypeAlias(alias) => Some(alias),
                _ => None,
            })?;
            classifiers::commonize_type_alias(&aliases, context).map(Declaration::TypeAlias)
        }
        Declaration::Constructor(_) => {
            let constructors = collect(declarations, |declaration| match declaration {
                Declaration::Constructor(constructor) => Some(constructor),
                _ => None,
            })?;
            members::commonize_constructor(&constructors, context).map(Declaration::Constructor)
        }
        Declaration::Function(_) => {
            let functions = collect(declarations, |declaration| match declaration {
                Declaration::Function(function) => Some(function),
                _ => None,
            })?;
            members::commonize_function(&functions, context).map(Declaration::Function)
        }
        Declaration::Property(_) => {
            let properties = collect(declarations, |declaration| match declaration {
                Declaration::Property(property) => Some(property),
                _ => None,
            })?;
            members::commonize_property(&properties, context).map(Declaration::Property)
        }
    }
}

/// Narrow every declaration to one kind; `None` if the kinds are mixed
fn collect<'d, T>(
    declarations: &[&'d Declaration],
    narrow: impl Fn(&'d Declaration) -> Option<&'d T>,
) -> Option<Vec<&'d T>> {
    declarations.iter().map(|declaration| narrow(*declaration)).collect()
}
