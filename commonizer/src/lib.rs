//! Declaration Commonizer
//!
//! Merges the declaration trees of several platform targets and derives the
//! declarations they have in common.
//!
//! ## Architecture
//!
//! A run flows through a fixed pipeline:
//!
//! - **Tree Merger**: aligns every target's modules into one merged tree whose
//!   nodes hold one slot per target
//! - **Classifier Index**: knows which classifiers are available where, by
//!   origin (commonized, forward declared, dependee libraries, declared by a
//!   target)
//! - **Commonization Visitor**: fills each node's commonized slot, classifiers
//!   first in dependency order, using the per-kind strategies in [`commonization`]
//! - **Declarations Builder**: two passes per target that allocate skeletons,
//!   then fill bodies and resolve every classifier reference
//! - **Result Aggregator**: collects built and missing modules per target
//!
//! The dependee modules of every target go through the same merge and
//! commonization first, so the targets' own declarations can refer to them.
//!
//! ## Usage
//!
//! ```
//! use commonizer::{run_commonization, CommonizerParameters, LeafTarget, TargetProvider};
//! use commonizer_metadata::{InMemoryModulesProvider, Module};
//!
//! let mut parameters = CommonizerParameters::new();
//! for name in ["linux", "macos"] {
//!     let modules = InMemoryModulesProvider::empty().with_module(Module::new("m", "/m"));
//!     parameters
//!         .add_target(TargetProvider::new(LeafTarget::new(name), modules))
//!         .unwrap();
//! }
//! let result = run_commonization(&parameters).unwrap();
//! assert_eq!(result.targets().len(), 3);
//! ```

pub mod builder;
pub mod classifiers;
pub mod commonization;
pub mod error;
pub mod facade;
pub mod mergedtree;
pub mod parameters;
pub mod result;
pub mod target;

// Re-export public API
pub use builder::{
    BuiltDeclaration, BuiltModule, ClassifierRef, DeclId, DeclarationArena, DeclarationKind,
    Marker,
};
pub use classifiers::{ClassifierIndex, ProvidedClassifier, ProvidedClassifiers};
pub use error::CommonizerError;
pub use facade::run_commonization;
pub use mergedtree::{CommonSlot, Declaration, MergedTree, NodeId, NodeKey, Slot};
pub use parameters::{CommonizerParameters, CommonizerSettings, ProgressSink, TargetProvider};
pub use result::{CommonizerResult, ModuleResult};
pub use target::{CommonizerTarget, LeafTarget, SharedTarget, TargetSlot};

#[cfg(test)]
mod tests;
