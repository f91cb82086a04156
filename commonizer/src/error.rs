//! Error types for the commonizer
//!
//! Expected absence (a missing module, an incompatible declaration) is never
//! an error; it is represented in the result. Everything here aborts the run.

use commonizer_metadata::{ClassifierId, ProviderError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CommonizerError {
    #[error("Modules provider for target {target} failed")]
    #[diagnostic(code(commonizer::provider_failed))]
    Provider {
        target: String,
        #[source]
        #[diagnostic_source]
        source: ProviderError,
    },

    #[error("Target {target} was supplied more than once")]
    #[diagnostic(
        code(commonizer::duplicate_target),
        help("Every leaf target may be registered only once per run")
    )]
    DuplicateTarget { target: String },

    #[error("Unresolved classifier {classifier} referenced from {referenced_from} on target {target}")]
    #[diagnostic(
        code(commonizer::builder::unresolved_classifier),
        help("The classifier is neither built in this run nor provided by a dependency of the target; the merged tree is inconsistent")
    )]
    UnresolvedClassifier {
        target: String,
        classifier: ClassifierId,
        referenced_from: String,
    },

    #[error("Classifier {classifier} is registered twice in {partition}")]
    #[diagnostic(
        code(commonizer::classifiers::collision),
        help("A classifier may be declared only once per origin")
    )]
    ClassifierCollision {
        partition: String,
        classifier: ClassifierId,
    },

    #[error("Commonized slot of {key} was already written")]
    #[diagnostic(code(commonizer::tree::slot_rewritten))]
    SlotAlreadyWritten { key: String },

    #[error("Slot {index} is out of range for {key}, which has {count} target slots")]
    #[diagnostic(code(commonizer::tree::slot_out_of_range))]
    SlotOutOfRange {
        key: String,
        index: usize,
        count: usize,
    },
}

impl CommonizerError {
    pub(crate) fn provider(target: impl ToString, source: ProviderError) -> Self {
        Self::Provider {
            target: target.to_string(),
            source,
        }
    }
}
