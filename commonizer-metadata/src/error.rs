// Commonizer Metadata Error Handling
// Failures reported by modules providers, with miette diagnostics

use crate::ids::ModuleName;
use miette::Diagnostic;
use thiserror::Error;

/// Error raised while a provider materializes its modules
#[derive(Error, Diagnostic, Debug)]
pub enum ProviderError {
    #[error("Module {module} could not be loaded: {reason}")]
    #[diagnostic(
        code(commonizer::metadata::load_failed),
        help("Check that the library at {location} is readable and well-formed")
    )]
    LoadFailed {
        module: ModuleName,
        location: String,
        reason: String,
    },

    #[error("Module {module} is provided more than once")]
    #[diagnostic(
        code(commonizer::metadata::duplicate_module),
        help("Each module name may appear only once per provider")
    )]
    DuplicateModule { module: ModuleName },
}
