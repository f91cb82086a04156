//! Pipeline scenarios for the commonizer
//!
//! Every scenario goes through `run_commonization` with in-memory providers
//! and inspects the rendered output modules.

mod test_dependencies;
mod test_pipeline;
mod test_type_resolution;

use crate::{
    run_commonization, CommonizerError, CommonizerParameters, CommonizerResult, CommonizerTarget,
    LeafTarget, SharedTarget, TargetProvider,
};
use commonizer_metadata::{Class, ClassKind, InMemoryModulesProvider, Module, Package, Type};

/// Classifiers every target can name through the shared dependee modules
pub(crate) fn stdlib() -> InMemoryModulesProvider {
    let mut lang = Package::new("lang");
    for name in ["Any", "Int", "Long", "String", "Unit", "Boolean"] {
        lang = lang.with_class(Class::class(name));
    }
    lang = lang
        .with_class(Class::interface("Comparable"))
        .with_class(Class::new("List", ClassKind::Interface))
        .with_class(Class::new("Deprecated", ClassKind::AnnotationClass));
    InMemoryModulesProvider::empty().with_module(Module::new("stdlib", "/dist/stdlib").with_package(lang))
}

pub(crate) fn int() -> Type {
    Type::classifier("lang/Int")
}

/// Parameters with one leaf target per entry and the standard library shared
pub(crate) fn parameters(targets: &[(&str, Vec<Module>)]) -> CommonizerParameters {
    let mut parameters = CommonizerParameters::new().with_shared_dependee_modules(stdlib());
    for (name, modules) in targets {
        parameters
            .add_target(TargetProvider::new(
                LeafTarget::new(*name),
                InMemoryModulesProvider::new(modules.clone()),
            ))
            .unwrap();
    }
    parameters
}

pub(crate) fn run(targets: &[(&str, Vec<Module>)]) -> Result<CommonizerResult, CommonizerError> {
    run_commonization(&parameters(targets))
}

pub(crate) fn shared(names: &[&str]) -> CommonizerTarget {
    CommonizerTarget::Shared(SharedTarget::new(names.iter().map(|name| LeafTarget::new(*name))))
}

pub(crate) fn leaf(name: &str) -> CommonizerTarget {
    CommonizerTarget::Leaf(LeafTarget::new(name))
}

/// The built modules of one target rendered back into the input model;
/// missing modules are skipped
pub(crate) fn rendered(result: &CommonizerResult, target: &CommonizerTarget) -> Vec<Module> {
    result
        .modules(target)
        .unwrap_or_default()
        .iter()
        .filter_map(|module| module.as_commonized())
        .map(|module| module.to_module().unwrap())
        .collect()
}
