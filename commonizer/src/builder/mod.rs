//! Declarations builder
//!
//! Turns commonized merged trees into output declarations, one arena per
//! leaf target plus one for the shared target. Building runs in two passes
//! so that references between declarations resolve no matter where they are
//! declared:
//!
//! - pass 1 allocates skeletons for the dependency tree and the main tree
//!   and registers classifiers by id;
//! - pass 2 fills the main tree's bodies and resolves every classifier they
//!   mention.

pub mod arena;
pub mod components;
pub mod module;
pub mod pass1;
pub mod pass2;

pub use arena::{
    BuiltDeclaration, ClassifierRef, DeclId, DeclarationArena, DeclarationKind, Marker,
};
pub use components::TargetBuilderComponents;
pub use module::BuiltModule;
pub use pass1::{BuildDestination, DeclarationsBuilderPass1};
pub use pass2::DeclarationsBuilderPass2;

use crate::classifiers::ClassifierIndex;
use crate::error::CommonizerError;
use crate::mergedtree::MergedTree;
use crate::target::{CommonizerTarget, LeafTarget, SharedTarget};

/// Build every target's declarations, leaf targets in order, then the
/// shared target
pub fn build_declarations(
    tree: &MergedTree,
    dependency_tree: &MergedTree,
    classifiers: &ClassifierIndex,
    leaf_targets: &[LeafTarget],
) -> Result<Vec<TargetBuilderComponents>, CommonizerError> {
    let shared_target = SharedTarget::new(leaf_targets.iter().cloned());
    let mut components = components::components_for(
        leaf_targets.iter().cloned().map(CommonizerTarget::Leaf),
        CommonizerTarget::Shared(shared_target),
    );

    let dependency_pass = DeclarationsBuilderPass1::new(dependency_tree, BuildDestination::Dependencies);
    let skeleton_pass = DeclarationsBuilderPass1::new(tree, BuildDestination::Declarations);
    for target in components.iter_mut() {
        dependency_pass.run(target)?;
        skeleton_pass.run(target)?;
    }

    let body_pass = DeclarationsBuilderPass2::new(tree, classifiers);
    for target in components.iter_mut() {
        body_pass.run(target)?;
    }

    tracing::debug!(
        targets = components.len(),
        declarations = components
            .iter()
            .map(|target| target.declarations().len())
            .sum::<usize>(),
        "declarations built"
    );
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{ProvidedClassifier, ProvidedClassifiers};
    use crate::commonization::CommonizationVisitor;
    use crate::mergedtree::TreeMerger;
    use crate::parameters::CommonizerSettings;
    use crate::target::TargetSlot;
    use commonizer_metadata::{Class, ClassifierId, Function, Module, Package, Type};
    use std::sync::Arc;

    fn targets() -> Vec<LeafTarget> {
        vec![LeafTarget::new("linux"), LeafTarget::new("macos")]
    }

    fn index() -> ClassifierIndex {
        let mut shared = ProvidedClassifiers::new("shared");
        shared
            .add(
                ClassifierId::parse("lang/Int"),
                ProvidedClassifier::Class,
            )
            .unwrap();
        ClassifierIndex::new(
            targets(),
            vec![ProvidedClassifiers::new("a"), ProvidedClassifiers::new("b")],
            shared,
        )
    }

    fn build(
        modules: [Vec<Module>; 2],
    ) -> Result<Vec<TargetBuilderComponents>, CommonizerError> {
        let settings = CommonizerSettings::default();
        let targets = targets();
        let mut classifiers = index();
        let mut tree = TreeMerger::new(&settings, &targets)
            .merge(&modules, &mut classifiers)?
            .tree;
        CommonizationVisitor::new(&mut tree, &mut classifiers).visit()?;
        let dependency_tree = MergedTree::new(targets.len());
        build_declarations(&tree, &dependency_tree, &classifiers, &targets)
    }

    #[test]
    fn test_references_resolve_to_declared_classifiers() {
        let module = Module::new("m", "/m").with_package(
            Package::new("p")
                .with_class(Class::class("Handle"))
                .with_function(Function::new("open", Type::classifier("p/Handle"))),
        );
        let components = build([vec![module.clone()], vec![module]]).unwrap();

        assert_eq!(components.len(), 3);
        let shared = &components[2];
        assert_eq!(shared.slot(), TargetSlot::Shared);

        let arena = Arc::new(shared.declarations().clone());
        let built = BuiltModule::new(arena.clone(), Arc::new(shared.dependencies().clone()), arena.modules()[0]);
        let open = built.find(&["p", "open"]).unwrap();
        let handle = arena.classifier(&ClassifierId::parse("p/Handle")).unwrap();
        assert_eq!(open.marker(), Marker::Expect);
        assert_eq!(
            open.reference(&ClassifierId::parse("p/Handle")),
            Some(&ClassifierRef::Declared(handle))
        );
        assert_eq!(
            open.reference(&ClassifierId::parse("lang/Int")),
            None
        );
    }

    #[test]
    fn test_leaf_only_declarations_are_plain() {
        let linux = Module::new("m", "/m").with_package(
            Package::new("p").with_function(Function::new("only_linux", Type::classifier("lang/Int"))),
        );
        let macos = Module::new("m", "/m").with_package(Package::new("p"));
        let components = build([vec![linux], vec![macos]]).unwrap();

        let linux = &components[0];
        let arena = Arc::new(linux.declarations().clone());
        let built = BuiltModule::new(arena.clone(), Arc::new(linux.dependencies().clone()), arena.modules()[0]);
        assert_eq!(built.marker(), Some(Marker::Actual));
        let function = built.find(&["p", "only_linux"]).unwrap();
        assert_eq!(function.marker(), Marker::Plain);
        assert_eq!(
            function.reference(&ClassifierId::parse("lang/Int")),
            Some(&ClassifierRef::External(ClassifierId::parse("lang/Int")))
        );

        let shared = &components[2];
        let shared_arena = Arc::new(shared.declarations().clone());
        let shared_module = BuiltModule::new(
            shared_arena.clone(),
            Arc::new(shared.dependencies().clone()),
            shared_arena.modules()[0],
        );
        assert!(shared_module.find(&["p", "only_linux"]).is_none());
    }

    #[test]
    fn test_unresolved_reference_is_fatal() {
        let module = Module::new("m", "/m").with_package(
            Package::new("p").with_function(Function::new("stat", Type::classifier("posix/stat"))),
        );
        let result = build([vec![module.clone()], vec![module]]);
        match result {
            Err(CommonizerError::UnresolvedClassifier {
                target,
                classifier,
                referenced_from,
            }) => {
                assert_eq!(target, "linux");
                assert_eq!(classifier, ClassifierId::parse("posix/stat"));
                assert_eq!(referenced_from, "module m / package p / fun stat()");
            }
            other => panic!("expected unresolved classifier, got {other:?}"),
        }
    }

    #[test]
    fn test_to_module_renders_built_declarations() {
        let module = Module::new("m", "/m").with_package(
            Package::new("p").with_class(
                Class::class("Outer")
                    .with_nested_class(Class::class("Inner"))
                    .with_function(Function::new("size", Type::classifier("lang/Int"))),
            ),
        );
        let components = build([vec![module.clone()], vec![module.clone()]]).unwrap();

        let shared = &components[2];
        let arena = Arc::new(shared.declarations().clone());
        let built = BuiltModule::new(arena.clone(), Arc::new(shared.dependencies().clone()), arena.modules()[0]);
        assert_eq!(built.to_module(), Some(module));
    }
}
