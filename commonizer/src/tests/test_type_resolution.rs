use super::*;
use crate::{ClassifierRef, CommonizerSettings};
use commonizer_metadata::{ClassifierId, Function, Property, TypeAlias, TypeParameter};
use pretty_assertions::assert_eq;

// === TYPE ALIASES ===

#[test]
fn test_property_through_alias_commonizes_to_expansion() {
    let linux = Module::new("m", "/m").with_package(
        Package::new("posix")
            .with_type_alias(TypeAlias::new("off_t", Type::classifier("lang/Long")))
            .with_property(Property::val("offset", Type::classifier("posix/off_t"))),
    );
    let macos = Module::new("m", "/m").with_package(
        Package::new("posix").with_property(Property::val("offset", Type::classifier("lang/Long"))),
    );
    let result = run(&[("linux", vec![linux.clone()]), ("macos", vec![macos])]).unwrap();

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    let package = shared_module.package(&"posix".into()).unwrap();
    assert_eq!(
        package.property("offset").map(|property| &property.return_type),
        Some(&Type::classifier("lang/Long"))
    );
    assert!(package.type_alias("off_t").is_none());

    assert_eq!(rendered(&result, &leaf("linux")), vec![linux]);
}

#[test]
fn test_commonized_alias_is_referenced_by_name() {
    let module = Module::new("m", "/m").with_package(
        Package::new("posix")
            .with_type_alias(TypeAlias::new("size_t", Type::classifier("lang/Long")))
            .with_function(Function::new("strlen", Type::classifier("posix/size_t"))),
    );
    let result = run(&[("linux", vec![module.clone()]), ("macos", vec![module.clone()])]).unwrap();

    assert_eq!(rendered(&result, &shared(&["linux", "macos"])), vec![module]);

    let built = result.modules(&shared(&["linux", "macos"])).unwrap()[0]
        .as_commonized()
        .unwrap();
    let strlen = built.find(&["posix", "strlen"]).unwrap();
    assert!(matches!(
        strlen.reference(&ClassifierId::parse("posix/size_t")),
        Some(ClassifierRef::Declared(_))
    ));
}

#[test]
fn test_aliases_with_different_expansions_stay_per_target() {
    let linux = Module::new("m", "/m").with_package(
        Package::new("posix")
            .with_type_alias(TypeAlias::new("time_t", Type::classifier("lang/Long")))
            .with_function(Function::new("time", Type::classifier("posix/time_t"))),
    );
    let macos = Module::new("m", "/m").with_package(
        Package::new("posix")
            .with_type_alias(TypeAlias::new("time_t", int()))
            .with_function(Function::new("time", Type::classifier("posix/time_t"))),
    );
    let result = run(&[("linux", vec![linux]), ("macos", vec![macos])]).unwrap();

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    let package = shared_module.package(&"posix".into()).unwrap();
    assert!(package.type_alias("time_t").is_none());
    assert!(package.function("time").is_none());
}

#[test]
fn test_generic_alias_arguments_are_substituted() {
    let alias = TypeAlias::new("Items", Type::generic("lang/List", vec![Type::parameter(0)]))
        .with_type_parameter(TypeParameter::new("T"));
    let linux = Module::new("m", "/m").with_package(
        Package::new("p")
            .with_type_alias(alias)
            .with_function(Function::new("items", Type::generic("p/Items", vec![int()]))),
    );
    let macos = Module::new("m", "/m").with_package(Package::new("p").with_function(
        Function::new("items", Type::generic("lang/List", vec![int()])),
    ));
    let result = run(&[("linux", vec![linux]), ("macos", vec![macos])]).unwrap();

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    let items = shared_module
        .package(&"p".into())
        .unwrap()
        .function("items")
        .unwrap();
    assert_eq!(items.return_type, Type::generic("lang/List", vec![int()]));
}

// === FORWARD DECLARATIONS ===

#[test]
fn test_forward_declared_classifiers_resolve_externally() {
    let module = Module::new("m", "/m").with_package(Package::new("posix").with_function(
        Function::new("fopen", Type::classifier("opaque.structs/FILE").nullable()),
    ));
    let parameters = parameters(&[("linux", vec![module.clone()]), ("macos", vec![module.clone()])])
        .with_settings(CommonizerSettings::default().with_forward_declaration_package("opaque.structs"));
    let result = run_commonization(&parameters).unwrap();

    assert_eq!(rendered(&result, &shared(&["linux", "macos"])), vec![module]);

    let built = result.modules(&leaf("linux")).unwrap()[0].as_commonized().unwrap();
    let fopen = built.find(&["posix", "fopen"]).unwrap();
    assert_eq!(
        fopen.reference(&ClassifierId::parse("opaque.structs/FILE")),
        Some(&ClassifierRef::External(ClassifierId::parse("opaque.structs/FILE")))
    );
}

#[test]
fn test_unknown_classifier_without_forward_declaration_is_fatal() {
    let module = Module::new("m", "/m").with_package(Package::new("posix").with_function(
        Function::new("fopen", Type::classifier("opaque.structs/FILE").nullable()),
    ));
    let result = run(&[("linux", vec![module.clone()]), ("macos", vec![module])]);

    match result {
        Err(CommonizerError::UnresolvedClassifier {
            target, classifier, ..
        }) => {
            assert_eq!(target, "linux");
            assert_eq!(classifier, ClassifierId::parse("opaque.structs/FILE"));
        }
        other => panic!("expected unresolved classifier, got {other:?}"),
    }
}

// === SUPERTYPES ===

#[test]
fn test_supertype_lists_are_intersected() {
    let linux = Module::new("m", "/m").with_package(
        Package::new("p")
            .with_class(Class::interface("Closeable"))
            .with_class(Class::interface("Flushable"))
            .with_class(
                Class::class("Stream")
                    .with_supertype(Type::classifier("p/Flushable"))
                    .with_supertype(Type::classifier("p/Closeable")),
            ),
    );
    let macos = Module::new("m", "/m").with_package(
        Package::new("p")
            .with_class(Class::interface("Closeable"))
            .with_class(Class::class("Stream").with_supertype(Type::classifier("p/Closeable"))),
    );
    let result = run(&[("linux", vec![linux]), ("macos", vec![macos])]).unwrap();

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    let stream = shared_module.package(&"p".into()).unwrap().class("Stream").unwrap();
    assert_eq!(stream.header.supertypes, vec![Type::classifier("p/Closeable")]);
}

// === ANNOTATIONS ===

#[test]
fn test_annotation_without_common_classifier_is_dropped() {
    let annotated = Class::class("C").with_annotation("p/Marker");
    let linux = Module::new("m", "/m").with_package(
        Package::new("p")
            .with_class(Class::class("Marker"))
            .with_class(annotated.clone()),
    );
    let macos = Module::new("m", "/m").with_package(
        Package::new("p")
            .with_class(Class::interface("Marker"))
            .with_class(annotated),
    );
    let result = run(&[("linux", vec![linux.clone()]), ("macos", vec![macos])]).unwrap();

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    let package = shared_module.package(&"p".into()).unwrap();
    assert!(package.class("Marker").is_none());
    assert_eq!(
        package.class("C").map(|class| class.header.annotations.clone()),
        Some(vec![])
    );

    assert_eq!(rendered(&result, &leaf("linux")), vec![linux]);

    let built = result.modules(&leaf("linux")).unwrap()[0].as_commonized().unwrap();
    let class = built.find(&["p", "C"]).unwrap();
    assert!(matches!(
        class.reference(&ClassifierId::parse("p/Marker")),
        Some(ClassifierRef::Declared(_))
    ));
}

#[test]
fn test_annotation_from_shared_dependee_modules_is_kept() {
    let deprecated = ClassifierId::parse("lang/Deprecated");
    let mut function = Function::new("legacy", int());
    function.annotations = vec![deprecated.clone()];
    let module = Module::new("m", "/m").with_package(Package::new("p").with_function(function));
    let result = run(&[("linux", vec![module.clone()]), ("macos", vec![module.clone()])]).unwrap();

    assert_eq!(rendered(&result, &shared(&["linux", "macos"])), vec![module]);

    let built = result
        .modules(&shared(&["linux", "macos"]))
        .unwrap()[0]
        .as_commonized()
        .unwrap();
    let legacy = built.find(&["p", "legacy"]).unwrap();
    assert_eq!(
        legacy.reference(&deprecated),
        Some(&ClassifierRef::External(deprecated.clone()))
    );
}
