use super::*;
use crate::ClassifierRef;
use commonizer_metadata::{ClassifierId, Function};
use pretty_assertions::assert_eq;

fn posix(extra: Option<&str>) -> Module {
    let mut package = Package::new("posix").with_class(Class::class("stat"));
    if let Some(name) = extra {
        package = package.with_class(Class::class(name));
    }
    Module::new("posix", "/sysroot/posix").with_package(package)
}

fn parameters_with_dependencies(targets: &[(&str, Module, Module)]) -> CommonizerParameters {
    let mut parameters = CommonizerParameters::new().with_shared_dependee_modules(stdlib());
    for (name, own, dependee) in targets {
        parameters
            .add_target(
                TargetProvider::new(
                    LeafTarget::new(*name),
                    InMemoryModulesProvider::empty().with_module(own.clone()),
                )
                .with_dependee_modules(InMemoryModulesProvider::empty().with_module(dependee.clone())),
            )
            .unwrap();
    }
    parameters
}

#[test]
fn test_commonized_dependency_classifier_is_available() {
    let own = Module::new("m", "/m")
        .with_package(Package::new("p").with_function(Function::new("fstat", Type::classifier("posix/stat"))));
    let parameters = parameters_with_dependencies(&[
        ("linux", own.clone(), posix(Some("epoll_event"))),
        ("macos", own.clone(), posix(Some("kevent"))),
    ]);
    let result = run_commonization(&parameters).unwrap();

    assert_eq!(rendered(&result, &shared(&["linux", "macos"])), vec![own]);

    let shared_target = shared(&["linux", "macos"]);
    let built = result.modules(&shared_target).unwrap()[0].as_commonized().unwrap();
    let fstat = built.find(&["p", "fstat"]).unwrap();
    let reference = fstat.reference(&ClassifierId::parse("posix/stat")).unwrap();
    assert!(matches!(reference, ClassifierRef::Dependency(_)));
    assert_eq!(built.resolve(reference).map(|stat| stat.name()), Some("stat"));
}

#[test]
fn test_dependee_modules_are_not_part_of_the_output() {
    let own = Module::new("m", "/m").with_package(Package::new("p"));
    let parameters = parameters_with_dependencies(&[
        ("linux", own.clone(), posix(None)),
        ("macos", own.clone(), posix(None)),
    ]);
    let result = run_commonization(&parameters).unwrap();

    for target in result.targets() {
        let names: Vec<String> = result
            .modules(target)
            .unwrap()
            .iter()
            .map(|module| module.name().to_string())
            .collect();
        assert_eq!(names, vec!["m".to_string()]);
    }
}

#[test]
fn test_target_specific_dependency_resolves_on_its_leaf_only() {
    let linux = Module::new("m", "/m").with_package(
        Package::new("p").with_function(Function::new("poll", Type::classifier("posix/epoll_event"))),
    );
    let macos = Module::new("m", "/m").with_package(
        Package::new("p").with_function(Function::new("poll", Type::classifier("posix/kevent"))),
    );
    let parameters = parameters_with_dependencies(&[
        ("linux", linux.clone(), posix(Some("epoll_event"))),
        ("macos", macos.clone(), posix(Some("kevent"))),
    ]);
    let result = run_commonization(&parameters).unwrap();

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    assert!(shared_module.package(&"p".into()).unwrap().function("poll").is_none());

    assert_eq!(rendered(&result, &leaf("linux")), vec![linux]);
    assert_eq!(rendered(&result, &leaf("macos")), vec![macos]);

    let built = result.modules(&leaf("linux")).unwrap()[0].as_commonized().unwrap();
    let poll = built.find(&["p", "poll"]).unwrap();
    assert!(matches!(
        poll.reference(&ClassifierId::parse("posix/epoll_event")),
        Some(ClassifierRef::Dependency(_))
    ));
}

#[test]
fn test_classifier_absent_from_one_dependee_library_is_unresolved_there() {
    let own = Module::new("m", "/m").with_package(
        Package::new("p").with_function(Function::new("wait", Type::classifier("posix/epoll_event"))),
    );
    let parameters = parameters_with_dependencies(&[
        ("linux", own.clone(), posix(Some("epoll_event"))),
        ("macos", own.clone(), posix(Some("epoll_event"))),
        ("mingw", own.clone(), posix(None)),
    ]);
    let result = run_commonization(&parameters);

    // mingw cannot name the classifier at all
    match result {
        Err(CommonizerError::UnresolvedClassifier { target, .. }) => assert_eq!(target, "mingw"),
        other => panic!("expected unresolved classifier, got {other:?}"),
    }
}
