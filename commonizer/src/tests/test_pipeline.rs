use super::*;
use crate::{Marker, ModuleResult};
use commonizer_metadata::{Function, Property};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn class_with_x() -> Module {
    Module::new("m", "/m").with_package(
        Package::new("p").with_class(Class::class("C").with_property(Property::val("x", int()))),
    )
}

// === WORKED EXAMPLES ===

#[test]
fn test_identical_class_is_commonized() {
    let result = run(&[("t1", vec![class_with_x()]), ("t2", vec![class_with_x()])]).unwrap();

    let shared_modules = rendered(&result, &shared(&["t1", "t2"]));
    assert_eq!(shared_modules, vec![class_with_x()]);

    for target in ["t1", "t2"] {
        let modules = result.modules(&leaf(target)).unwrap();
        assert_eq!(modules.len(), 1);
        let built = modules[0].as_commonized().unwrap();
        let class = built.find(&["p", "C"]).unwrap();
        assert_eq!(class.marker(), Marker::Actual);
        assert_eq!(built.find(&["p", "C", "x"]).unwrap().marker(), Marker::Actual);
    }
}

#[test]
fn test_module_missing_on_one_target() {
    let extra = Module::new("M", "/t1/M");
    let result = run(&[
        ("t1", vec![class_with_x(), extra]),
        ("t2", vec![class_with_x()]),
    ])
    .unwrap();

    let t2 = result.modules(&leaf("t2")).unwrap();
    assert_eq!(t2.len(), 2);
    assert!(!t2[0].is_missing());
    match &t2[1] {
        ModuleResult::Missing(info) => {
            assert_eq!(info.name.as_str(), "M");
            assert_eq!(info.location.to_string(), "/t1/M");
        }
        other => panic!("expected missing module, got {other:?}"),
    }

    let t1: Vec<String> = result
        .modules(&leaf("t1"))
        .unwrap()
        .iter()
        .map(|module| module.name().to_string())
        .collect();
    assert_eq!(t1, vec!["m".to_string(), "M".to_string()]);

    let shared_names: Vec<String> = rendered(&result, &shared(&["t1", "t2"]))
        .iter()
        .map(|module| module.name.to_string())
        .collect();
    assert_eq!(shared_names, vec!["m".to_string()]);
}

#[test]
fn test_nothing_to_do_without_modules() {
    let result = run(&[("t1", vec![]), ("t2", vec![])]).unwrap();
    assert!(result.is_nothing_to_do());
    assert!(result.targets().is_empty());
}

// === OUTPUT SHAPE ===

#[test]
fn test_output_keys_are_leaves_then_shared() {
    let result = run(&[
        ("macos", vec![class_with_x()]),
        ("linux", vec![class_with_x()]),
        ("mingw", vec![class_with_x()]),
    ])
    .unwrap();

    let targets: Vec<CommonizerTarget> = result.targets().into_iter().cloned().collect();
    assert_eq!(
        targets,
        vec![
            leaf("macos"),
            leaf("linux"),
            leaf("mingw"),
            shared(&["linux", "macos", "mingw"]),
        ]
    );
}

#[test]
fn test_leaf_only_members_stay_on_their_target() {
    let linux = Module::new("m", "/m").with_package(
        Package::new("p")
            .with_class(Class::class("C").with_property(Property::val("x", int())))
            .with_function(Function::new("epoll_wait", int())),
    );
    let result = run(&[("linux", vec![linux]), ("macos", vec![class_with_x()])]).unwrap();

    let linux_module = &rendered(&result, &leaf("linux"))[0];
    assert!(linux_module.package(&"p".into()).unwrap().function("epoll_wait").is_some());

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    assert_eq!(shared_module, &class_with_x());

    let built = result.modules(&leaf("linux")).unwrap()[0].as_commonized().unwrap();
    assert_eq!(built.find(&["p", "epoll_wait"]).unwrap().marker(), Marker::Plain);
}

#[test]
fn test_incompatible_member_is_dropped_from_shared_only() {
    let linux = Module::new("m", "/m").with_package(
        Package::new("p").with_class(Class::class("C").with_property(Property::val("x", int()))),
    );
    let macos = Module::new("m", "/m").with_package(Package::new("p").with_class(
        Class::class("C").with_property(Property::val("x", Type::classifier("lang/Long"))),
    ));
    let result = run(&[("linux", vec![linux.clone()]), ("macos", vec![macos.clone()])]).unwrap();

    let shared_module = &rendered(&result, &shared(&["linux", "macos"]))[0];
    let class = shared_module.package(&"p".into()).unwrap().class("C").unwrap();
    assert!(class.properties.is_empty());

    assert_eq!(rendered(&result, &leaf("linux")), vec![linux]);
    assert_eq!(rendered(&result, &leaf("macos")), vec![macos]);
}

// === PROGRESS ===

#[test]
fn test_progress_messages_in_order() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let parameters = parameters(&[("t1", vec![class_with_x()]), ("t2", vec![class_with_x()])])
        .with_progress_sink(move |message| sink.lock().unwrap().push(message.to_string()));

    run_commonization(&parameters).unwrap();

    assert_eq!(
        *messages.lock().unwrap(),
        vec![
            "Commonized dependency declarations".to_string(),
            "Commonized declarations".to_string(),
            "Prepared new descriptors".to_string(),
        ]
    );
}

#[test]
fn test_no_progress_when_nothing_to_do() {
    let messages = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&messages);
    let parameters = parameters(&[("t1", vec![])])
        .with_progress_sink(move |message| sink.lock().unwrap().push(message.to_string()));

    assert!(run_commonization(&parameters).unwrap().is_nothing_to_do());
    assert!(messages.lock().unwrap().is_empty());
}

// === FAILURES ===

#[test]
fn test_duplicate_target_is_rejected() {
    let mut parameters = parameters(&[("t1", vec![class_with_x()])]);
    let result = parameters.add_target(TargetProvider::new(
        LeafTarget::new("t1"),
        InMemoryModulesProvider::empty(),
    ));
    assert!(matches!(result, Err(CommonizerError::DuplicateTarget { .. })));
}

#[test]
fn test_provider_failure_names_the_target() {
    let result = run(&[
        ("t1", vec![class_with_x()]),
        ("t2", vec![class_with_x(), class_with_x()]),
    ]);
    match result {
        Err(CommonizerError::Provider { target, .. }) => assert_eq!(target, "t2"),
        other => panic!("expected provider failure, got {other:?}"),
    }
}
