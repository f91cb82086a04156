//! Tree mergers
//!
//! Both mergers walk every target's modules level by level and align the
//! children by [`NodeKey`]. The main merger works on the targets' own modules
//! and records which modules each target did not supply; the dependency
//! merger works on the targets' dependee modules and produces the baseline
//! tree used to resolve references into dependencies.

use crate::classifiers::{ClassifierIndex, ProvidedClassifier};
use crate::error::CommonizerError;
use crate::mergedtree::key::NodeKey;
use crate::mergedtree::node::{Declaration, ModuleHeader};
use crate::mergedtree::tree::{MergedTree, NodeId};
use crate::parameters::CommonizerSettings;
use crate::target::LeafTarget;
use commonizer_metadata::{Class, ClassifierId, Module, ModuleInfo, Package};
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct TreeMergeResult {
    pub tree: MergedTree,
    /// For each leaf target, the modules other targets supplied but it did not
    pub missing_module_infos: IndexMap<LeafTarget, Vec<ModuleInfo>>,
}

/// Merges the targets' own modules
#[derive(Debug)]
pub struct TreeMerger<'a> {
    settings: &'a CommonizerSettings,
    targets: &'a [LeafTarget],
}

impl<'a> TreeMerger<'a> {
    pub fn new(settings: &'a CommonizerSettings, targets: &'a [LeafTarget]) -> Self {
        Self { settings, targets }
    }

    /// `modules` holds one list per leaf target, in target order
    pub fn merge(
        &self,
        modules: &[Vec<Module>],
        classifiers: &mut ClassifierIndex,
    ) -> Result<TreeMergeResult, CommonizerError> {
        let mut merge = Merge {
            tree: MergedTree::new(self.targets.len()),
            settings: self.settings,
            classifiers,
            register_declarations: true,
        };
        for (target_index, target_modules) in modules.iter().enumerate() {
            for module in target_modules {
                merge.process_module(target_index, module)?;
            }
        }

        let tree = merge.tree;
        let missing_module_infos = collect_missing_modules(&tree, self.targets);
        tracing::debug!(
            nodes = tree.len(),
            modules = tree.modules().count(),
            "merged target modules"
        );
        Ok(TreeMergeResult {
            tree,
            missing_module_infos,
        })
    }
}

/// Merges the targets' dependee modules
#[derive(Debug)]
pub struct DependencyTreeMerger<'a> {
    settings: &'a CommonizerSettings,
    targets: &'a [LeafTarget],
}

impl<'a> DependencyTreeMerger<'a> {
    pub fn new(settings: &'a CommonizerSettings, targets: &'a [LeafTarget]) -> Self {
        Self { settings, targets }
    }

    /// Dependee classifiers are already indexed as dependee libraries, so
    /// only forward-declaration references are recorded here.
    pub fn merge(
        &self,
        modules: &[Vec<Module>],
        classifiers: &mut ClassifierIndex,
    ) -> Result<TreeMergeResult, CommonizerError> {
        let mut merge = Merge {
            tree: MergedTree::new(self.targets.len()),
            settings: self.settings,
            classifiers,
            register_declarations: false,
        };
        for (target_index, target_modules) in modules.iter().enumerate() {
            for module in target_modules {
                merge.process_module(target_index, module)?;
            }
        }

        let tree = merge.tree;
        tracing::debug!(nodes = tree.len(), "merged dependee modules");
        Ok(TreeMergeResult {
            tree,
            missing_module_infos: self
                .targets
                .iter()
                .map(|target| (target.clone(), Vec::new()))
                .collect(),
        })
    }
}

struct Merge<'a> {
    tree: MergedTree,
    settings: &'a CommonizerSettings,
    classifiers: &'a mut ClassifierIndex,
    register_declarations: bool,
}

impl Merge<'_> {
    fn process_module(&mut self, target: usize, module: &Module) -> Result<(), CommonizerError> {
        let module_id = self.tree.insert(
            None,
            NodeKey::Module(module.name.clone()),
            target,
            Declaration::Module(ModuleHeader {
                name: module.name.clone(),
                location: module.location.clone(),
            }),
        )?;
        for package in &module.packages {
            self.process_package(target, module_id, package)?;
        }
        Ok(())
    }

    fn process_package(
        &mut self,
        target: usize,
        module_id: NodeId,
        package: &Package,
    ) -> Result<(), CommonizerError> {
        let package_id = self.tree.insert(
            Some(module_id),
            NodeKey::Package(package.name.clone()),
            target,
            Declaration::Package(package.name.clone()),
        )?;

        for property in &package.properties {
            self.process_leaf(
                target,
                package_id,
                NodeKey::for_property(property),
                Declaration::Property(property.clone()),
            )?;
        }
        for function in &package.functions {
            self.process_leaf(
                target,
                package_id,
                NodeKey::for_function(function),
                Declaration::Function(function.clone()),
            )?;
        }
        for class in &package.classes {
            let id = ClassifierId::new(package.name.clone(), class.name().as_str());
            self.process_class(target, package_id, id, class)?;
        }
        for type_alias in &package.type_aliases {
            let id = ClassifierId::new(package.name.clone(), type_alias.name.as_str());
            if self.register_declarations {
                self.classifiers.add_target_declaration(
                    target,
                    id,
                    ProvidedClassifier::TypeAlias {
                        type_parameter_count: type_alias.type_parameters.len(),
                        underlying_type: type_alias.underlying_type.clone(),
                    },
                )?;
            }
            self.process_leaf(
                target,
                package_id,
                NodeKey::TypeAlias(type_alias.name.clone()),
                Declaration::TypeAlias(type_alias.clone()),
            )?;
        }
        Ok(())
    }

    fn process_class(
        &mut self,
        target: usize,
        parent_id: NodeId,
        id: ClassifierId,
        class: &Class,
    ) -> Result<(), CommonizerError> {
        let declaration = Declaration::Class(class.header.clone());
        self.record_forward_declarations(&declaration);
        let class_id = self.tree.insert(
            Some(parent_id),
            NodeKey::Class(class.name().clone()),
            target,
            declaration,
        )?;
        if self.register_declarations {
            self.classifiers.add_target_declaration(
                target,
                id.clone(),
                ProvidedClassifier::Class,
            )?;
        }

        for constructor in &class.constructors {
            self.process_leaf(
                target,
                class_id,
                NodeKey::for_constructor(constructor),
                Declaration::Constructor(constructor.clone()),
            )?;
        }
        for property in &class.properties {
            self.process_leaf(
                target,
                class_id,
                NodeKey::for_property(property),
                Declaration::Property(property.clone()),
            )?;
        }
        for function in &class.functions {
            self.process_leaf(
                target,
                class_id,
                NodeKey::for_function(function),
                Declaration::Function(function.clone()),
            )?;
        }
        for nested in &class.classes {
            self.process_class(target, class_id, id.nested(nested.name().as_str()), nested)?;
        }
        Ok(())
    }

    fn process_leaf(
        &mut self,
        target: usize,
        parent_id: NodeId,
        key: NodeKey,
        declaration: Declaration,
    ) -> Result<(), CommonizerError> {
        self.record_forward_declarations(&declaration);
        self.tree.insert(Some(parent_id), key, target, declaration)?;
        Ok(())
    }

    fn record_forward_declarations(&mut self, declaration: &Declaration) {
        if self.settings.forward_declaration_packages.is_empty() {
            return;
        }
        let mut forward = Vec::new();
        declaration.for_each_classifier(&mut |id| {
            if self.settings.is_forward_declaration(id.package()) {
                forward.push(id.clone());
            }
        });
        for id in forward {
            self.classifiers.add_forward_declaration(id);
        }
    }
}

/// Walk module roots in union order and record, per target, every module
/// whose slot is absent. The location comes from the first target that
/// supplied the module.
fn collect_missing_modules(
    tree: &MergedTree,
    targets: &[LeafTarget],
) -> IndexMap<LeafTarget, Vec<ModuleInfo>> {
    let mut missing: IndexMap<LeafTarget, Vec<ModuleInfo>> = targets
        .iter()
        .map(|target| (target.clone(), Vec::new()))
        .collect();

    for module_id in tree.modules() {
        let node = tree.node(module_id);
        let header = node.slots().iter().find_map(|slot| match slot.as_present() {
            Some(Declaration::Module(header)) => Some(header),
            _ => None,
        });
        let Some(header) = header else { continue };

        for (index, target) in targets.iter().enumerate() {
            if node.target_declaration(index).is_none() {
                if let Some(infos) = missing.get_mut(target) {
                    infos.push(ModuleInfo {
                        name: header.name.clone(),
                        location: header.location.clone(),
                    });
                }
            }
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::ProvidedClassifiers;
    use commonizer_metadata::{Function, Property, Type};

    fn targets() -> Vec<LeafTarget> {
        vec![LeafTarget::new("linux"), LeafTarget::new("macos")]
    }

    fn index() -> ClassifierIndex {
        ClassifierIndex::new(
            targets(),
            vec![ProvidedClassifiers::new("a"), ProvidedClassifiers::new("b")],
            ProvidedClassifiers::new("shared"),
        )
    }

    fn int() -> Type {
        Type::classifier("lang/Int")
    }

    #[test]
    fn test_children_align_by_key() {
        let linux = Module::new("m", "/linux/m").with_package(
            Package::new("p")
                .with_class(Class::class("C").with_property(Property::val("x", int())))
                .with_function(Function::new("only_linux", int())),
        );
        let macos = Module::new("m", "/macos/m")
            .with_package(Package::new("p").with_class(Class::class("C").with_property(Property::val("x", int()))));

        let settings = CommonizerSettings::default();
        let targets = targets();
        let mut classifiers = index();
        let result = TreeMerger::new(&settings, &targets)
            .merge(&[vec![linux], vec![macos]], &mut classifiers)
            .unwrap();

        let module = NodeKey::Module("m".into());
        let package = NodeKey::Package("p".into());
        let class_id = result
            .tree
            .find(&[module.clone(), package.clone(), NodeKey::Class("C".into())])
            .unwrap();
        assert_eq!(result.tree.node(class_id).present_count(), 2);

        let function_id = result
            .tree
            .find(&[
                module,
                package,
                NodeKey::for_function(&Function::new("only_linux", int())),
            ])
            .unwrap();
        let function = result.tree.node(function_id);
        assert!(function.slot(0).unwrap().is_present());
        assert!(!function.slot(1).unwrap().is_present());
    }

    #[test]
    fn test_missing_modules_take_first_supplier_location() {
        let linux = vec![Module::new("a", "/linux/a"), Module::new("b", "/linux/b")];
        let macos = vec![Module::new("b", "/macos/b"), Module::new("c", "/macos/c")];

        let settings = CommonizerSettings::default();
        let targets = targets();
        let mut classifiers = index();
        let result = TreeMerger::new(&settings, &targets)
            .merge(&[linux, macos], &mut classifiers)
            .unwrap();

        let linux_missing = &result.missing_module_infos[&LeafTarget::new("linux")];
        assert_eq!(linux_missing.len(), 1);
        assert_eq!(linux_missing[0].name.as_str(), "c");
        assert_eq!(linux_missing[0].location.to_string(), "/macos/c");

        let macos_missing = &result.missing_module_infos[&LeafTarget::new("macos")];
        assert_eq!(macos_missing.len(), 1);
        assert_eq!(macos_missing[0].location.to_string(), "/linux/a");
    }

    #[test]
    fn test_own_classifiers_are_registered_per_target() {
        let linux = Module::new("m", "/m").with_package(Package::new("p").with_class(Class::class("C")));
        let duplicate = Module::new("n", "/n").with_package(Package::new("p").with_class(Class::class("C")));

        let settings = CommonizerSettings::default();
        let targets = targets();
        let mut classifiers = index();
        let result = TreeMerger::new(&settings, &targets)
            .merge(&[vec![linux, duplicate], vec![]], &mut classifiers);
        assert!(matches!(
            result,
            Err(CommonizerError::ClassifierCollision { .. })
        ));
    }

    #[test]
    fn test_forward_declarations_are_recorded() {
        let module = Module::new("m", "/m").with_package(Package::new("p").with_function(
            Function::new("open_file", Type::classifier("opaque.structs/FILE").nullable()),
        ));

        let settings =
            CommonizerSettings::default().with_forward_declaration_package("opaque.structs");
        let targets = targets();
        let mut classifiers = index();
        DependencyTreeMerger::new(&settings, &targets)
            .merge(&[vec![module], vec![]], &mut classifiers)
            .unwrap();

        assert!(classifiers.is_forward_declaration(&ClassifierId::parse("opaque.structs/FILE")));
    }
}
