//! Read-only views over built modules

use crate::builder::arena::{BuiltDeclaration, ClassifierRef, DeclId, DeclarationArena, Marker};
use crate::mergedtree::Declaration;
use commonizer_metadata::{Class, Module, ModuleName, Package};
use std::sync::Arc;

/// One module built for one target
#[derive(Debug, Clone)]
pub struct BuiltModule {
    declarations: Arc<DeclarationArena>,
    dependencies: Arc<DeclarationArena>,
    id: DeclId,
}

impl BuiltModule {
    pub(crate) fn new(
        declarations: Arc<DeclarationArena>,
        dependencies: Arc<DeclarationArena>,
        id: DeclId,
    ) -> Self {
        Self {
            declarations,
            dependencies,
            id,
        }
    }

    pub fn id(&self) -> DeclId {
        self.id
    }

    pub fn name(&self) -> ModuleName {
        ModuleName::new(self.root().map(BuiltDeclaration::name).unwrap_or_default())
    }

    pub fn root(&self) -> Option<&BuiltDeclaration> {
        self.declarations.get(self.id)
    }

    pub fn marker(&self) -> Option<Marker> {
        self.root().map(BuiltDeclaration::marker)
    }

    pub fn arena(&self) -> &DeclarationArena {
        &self.declarations
    }

    pub fn get(&self, id: DeclId) -> Option<&BuiltDeclaration> {
        self.declarations.get(id)
    }

    pub fn children(&self, id: DeclId) -> impl Iterator<Item = &BuiltDeclaration> + '_ {
        self.declarations
            .get(id)
            .map(BuiltDeclaration::children)
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.declarations.get(*child))
    }

    /// Follow declaration names from the module root
    pub fn find(&self, path: &[&str]) -> Option<&BuiltDeclaration> {
        let mut current = self.id;
        for name in path {
            let declaration = self.declarations.get(current)?;
            current = declaration
                .children()
                .iter()
                .copied()
                .find(|child| {
                    self.declarations
                        .get(*child)
                        .is_some_and(|child| child.name() == *name)
                })?;
        }
        self.declarations.get(current)
    }

    /// The declaration a classifier reference points at, if it was built in
    /// this run
    pub fn resolve(&self, reference: &ClassifierRef) -> Option<&BuiltDeclaration> {
        match reference {
            ClassifierRef::Declared(id) => self.declarations.get(*id),
            ClassifierRef::Dependency(id) => self.dependencies.get(*id),
            ClassifierRef::External(_) => None,
        }
    }

    /// Render the built declarations back into the input model. `None` if a
    /// declaration of the module was never filled in.
    pub fn to_module(&self) -> Option<Module> {
        let root = self.root()?;
        let Some(Declaration::Module(header)) = root.body() else {
            return None;
        };
        let mut module = Module::new(header.name.as_str(), header.location.path());
        for &package_id in root.children() {
            module = module.with_package(self.render_package(package_id)?);
        }
        Some(module)
    }

    fn render_package(&self, id: DeclId) -> Option<Package> {
        let declaration = self.declarations.get(id)?;
        let Some(Declaration::Package(name)) = declaration.body() else {
            return None;
        };
        let mut package = Package::new(name.clone());
        for &child_id in declaration.children() {
            let child = self.declarations.get(child_id)?;
            match child.body()? {
                Declaration::Class(_) => package.classes.push(self.render_class(child_id)?),
                Declaration::TypeAlias(alias) => package.type_aliases.push(alias.clone()),
                Declaration::Function(function) => package.functions.push(function.clone()),
                Declaration::Property(property) => package.properties.push(property.clone()),
                Declaration::Module(_) | Declaration::Package(_) | Declaration::Constructor(_) => {
                    return None
                }
            }
        }
        Some(package)
    }

    fn render_class(&self, id: DeclId) -> Option<Class> {
        let declaration = self.declarations.get(id)?;
        let Some(Declaration::Class(header)) = declaration.body() else {
            return None;
        };
        let mut class = Class {
            header: header.clone(),
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            classes: Vec::new(),
        };
        for &child_id in declaration.children() {
            let child = self.declarations.get(child_id)?;
            match child.body()? {
                Declaration::Class(_) => class.classes.push(self.render_class(child_id)?),
                Declaration::Constructor(constructor) => {
                    class.constructors.push(constructor.clone())
                }
                Declaration::Function(function) => class.functions.push(function.clone()),
                Declaration::Property(property) => class.properties.push(property.clone()),
                Declaration::Module(_) | Declaration::Package(_) | Declaration::TypeAlias(_) => {
                    return None
                }
            }
        }
        Some(class)
    }
}
