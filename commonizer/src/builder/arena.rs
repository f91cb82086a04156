//! Output declarations of one target, addressed by [`DeclId`]

use crate::error::CommonizerError;
use crate::mergedtree::Declaration;
use commonizer_metadata::ClassifierId;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Handle of a declaration inside a [`DeclarationArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Module,
    Package,
    Class,
    Constructor,
    Function,
    Property,
    TypeAlias,
}

impl DeclarationKind {
    pub fn of(declaration: &Declaration) -> Self {
        match declaration {
            Declaration::Module(_) => DeclarationKind::Module,
            Declaration::Package(_) => DeclarationKind::Package,
            Declaration::Class(_) => DeclarationKind::Class,
            Declaration::Constructor(_) => DeclarationKind::Constructor,
            Declaration::Function(_) => DeclarationKind::Function,
            Declaration::Property(_) => DeclarationKind::Property,
            Declaration::TypeAlias(_) => DeclarationKind::TypeAlias,
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeclarationKind::Module => "module",
            DeclarationKind::Package => "package",
            DeclarationKind::Class => "class",
            DeclarationKind::Constructor => "constructor",
            DeclarationKind::Function => "function",
            DeclarationKind::Property => "property",
            DeclarationKind::TypeAlias => "typealias",
        };
        f.write_str(text)
    }
}

/// How a built declaration relates to the shared target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Declared on the shared target; every leaf provides an actual
    Expect,
    /// Leaf declaration whose node was commonized
    Actual,
    /// Leaf declaration with no shared counterpart
    Plain,
}

/// Where a classifier referenced by a built declaration lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassifierRef {
    /// Built in this target's own output
    Declared(DeclId),
    /// Built from this target's dependee modules
    Dependency(DeclId),
    /// Provided by a dependee library or forward declared
    External(ClassifierId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltDeclaration {
    kind: DeclarationKind,
    name: String,
    owner: Option<DeclId>,
    marker: Marker,
    children: Vec<DeclId>,
    body: Option<Declaration>,
    references: IndexMap<ClassifierId, ClassifierRef>,
}

impl BuiltDeclaration {
    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Option<DeclId> {
        self.owner
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    pub fn children(&self) -> &[DeclId] {
        &self.children
    }

    /// The declaration itself; `None` only for skeletons that were never
    /// filled in
    pub fn body(&self) -> Option<&Declaration> {
        self.body.as_ref()
    }

    pub fn references(&self) -> &IndexMap<ClassifierId, ClassifierRef> {
        &self.references
    }

    pub fn reference(&self, id: &ClassifierId) -> Option<&ClassifierRef> {
        self.references.get(id)
    }
}

#[derive(Debug, Clone)]
pub struct DeclarationArena {
    target: String,
    declarations: Vec<BuiltDeclaration>,
    classifiers: HashMap<ClassifierId, DeclId>,
    modules: Vec<DeclId>,
}

impl DeclarationArena {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            declarations: Vec::new(),
            classifiers: HashMap::new(),
            modules: Vec::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, id: DeclId) -> Option<&BuiltDeclaration> {
        self.declarations.get(id.0)
    }

    /// Top-level module declarations, in the order they were allocated
    pub fn modules(&self) -> &[DeclId] {
        &self.modules
    }

    pub fn classifier(&self, id: &ClassifierId) -> Option<DeclId> {
        self.classifiers.get(id).copied()
    }

    /// Allocate an empty skeleton and attach it to its owner
    pub(crate) fn allocate(
        &mut self,
        kind: DeclarationKind,
        name: impl Into<String>,
        owner: Option<DeclId>,
        marker: Marker,
    ) -> DeclId {
        let id = DeclId(self.declarations.len());
        self.declarations.push(BuiltDeclaration {
            kind,
            name: name.into(),
            owner,
            marker,
            children: Vec::new(),
            body: None,
            references: IndexMap::new(),
        });
        match owner.and_then(|owner| self.declarations.get_mut(owner.0)) {
            Some(owner) => owner.children.push(id),
            None => self.modules.push(id),
        }
        id
    }

    pub(crate) fn register_classifier(
        &mut self,
        classifier: ClassifierId,
        id: DeclId,
    ) -> Result<(), CommonizerError> {
        if self.classifiers.contains_key(&classifier) {
            return Err(CommonizerError::ClassifierCollision {
                partition: format!("declarations built for {}", self.target),
                classifier,
            });
        }
        self.classifiers.insert(classifier, id);
        Ok(())
    }

    pub(crate) fn fill(
        &mut self,
        id: DeclId,
        body: Declaration,
        references: IndexMap<ClassifierId, ClassifierRef>,
    ) {
        if let Some(declaration) = self.declarations.get_mut(id.0) {
            declaration.body = Some(body);
            declaration.references = references;
        }
    }
}
