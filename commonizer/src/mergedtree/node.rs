//! Merged nodes: one declaration identity, one slot per target

use crate::error::CommonizerError;
use crate::mergedtree::key::NodeKey;
use crate::mergedtree::tree::NodeId;
use commonizer_metadata::{
    ClassHeader, ClassifierId, Constructor, Function, ModuleLocation, ModuleName, PackageName,
    Property, Type, TypeAlias, TypeParameter, ValueParameter,
};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleHeader {
    pub name: ModuleName,
    pub location: ModuleLocation,
}

/// A single declaration without its children, as stored in a slot
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Module(ModuleHeader),
    Package(PackageName),
    Class(ClassHeader),
    Constructor(Constructor),
    Function(Function),
    Property(Property),
    TypeAlias(TypeAlias),
}

impl Declaration {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Declaration::Module(_) => "module",
            Declaration::Package(_) => "package",
            Declaration::Class(_) => "class",
            Declaration::Constructor(_) => "constructor",
            Declaration::Function(_) => "function",
            Declaration::Property(_) => "property",
            Declaration::TypeAlias(_) => "type alias",
        }
    }

    /// Visit every classifier the declaration's own signature refers to
    pub fn for_each_classifier<'a>(&'a self, f: &mut impl FnMut(&'a ClassifierId)) {
        fn type_parameters<'a>(
            parameters: &'a [TypeParameter],
            f: &mut impl FnMut(&'a ClassifierId),
        ) {
            for parameter in parameters {
                for bound in &parameter.upper_bounds {
                    bound.for_each_classifier(f);
                }
            }
        }

        fn value_parameters<'a>(
            parameters: &'a [ValueParameter],
            f: &mut impl FnMut(&'a ClassifierId),
        ) {
            for parameter in parameters {
                parameter.ty.for_each_classifier(f);
                if let Some(element) = &parameter.vararg_element {
                    element.for_each_classifier(f);
                }
            }
        }

        fn optional<'a>(ty: &'a Option<Type>, f: &mut impl FnMut(&'a ClassifierId)) {
            if let Some(ty) = ty {
                ty.for_each_classifier(f);
            }
        }

        match self {
            Declaration::Module(_) | Declaration::Package(_) => {}
            Declaration::Class(header) => {
                type_parameters(&header.type_parameters, f);
                for supertype in &header.supertypes {
                    supertype.for_each_classifier(f);
                }
                header.annotations.iter().for_each(&mut *f);
            }
            Declaration::Constructor(constructor) => {
                value_parameters(&constructor.value_parameters, f);
                constructor.annotations.iter().for_each(&mut *f);
            }
            Declaration::Function(function) => {
                type_parameters(&function.type_parameters, f);
                optional(&function.extension_receiver, f);
                value_parameters(&function.value_parameters, f);
                function.return_type.for_each_classifier(f);
                function.annotations.iter().for_each(&mut *f);
            }
            Declaration::Property(property) => {
                type_parameters(&property.type_parameters, f);
                optional(&property.extension_receiver, f);
                property.return_type.for_each_classifier(f);
                property.annotations.iter().for_each(&mut *f);
            }
            Declaration::TypeAlias(type_alias) => {
                type_parameters(&type_alias.type_parameters, f);
                type_alias.underlying_type.for_each_classifier(f);
                type_alias.annotations.iter().for_each(&mut *f);
            }
        }
    }
}

/// One target's view of a merged node
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Present(T),
    Absent,
}

impl<T> Slot<T> {
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Slot::Present(value) => Some(value),
            Slot::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Slot::Present(_))
    }
}

/// The commonized slot of a merged node; written at most once
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CommonSlot {
    #[default]
    Unset,
    Commonized(Declaration),
    LeftAsIs,
}

#[derive(Debug, Clone)]
pub struct MergedNode {
    key: NodeKey,
    parent: Option<NodeId>,
    targets: Box<[Slot<Declaration>]>,
    common: CommonSlot,
    children: IndexMap<NodeKey, NodeId>,
}

impl MergedNode {
    pub(crate) fn new(key: NodeKey, parent: Option<NodeId>, target_count: usize) -> Self {
        Self {
            key,
            parent,
            targets: (0..target_count).map(|_| Slot::Absent).collect(),
            common: CommonSlot::Unset,
            children: IndexMap::new(),
        }
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot<Declaration>> {
        self.targets.get(index)
    }

    pub fn target_declaration(&self, index: usize) -> Option<&Declaration> {
        self.targets.get(index).and_then(Slot::as_present)
    }

    pub fn slots(&self) -> &[Slot<Declaration>] {
        &self.targets
    }

    /// Every target's declaration, or `None` if any target lacks this node
    pub fn all_present(&self) -> Option<Vec<&Declaration>> {
        self.targets.iter().map(Slot::as_present).collect()
    }

    pub fn present_count(&self) -> usize {
        self.targets.iter().filter(|slot| slot.is_present()).count()
    }

    pub fn common(&self) -> &CommonSlot {
        &self.common
    }

    pub fn common_declaration(&self) -> Option<&Declaration> {
        match &self.common {
            CommonSlot::Commonized(declaration) => Some(declaration),
            CommonSlot::Unset | CommonSlot::LeftAsIs => None,
        }
    }

    pub fn is_commonized(&self) -> bool {
        matches!(self.common, CommonSlot::Commonized(_))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child(&self, key: &NodeKey) -> Option<NodeId> {
        self.children.get(key).copied()
    }

    pub(crate) fn add_child(&mut self, key: NodeKey, id: NodeId) {
        self.children.insert(key, id);
    }

    /// Fill one target's slot. Returns false if the slot was already filled.
    pub(crate) fn fill_slot(
        &mut self,
        index: usize,
        declaration: Declaration,
    ) -> Result<bool, CommonizerError> {
        let count = self.targets.len();
        let slot = self
            .targets
            .get_mut(index)
            .ok_or_else(|| CommonizerError::SlotOutOfRange {
                key: self.key.to_string(),
                index,
                count,
            })?;
        if slot.is_present() {
            return Ok(false);
        }
        *slot = Slot::Present(declaration);
        Ok(true)
    }

    pub(crate) fn set_common(&mut self, value: CommonSlot) -> Result<(), CommonizerError> {
        if self.common != CommonSlot::Unset {
            return Err(CommonizerError::SlotAlreadyWritten {
                key: self.key.to_string(),
            });
        }
        self.common = value;
        Ok(())
    }
}
