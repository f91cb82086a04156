// Commonizer Metadata Declarations
// Read-only declaration trees handed over by a target's modules provider

use crate::ids::{ClassifierId, ModuleName, Name, PackageName};
use crate::types::{Type, Variance};
use std::fmt;
use std::path::{Path, PathBuf};

/// Declared visibility, ordered from most to least restrictive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Private,
    Protected,
    Internal,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Sealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    Object,
    AnnotationClass,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::EnumClass => "enum class",
            ClassKind::EnumEntry => "enum entry",
            ClassKind::Object => "object",
            ClassKind::AnnotationClass => "annotation class",
        };
        f.write_str(text)
    }
}

/// Where a module's original library lives on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleLocation(PathBuf);

impl ModuleLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ModuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Name and location of a module, available without loading its declarations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleInfo {
    pub name: ModuleName,
    pub location: ModuleLocation,
}

/// Compile-time constant initializer of a `const` property
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Null,
    Boolean(bool),
    Char(char),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    pub name: Name,
    pub variance: Variance,
    pub is_reified: bool,
    pub upper_bounds: Vec<Type>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Name::new(name),
            variance: Variance::Invariant,
            is_reified: false,
            upper_bounds: Vec::new(),
        }
    }

    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_upper_bound(mut self, bound: Type) -> Self {
        self.upper_bounds.push(bound);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueParameter {
    pub name: Name,
    pub ty: Type,
    /// Element type when the parameter is variadic
    pub vararg_element: Option<Type>,
    pub has_default: bool,
}

impl ValueParameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: Name::new(name),
            ty,
            vararg_element: None,
            has_default: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// A library module: the root of one target's declaration tree
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: ModuleName,
    pub location: ModuleLocation,
    pub packages: Vec<Package>,
}

impl Module {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: ModuleName::new(name),
            location: ModuleLocation::new(location),
            packages: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    pub fn info(&self) -> ModuleInfo {
        ModuleInfo {
            name: self.name.clone(),
            location: self.location.clone(),
        }
    }

    pub fn package(&self, name: &PackageName) -> Option<&Package> {
        self.packages.iter().find(|package| &package.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    pub name: PackageName,
    pub classes: Vec<Class>,
    pub type_aliases: Vec<TypeAlias>,
    pub functions: Vec<Function>,
    pub properties: Vec<Property>,
}

impl Package {
    pub fn new(name: impl Into<PackageName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_type_alias(mut self, type_alias: TypeAlias) -> Self {
        self.type_aliases.push(type_alias);
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|class| class.header.name.as_str() == name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name.as_str() == name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name.as_str() == name)
    }

    pub fn type_alias(&self, name: &str) -> Option<&TypeAlias> {
        self.type_aliases
            .iter()
            .find(|type_alias| type_alias.name.as_str() == name)
    }
}

/// Everything about a class except its members
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
    pub name: Name,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub modality: Modality,
    pub type_parameters: Vec<TypeParameter>,
    pub supertypes: Vec<Type>,
    pub annotations: Vec<ClassifierId>,
    /// Simple name of the companion object, if any
    pub companion: Option<Name>,
    pub is_companion: bool,
    pub is_inner: bool,
    pub is_data: bool,
    pub is_value: bool,
    pub is_external: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub header: ClassHeader,
    pub constructors: Vec<Constructor>,
    pub functions: Vec<Function>,
    pub properties: Vec<Property>,
    pub classes: Vec<Class>,
}

impl Class {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        let modality = match kind {
            ClassKind::Interface => Modality::Abstract,
            _ => Modality::Final,
        };
        Self {
            header: ClassHeader {
                name: Name::new(name),
                kind,
                visibility: Visibility::Public,
                modality,
                type_parameters: Vec::new(),
                supertypes: Vec::new(),
                annotations: Vec::new(),
                companion: None,
                is_companion: false,
                is_inner: false,
                is_data: false,
                is_value: false,
                is_external: false,
            },
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn enum_class(name: impl Into<String>, entries: &[&str]) -> Self {
        let mut class = Self::new(name, ClassKind::EnumClass);
        class.classes = entries
            .iter()
            .map(|entry| Self::new(*entry, ClassKind::EnumEntry))
            .collect();
        class
    }

    pub fn name(&self) -> &Name {
        &self.header.name
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.header.modality = modality;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.header.visibility = visibility;
        self
    }

    pub fn with_type_parameter(mut self, parameter: TypeParameter) -> Self {
        self.header.type_parameters.push(parameter);
        self
    }

    pub fn with_supertype(mut self, supertype: Type) -> Self {
        self.header.supertypes.push(supertype);
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<ClassifierId>) -> Self {
        self.header.annotations.push(annotation.into());
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_nested_class(mut self, class: Class) -> Self {
        self.classes.push(class);
        self
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name.as_str() == name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name.as_str() == name)
    }

    pub fn nested_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|class| class.header.name.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub visibility: Visibility,
    pub is_primary: bool,
    pub value_parameters: Vec<ValueParameter>,
    pub annotations: Vec<ClassifierId>,
}

impl Constructor {
    pub fn primary(value_parameters: Vec<ValueParameter>) -> Self {
        Self {
            visibility: Visibility::Public,
            is_primary: true,
            value_parameters,
            annotations: Vec::new(),
        }
    }

    pub fn secondary(value_parameters: Vec<ValueParameter>) -> Self {
        Self {
            is_primary: false,
            ..Self::primary(value_parameters)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Name,
    pub visibility: Visibility,
    pub modality: Modality,
    pub type_parameters: Vec<TypeParameter>,
    pub extension_receiver: Option<Type>,
    pub value_parameters: Vec<ValueParameter>,
    pub return_type: Type,
    pub annotations: Vec<ClassifierId>,
    pub is_suspend: bool,
    pub is_inline: bool,
    pub is_operator: bool,
    pub is_infix: bool,
    pub is_external: bool,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: Name::new(name),
            visibility: Visibility::Public,
            modality: Modality::Final,
            type_parameters: Vec::new(),
            extension_receiver: None,
            value_parameters: Vec::new(),
            return_type,
            annotations: Vec::new(),
            is_suspend: false,
            is_inline: false,
            is_operator: false,
            is_infix: false,
            is_external: false,
        }
    }

    pub fn with_parameter(mut self, parameter: ValueParameter) -> Self {
        self.value_parameters.push(parameter);
        self
    }

    pub fn with_type_parameter(mut self, parameter: TypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn with_receiver(mut self, receiver: Type) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: Name,
    pub visibility: Visibility,
    pub modality: Modality,
    pub type_parameters: Vec<TypeParameter>,
    pub extension_receiver: Option<Type>,
    pub return_type: Type,
    pub annotations: Vec<ClassifierId>,
    pub is_var: bool,
    pub is_const: bool,
    pub const_value: Option<ConstValue>,
    /// Only meaningful for `var` properties
    pub setter_visibility: Option<Visibility>,
    pub is_external: bool,
}

impl Property {
    pub fn val(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: Name::new(name),
            visibility: Visibility::Public,
            modality: Modality::Final,
            type_parameters: Vec::new(),
            extension_receiver: None,
            return_type,
            annotations: Vec::new(),
            is_var: false,
            is_const: false,
            const_value: None,
            setter_visibility: None,
            is_external: false,
        }
    }

    pub fn var(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            is_var: true,
            setter_visibility: Some(Visibility::Public),
            ..Self::val(name, return_type)
        }
    }

    pub fn constant(name: impl Into<String>, return_type: Type, value: ConstValue) -> Self {
        Self {
            is_const: true,
            const_value: Some(value),
            ..Self::val(name, return_type)
        }
    }

    pub fn with_receiver(mut self, receiver: Type) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: Name,
    pub visibility: Visibility,
    pub type_parameters: Vec<TypeParameter>,
    pub underlying_type: Type,
    pub annotations: Vec<ClassifierId>,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, underlying_type: Type) -> Self {
        Self {
            name: Name::new(name),
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            underlying_type,
            annotations: Vec::new(),
        }
    }

    pub fn with_type_parameter(mut self, parameter: TypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }
}
