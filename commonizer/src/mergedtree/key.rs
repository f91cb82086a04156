//! Identity keys used to align declarations across targets

use commonizer_metadata::{
    Constructor, Function, ModuleName, Name, PackageName, Property, Type, ValueParameter,
};
use std::fmt;

/// Identity of a merged node among its siblings.
///
/// Overloadable members carry a normalized signature built from parameter
/// and receiver types only; type parameters render positionally, so two
/// targets that name them differently still align. Functions and properties
/// live in different variants and can never share a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Module(ModuleName),
    Package(PackageName),
    Class(Name),
    TypeAlias(Name),
    Constructor {
        signature: String,
    },
    Function {
        name: Name,
        signature: String,
    },
    Property {
        name: Name,
        receiver: Option<String>,
    },
}

impl NodeKey {
    pub fn for_function(function: &Function) -> Self {
        let mut signature = String::new();
        if let Some(receiver) = &function.extension_receiver {
            signature.push_str(&receiver.to_string());
            signature.push('.');
        }
        signature.push_str(&value_parameters_signature(&function.value_parameters));
        NodeKey::Function {
            name: function.name.clone(),
            signature,
        }
    }

    pub fn for_property(property: &Property) -> Self {
        NodeKey::Property {
            name: property.name.clone(),
            receiver: property.extension_receiver.as_ref().map(Type::to_string),
        }
    }

    pub fn for_constructor(constructor: &Constructor) -> Self {
        NodeKey::Constructor {
            signature: value_parameters_signature(&constructor.value_parameters),
        }
    }

    pub fn is_classifier(&self) -> bool {
        matches!(self, NodeKey::Class(_) | NodeKey::TypeAlias(_))
    }
}

fn value_parameters_signature(parameters: &[ValueParameter]) -> String {
    let rendered: Vec<String> = parameters
        .iter()
        .map(|parameter| match &parameter.vararg_element {
            Some(element) => format!("vararg {element}"),
            None => parameter.ty.to_string(),
        })
        .collect();
    format!("({})", rendered.join(", "))
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Module(name) => write!(f, "module {name}"),
            NodeKey::Package(name) if name.is_root() => f.write_str("package <root>"),
            NodeKey::Package(name) => write!(f, "package {name}"),
            NodeKey::Class(name) => write!(f, "class {name}"),
            NodeKey::TypeAlias(name) => write!(f, "typealias {name}"),
            NodeKey::Constructor { signature } => write!(f, "constructor{signature}"),
            NodeKey::Function { name, signature } => match signature.split_once('(') {
                Some((receiver, parameters)) => write!(f, "fun {receiver}{name}({parameters}"),
                None => write!(f, "fun {name}{signature}"),
            },
            NodeKey::Property { name, receiver } => match receiver {
                Some(receiver) => write!(f, "val {receiver}.{name}"),
                None => write!(f, "val {name}"),
            },
        }
    }
}
