// Commonizer Metadata Types
// Type references as they appear in declaration signatures

use crate::ids::ClassifierId;
use std::fmt;

/// Declaration-site or use-site variance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variance {
    Invariant,
    In,
    Out,
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variance::Invariant => Ok(()),
            Variance::In => f.write_str("in "),
            Variance::Out => f.write_str("out "),
        }
    }
}

/// A type reference.
///
/// Type parameters are referenced by their position in the enclosing
/// declarations' type parameter lists (outermost first), never by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Classifier {
        id: ClassifierId,
        arguments: Vec<TypeProjection>,
        nullable: bool,
    },
    Parameter {
        index: usize,
        nullable: bool,
    },
}

/// A type argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeProjection {
    Star,
    Projected { variance: Variance, ty: Type },
}

impl Type {
    /// A non-null classifier type without arguments
    pub fn classifier(id: impl Into<ClassifierId>) -> Self {
        Self::Classifier {
            id: id.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// A non-null classifier type with invariant arguments
    pub fn generic(id: impl Into<ClassifierId>, arguments: Vec<Type>) -> Self {
        Self::Classifier {
            id: id.into(),
            arguments: arguments
                .into_iter()
                .map(|ty| TypeProjection::Projected {
                    variance: Variance::Invariant,
                    ty,
                })
                .collect(),
            nullable: false,
        }
    }

    pub fn parameter(index: usize) -> Self {
        Self::Parameter {
            index,
            nullable: false,
        }
    }

    pub fn nullable(self) -> Self {
        match self {
            Type::Classifier { id, arguments, .. } => Type::Classifier {
                id,
                arguments,
                nullable: true,
            },
            Type::Parameter { index, .. } => Type::Parameter {
                index,
                nullable: true,
            },
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Classifier { nullable, .. } | Type::Parameter { nullable, .. } => *nullable,
        }
    }

    pub fn classifier_id(&self) -> Option<&ClassifierId> {
        match self {
            Type::Classifier { id, .. } => Some(id),
            Type::Parameter { .. } => None,
        }
    }

    /// Visit every classifier referenced by this type, arguments included
    pub fn for_each_classifier<'a>(&'a self, f: &mut impl FnMut(&'a ClassifierId)) {
        if let Type::Classifier { id, arguments, .. } = self {
            f(id);
            for argument in arguments {
                if let TypeProjection::Projected { ty, .. } = argument {
                    ty.for_each_classifier(f);
                }
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Classifier {
                id,
                arguments,
                nullable,
            } => {
                write!(f, "{id}")?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    for (i, argument) in arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{argument}")?;
                    }
                    f.write_str(">")?;
                }
                if *nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Type::Parameter { index, nullable } => {
                write!(f, "#{index}")?;
                if *nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TypeProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeProjection::Star => f.write_str("*"),
            TypeProjection::Projected { variance, ty } => write!(f, "{variance}{ty}"),
        }
    }
}
