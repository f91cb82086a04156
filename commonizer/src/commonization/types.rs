//! Type commonization
//!
//! Two type references commonize when they denote the same type on every
//! target and that type can be named from the shared target. References to
//! type aliases that are not commonly available are expanded per target and
//! the expansions are compared instead.

use super::policy::{all_equal, all_true};
use super::CommonizationContext;
use commonizer_metadata::{Type, TypeParameter, TypeProjection, ValueParameter};

/// Upper limit on nested alias expansions for a single reference
const MAX_ALIAS_DEPTH: usize = 16;

/// `types` holds one reference per leaf target, in target order
pub fn commonize_type(types: &[&Type], context: &CommonizationContext<'_>) -> Option<Type> {
    commonize_at_depth(types, context, 0)
}

/// Commonize an optional type such as an extension receiver: absent
/// everywhere is fine, present on some targets only is not
pub fn commonize_optional_type(
    types: &[Option<&Type>],
    context: &CommonizationContext<'_>,
) -> Option<Option<Type>> {
    if types.iter().all(Option::is_none) {
        return Some(None);
    }
    let present: Vec<&Type> = types.iter().copied().collect::<Option<_>>()?;
    commonize_type(&present, context).map(Some)
}

fn commonize_at_depth(
    types: &[&Type],
    context: &CommonizationContext<'_>,
    depth: usize,
) -> Option<Type> {
    if let Some(common) = commonize_direct(types, context, depth) {
        return Some(common);
    }
    if depth >= MAX_ALIAS_DEPTH {
        return None;
    }

    let expanded: Vec<Type> = types
        .iter()
        .enumerate()
        .map(|(target_index, ty)| {
            expand_alias(target_index, ty, context).unwrap_or_else(|| (*ty).clone())
        })
        .collect();
    if expanded.iter().zip(types).all(|(expanded, ty)| expanded == *ty) {
        return None;
    }
    let expanded: Vec<&Type> = expanded.iter().collect();
    commonize_at_depth(&expanded, context, depth + 1)
}

fn commonize_direct(
    types: &[&Type],
    context: &CommonizationContext<'_>,
    depth: usize,
) -> Option<Type> {
    match *types.first()? {
        Type::Parameter { index, nullable } => {
            let same = types.iter().all(|ty| {
                matches!(ty, Type::Parameter { index: other, nullable: other_nullable }
                    if other == index && other_nullable == nullable)
            });
            same.then(|| Type::Parameter {
                index: *index,
                nullable: *nullable,
            })
        }
        Type::Classifier {
            id,
            arguments,
            nullable,
        } => {
            let mut argument_lists = Vec::with_capacity(types.len());
            for ty in types {
                match ty {
                    Type::Classifier {
                        id: other_id,
                        arguments: other_arguments,
                        nullable: other_nullable,
                    } if other_id == id
                        && other_nullable == nullable
                        && other_arguments.len() == arguments.len() =>
                    {
                        argument_lists.push(other_arguments)
                    }
                    _ => return None,
                }
            }
            if !context.is_available(id) {
                return None;
            }

            let arguments = (0..arguments.len())
                .map(|position| {
                    let projections: Vec<&TypeProjection> = argument_lists
                        .iter()
                        .map(|arguments| &arguments[position])
                        .collect();
                    commonize_projection(&projections, context, depth)
                })
                .collect::<Option<Vec<_>>>()?;
            Some(Type::Classifier {
                id: id.clone(),
                arguments,
                nullable: *nullable,
            })
        }
    }
}

fn commonize_projection(
    projections: &[&TypeProjection],
    context: &CommonizationContext<'_>,
    depth: usize,
) -> Option<TypeProjection> {
    match *projections.first()? {
        TypeProjection::Star => projections
            .iter()
            .all(|projection| matches!(projection, TypeProjection::Star))
            .then_some(TypeProjection::Star),
        TypeProjection::Projected { variance, .. } => {
            let types = projections
                .iter()
                .map(|projection| match projection {
                    TypeProjection::Projected {
                        variance: other,
                        ty,
                    } if other == variance => Some(ty),
                    _ => None,
                })
                .collect::<Option<Vec<&Type>>>()?;
            Some(TypeProjection::Projected {
                variance: *variance,
                ty: commonize_at_depth(&types, context, depth)?,
            })
        }
    }
}

/// Replace a reference to a type alias by its underlying type as seen from
/// one target; nullability of the reference carries over
fn expand_alias(
    target_index: usize,
    ty: &Type,
    context: &CommonizationContext<'_>,
) -> Option<Type> {
    let Type::Classifier {
        id,
        arguments,
        nullable,
    } = ty
    else {
        return None;
    };
    let alias = context.classifiers().type_alias(target_index, id)?;
    if alias.type_parameter_count != arguments.len() {
        return None;
    }
    let expanded = substitute(alias.underlying_type, arguments)?;
    Some(if *nullable { expanded.nullable() } else { expanded })
}

fn substitute(ty: &Type, arguments: &[TypeProjection]) -> Option<Type> {
    match ty {
        Type::Parameter { index, nullable } => match arguments.get(*index)? {
            TypeProjection::Projected { ty, .. } if *nullable => Some(ty.clone().nullable()),
            TypeProjection::Projected { ty, .. } => Some(ty.clone()),
            TypeProjection::Star => None,
        },
        Type::Classifier {
            id,
            arguments: inner,
            nullable,
        } => {
            let inner = inner
                .iter()
                .map(|projection| match projection {
                    TypeProjection::Star => Some(TypeProjection::Star),
                    TypeProjection::Projected { variance, ty } => {
                        Some(TypeProjection::Projected {
                            variance: *variance,
                            ty: substitute(ty, arguments)?,
                        })
                    }
                })
                .collect::<Option<Vec<_>>>()?;
            Some(Type::Classifier {
                id: id.clone(),
                arguments: inner,
                nullable: *nullable,
            })
        }
    }
}

/// Equal count; pairwise equal name, variance and reified flag; upper bounds
/// commonize element-wise
pub fn commonize_type_parameters(
    lists: &[&[TypeParameter]],
    context: &CommonizationContext<'_>,
) -> Option<Vec<TypeParameter>> {
    let count = all_equal(lists.iter().map(|list| list.len()))?;
    (0..count)
        .map(|position| {
            let parameters: Vec<&TypeParameter> =
                lists.iter().map(|list| &list[position]).collect();
            let name = all_equal(parameters.iter().map(|parameter| &parameter.name))?;
            let variance = all_equal(parameters.iter().map(|parameter| parameter.variance))?;
            let is_reified = all_equal(parameters.iter().map(|parameter| parameter.is_reified))?;
            let bound_count =
                all_equal(parameters.iter().map(|parameter| parameter.upper_bounds.len()))?;
            let upper_bounds = (0..bound_count)
                .map(|bound| {
                    let bounds: Vec<&Type> = parameters
                        .iter()
                        .map(|parameter| &parameter.upper_bounds[bound])
                        .collect();
                    commonize_type(&bounds, context)
                })
                .collect::<Option<Vec<_>>>()?;
            Some(TypeParameter {
                name: name.clone(),
                variance,
                is_reified,
                upper_bounds,
            })
        })
        .collect()
}

/// Equal count; pairwise equal names and vararg-ness; types commonize; a
/// default value survives only if every target declares one
pub fn commonize_value_parameters(
    lists: &[&[ValueParameter]],
    context: &CommonizationContext<'_>,
) -> Option<Vec<ValueParameter>> {
    let count = all_equal(lists.iter().map(|list| list.len()))?;
    (0..count)
        .map(|position| {
            let parameters: Vec<&ValueParameter> =
                lists.iter().map(|list| &list[position]).collect();
            let name = all_equal(parameters.iter().map(|parameter| &parameter.name))?;
            let types: Vec<&Type> = parameters.iter().map(|parameter| &parameter.ty).collect();
            let elements: Vec<Option<&Type>> = parameters
                .iter()
                .map(|parameter| parameter.vararg_element.as_ref())
                .collect();
            Some(ValueParameter {
                name: name.clone(),
                ty: commonize_type(&types, context)?,
                vararg_element: commonize_optional_type(&elements, context)?,
                has_default: all_true(parameters.iter().map(|parameter| parameter.has_default)),
            })
        })
        .collect()
}
