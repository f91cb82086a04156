// Classifier Strategies
// Class headers and type aliases

use super::policy::{all_equal, all_true, annotations};
use super::types::{commonize_type, commonize_type_parameters};
use super::CommonizationContext;
use commonizer_metadata::{ClassHeader, ClassifierId, Type, TypeAlias};

pub fn commonize_class(
    headers: &[&ClassHeader],
    context: &CommonizationContext<'_>,
) -> Option<ClassHeader> {
    let name = all_equal(headers.iter().map(|header| &header.name))?;
    let kind = all_equal(headers.iter().map(|header| header.kind))?;
    let visibility = all_equal(headers.iter().map(|header| header.visibility))?;
    let modality = all_equal(headers.iter().map(|header| header.modality))?;
    let companion = all_equal(headers.iter().map(|header| &header.companion))?;
    let is_companion = all_equal(headers.iter().map(|header| header.is_companion))?;
    let is_inner = all_equal(headers.iter().map(|header| header.is_inner))?;
    let is_value = all_equal(headers.iter().map(|header| header.is_value))?;

    let type_parameter_lists: Vec<_> = headers
        .iter()
        .map(|header| header.type_parameters.as_slice())
        .collect();
    let type_parameters = commonize_type_parameters(&type_parameter_lists, context)?;

    let annotation_lists: Vec<&[ClassifierId]> = headers
        .iter()
        .map(|header| header.annotations.as_slice())
        .collect();

    Some(ClassHeader {
        name: name.clone(),
        kind,
        visibility,
        modality,
        type_parameters,
        supertypes: commonize_supertypes(headers, context),
        annotations: annotations(&annotation_lists, context),
        companion: companion.clone(),
        is_companion,
        is_inner,
        is_data: all_true(headers.iter().map(|header| header.is_data)),
        is_value,
        is_external: all_true(headers.iter().map(|header| header.is_external)),
    })
}

/// Identical id sequences keep their order, otherwise the ids present on
/// every target are kept sorted. A supertype that does not commonize is
/// dropped.
fn commonize_supertypes(headers: &[&ClassHeader], context: &CommonizationContext<'_>) -> Vec<Type> {
    let id_lists: Vec<Vec<&ClassifierId>> = headers
        .iter()
        .map(|header| {
            header
                .supertypes
                .iter()
                .filter_map(Type::classifier_id)
                .collect()
        })
        .collect();
    let Some((first, rest)) = id_lists.split_first() else {
        return Vec::new();
    };

    let ids: Vec<&ClassifierId> = if rest.iter().all(|ids| ids == first) {
        first.clone()
    } else {
        let mut common: Vec<&ClassifierId> = first
            .iter()
            .filter(|id| rest.iter().all(|ids| ids.contains(id)))
            .copied()
            .collect();
        common.sort();
        common.dedup();
        common
    };

    ids.into_iter()
        .filter_map(|id| {
            let supertypes = headers
                .iter()
                .map(|header| {
                    header
                        .supertypes
                        .iter()
                        .find(|supertype| supertype.classifier_id() == Some(id))
                })
                .collect::<Option<Vec<&Type>>>()?;
            let common = commonize_type(&supertypes, context);
            if common.is_none() {
                tracing::trace!(supertype = %id, "supertype dropped");
            }
            common
        })
        .collect()
}

pub fn commonize_type_alias(
    aliases: &[&TypeAlias],
    context: &CommonizationContext<'_>,
) -> Option<TypeAlias> {
    let name = all_equal(aliases.iter().map(|alias| &alias.name))?;
    let visibility = all_equal(aliases.iter().map(|alias| alias.visibility))?;

    let type_parameter_lists: Vec<_> = aliases
        .iter()
        .map(|alias| alias.type_parameters.as_slice())
        .collect();
    let type_parameters = commonize_type_parameters(&type_parameter_lists, context)?;

    let underlying: Vec<&Type> = aliases.iter().map(|alias| &alias.underlying_type).collect();
    let underlying_type = commonize_type(&underlying, context)?;

    let annotation_lists: Vec<&[ClassifierId]> = aliases
        .iter()
        .map(|alias| alias.annotations.as_slice())
        .collect();

    Some(TypeAlias {
        name: name.clone(),
        visibility,
        type_parameters,
        underlying_type,
        annotations: annotations(&annotation_lists, context),
    })
}
