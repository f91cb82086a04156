// Member Strategies
// Constructors, functions and properties

use super::policy::{all_equal, all_true, annotations, callable_modality, lowest_visibility};
use super::types::{
    commonize_optional_type, commonize_type, commonize_type_parameters,
    commonize_value_parameters,
};
use super::CommonizationContext;
use commonizer_metadata::{
    ClassifierId, ConstValue, Constructor, Function, Property, Type, TypeParameter,
    ValueParameter,
};

pub fn commonize_constructor(
    constructors: &[&Constructor],
    context: &CommonizationContext<'_>,
) -> Option<Constructor> {
    let is_primary = all_equal(constructors.iter().map(|constructor| constructor.is_primary))?;
    let visibility = lowest_visibility(constructors.iter().map(|constructor| constructor.visibility))?;

    let parameter_lists: Vec<&[ValueParameter]> = constructors
        .iter()
        .map(|constructor| constructor.value_parameters.as_slice())
        .collect();
    let annotation_lists: Vec<&[ClassifierId]> = constructors
        .iter()
        .map(|constructor| constructor.annotations.as_slice())
        .collect();

    Some(Constructor {
        visibility,
        is_primary,
        value_parameters: commonize_value_parameters(&parameter_lists, context)?,
        annotations: annotations(&annotation_lists, context),
    })
}

pub fn commonize_function(
    functions: &[&Function],
    context: &CommonizationContext<'_>,
) -> Option<Function> {
    let name = all_equal(functions.iter().map(|function| &function.name))?;
    let is_suspend = all_equal(functions.iter().map(|function| function.is_suspend))?;
    let visibility = lowest_visibility(functions.iter().map(|function| function.visibility))?;
    let modality = callable_modality(functions.iter().map(|function| function.modality))?;

    let type_parameter_lists: Vec<&[TypeParameter]> = functions
        .iter()
        .map(|function| function.type_parameters.as_slice())
        .collect();
    let receivers: Vec<Option<&Type>> = functions
        .iter()
        .map(|function| function.extension_receiver.as_ref())
        .collect();
    let parameter_lists: Vec<&[ValueParameter]> = functions
        .iter()
        .map(|function| function.value_parameters.as_slice())
        .collect();
    let return_types: Vec<&Type> = functions.iter().map(|function| &function.return_type).collect();
    let annotation_lists: Vec<&[ClassifierId]> = functions
        .iter()
        .map(|function| function.annotations.as_slice())
        .collect();

    Some(Function {
        name: name.clone(),
        visibility,
        modality,
        type_parameters: commonize_type_parameters(&type_parameter_lists, context)?,
        extension_receiver: commonize_optional_type(&receivers, context)?,
        value_parameters: commonize_value_parameters(&parameter_lists, context)?,
        return_type: commonize_type(&return_types, context)?,
        annotations: annotations(&annotation_lists, context),
        is_suspend,
        is_inline: all_true(functions.iter().map(|function| function.is_inline)),
        is_operator: all_true(functions.iter().map(|function| function.is_operator)),
        is_infix: all_true(functions.iter().map(|function| function.is_infix)),
        is_external: all_true(functions.iter().map(|function| function.is_external)),
    })
}

pub fn commonize_property(
    properties: &[&Property],
    context: &CommonizationContext<'_>,
) -> Option<Property> {
    let name = all_equal(properties.iter().map(|property| &property.name))?;
    let visibility = lowest_visibility(properties.iter().map(|property| property.visibility))?;
    let modality = callable_modality(properties.iter().map(|property| property.modality))?;

    let type_parameter_lists: Vec<&[TypeParameter]> = properties
        .iter()
        .map(|property| property.type_parameters.as_slice())
        .collect();
    let receivers: Vec<Option<&Type>> = properties
        .iter()
        .map(|property| property.extension_receiver.as_ref())
        .collect();
    let return_types: Vec<&Type> = properties.iter().map(|property| &property.return_type).collect();
    let annotation_lists: Vec<&[ClassifierId]> = properties
        .iter()
        .map(|property| property.annotations.as_slice())
        .collect();

    // A private setter anywhere leaves a read-only property
    let setter_visibility = if all_true(properties.iter().map(|property| property.is_var)) {
        lowest_visibility(properties.iter().map(|property| {
            property
                .setter_visibility
                .unwrap_or(property.visibility)
        }))
    } else {
        None
    };

    let (is_const, const_value) = commonize_const(properties);

    Some(Property {
        name: name.clone(),
        visibility,
        modality,
        type_parameters: commonize_type_parameters(&type_parameter_lists, context)?,
        extension_receiver: commonize_optional_type(&receivers, context)?,
        return_type: commonize_type(&return_types, context)?,
        annotations: annotations(&annotation_lists, context),
        is_var: setter_visibility.is_some(),
        is_const,
        const_value,
        setter_visibility,
        is_external: all_true(properties.iter().map(|property| property.is_external)),
    })
}

fn commonize_const(properties: &[&Property]) -> (bool, Option<ConstValue>) {
    if !all_true(properties.iter().map(|property| property.is_const)) {
        return (false, None);
    }
    match all_equal(properties.iter().map(|property| &property.const_value)) {
        Some(Some(value)) => (true, Some(value.clone())),
        _ => (false, None),
    }
}
