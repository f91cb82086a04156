// Commonization Policies
// Small rules shared by the per-kind strategies

use super::CommonizationContext;
use commonizer_metadata::{ClassifierId, Modality, Visibility};

/// The single value every target agrees on
pub fn all_equal<T: PartialEq + Clone>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut values = values.into_iter();
    let first = values.next()?;
    values.all(|value| value == first).then_some(first)
}

/// True only if true on every target
pub fn all_true(values: impl IntoIterator<Item = bool>) -> bool {
    values.into_iter().all(|value| value)
}

/// Callable visibility: private anywhere is incompatible, otherwise the most
/// restrictive visibility wins.
///
/// Protected and internal do not narrow one another, so a mix of the two is
/// incompatible as well.
pub fn lowest_visibility(visibilities: impl IntoIterator<Item = Visibility>) -> Option<Visibility> {
    let mut lowest: Option<Visibility> = None;
    let (mut protected, mut internal) = (false, false);
    for visibility in visibilities {
        match visibility {
            Visibility::Private => return None,
            Visibility::Protected => protected = true,
            Visibility::Internal => internal = true,
            Visibility::Public => {}
        }
        if protected && internal {
            return None;
        }
        lowest = Some(match lowest {
            Some(current) => current.min(visibility),
            None => visibility,
        });
    }
    lowest
}

/// Callable modality: all equal, or a mix of final and open which yields
/// final
pub fn callable_modality(modalities: impl IntoIterator<Item = Modality>) -> Option<Modality> {
    let modalities: Vec<Modality> = modalities.into_iter().collect();
    if let Some(modality) = all_equal(modalities.iter().copied()) {
        return Some(modality);
    }
    modalities
        .iter()
        .all(|modality| matches!(modality, Modality::Final | Modality::Open))
        .then_some(Modality::Final)
}

/// Identical sequences are kept as they are; otherwise the ids present on
/// every target, sorted. Either way only annotation classifiers the shared
/// target can refer to survive.
pub fn annotations(
    lists: &[&[ClassifierId]],
    context: &CommonizationContext<'_>,
) -> Vec<ClassifierId> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };
    let mut common: Vec<ClassifierId> = if rest.iter().all(|list| list == first) {
        first.to_vec()
    } else {
        let mut common: Vec<ClassifierId> = first
            .iter()
            .filter(|id| rest.iter().all(|list| list.contains(id)))
            .cloned()
            .collect();
        common.sort();
        common.dedup();
        common
    };
    common.retain(|id| context.is_available(id));
    common
}
