//! Commonization results

use crate::builder::{BuiltModule, TargetBuilderComponents};
use crate::error::CommonizerError;
use crate::target::{CommonizerTarget, LeafTarget};
use commonizer_metadata::{ModuleInfo, ModuleName};
use indexmap::IndexMap;
use std::sync::Arc;

/// The outcome for one module on one target
#[derive(Debug, Clone)]
pub enum ModuleResult {
    /// The module was built for the target
    Commonized(BuiltModule),
    /// Other targets supplied the module but this one did not
    Missing(ModuleInfo),
}

impl ModuleResult {
    pub fn name(&self) -> ModuleName {
        match self {
            ModuleResult::Commonized(module) => module.name(),
            ModuleResult::Missing(info) => info.name.clone(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ModuleResult::Missing(_))
    }

    pub fn as_commonized(&self) -> Option<&BuiltModule> {
        match self {
            ModuleResult::Commonized(module) => Some(module),
            ModuleResult::Missing(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CommonizerResult {
    /// No leaf target supplied any module
    NothingToDo,
    /// Module results for every leaf target, in order, then the shared target
    Done(IndexMap<CommonizerTarget, Vec<ModuleResult>>),
}

impl CommonizerResult {
    pub fn is_nothing_to_do(&self) -> bool {
        matches!(self, CommonizerResult::NothingToDo)
    }

    pub fn targets(&self) -> Vec<&CommonizerTarget> {
        match self {
            CommonizerResult::NothingToDo => Vec::new(),
            CommonizerResult::Done(results) => results.keys().collect(),
        }
    }

    pub fn modules(&self, target: &CommonizerTarget) -> Option<&[ModuleResult]> {
        match self {
            CommonizerResult::NothingToDo => None,
            CommonizerResult::Done(results) => results.get(target).map(Vec::as_slice),
        }
    }
}

/// Collect built modules per target, then append each leaf target's missing
/// modules
pub(crate) fn aggregate(
    components: Vec<TargetBuilderComponents>,
    missing_module_infos: &IndexMap<LeafTarget, Vec<ModuleInfo>>,
) -> Result<CommonizerResult, CommonizerError> {
    let mut results: IndexMap<CommonizerTarget, Vec<ModuleResult>> = IndexMap::new();

    for target_components in components {
        let (target, declarations, dependencies) = target_components.into_arenas();
        if results.contains_key(&target) {
            return Err(CommonizerError::DuplicateTarget {
                target: target.to_string(),
            });
        }

        let declarations = Arc::new(declarations);
        let dependencies = Arc::new(dependencies);
        let mut modules: Vec<ModuleResult> = declarations
            .modules()
            .iter()
            .map(|&id| {
                ModuleResult::Commonized(BuiltModule::new(
                    Arc::clone(&declarations),
                    Arc::clone(&dependencies),
                    id,
                ))
            })
            .collect();

        if let Some(missing) = target
            .as_leaf()
            .and_then(|leaf| missing_module_infos.get(leaf))
        {
            modules.extend(missing.iter().cloned().map(ModuleResult::Missing));
        }

        tracing::debug!(
            target_name = %target,
            modules = modules.len(),
            "target result aggregated"
        );
        results.insert(target, modules);
    }

    Ok(CommonizerResult::Done(results))
}
