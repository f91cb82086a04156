//! Pipeline entry point
//!
//! Loads every provider once, commonizes the dependee modules, then the
//! targets' own modules, builds the declarations of every target and
//! aggregates them into a [`CommonizerResult`].

use crate::builder::build_declarations;
use crate::classifiers::{ClassifierIndex, ProvidedClassifiers};
use crate::commonization::CommonizationVisitor;
use crate::error::CommonizerError;
use crate::mergedtree::{DependencyTreeMerger, TreeMerger};
use crate::parameters::CommonizerParameters;
use crate::result::{aggregate, CommonizerResult};
use commonizer_metadata::Module;

pub fn run_commonization(
    parameters: &CommonizerParameters,
) -> Result<CommonizerResult, CommonizerError> {
    if !parameters.has_anything_to_commonize() {
        tracing::info!("no target supplied any module, nothing to commonize");
        return Ok(CommonizerResult::NothingToDo);
    }

    let leaf_targets = parameters.leaf_targets();
    let shared_target = parameters.shared_target();
    let settings = parameters.settings();
    tracing::info!(
        targets = leaf_targets.len(),
        shared = %shared_target,
        "starting commonization"
    );

    let shared_dependee_modules = match parameters.shared_dependee_modules_provider() {
        Some(provider) => provider
            .load_modules()
            .map_err(|source| CommonizerError::provider(&shared_target, source))?,
        None => Vec::new(),
    };

    let mut dependee_modules: Vec<Vec<Module>> = Vec::with_capacity(leaf_targets.len());
    let mut dependee_libraries: Vec<ProvidedClassifiers> = Vec::with_capacity(leaf_targets.len());
    let mut own_modules: Vec<Vec<Module>> = Vec::with_capacity(leaf_targets.len());
    for provider in parameters.target_providers() {
        let modules = match &provider.dependee_modules_provider {
            Some(dependees) => dependees
                .load_modules()
                .map_err(|source| CommonizerError::provider(&provider.target, source))?,
            None => Vec::new(),
        };
        dependee_libraries.push(ProvidedClassifiers::from_modules(
            format!("dependee modules of {}", provider.target),
            &modules,
        )?);
        dependee_modules.push(modules);

        own_modules.push(
            provider
                .modules_provider
                .load_modules()
                .map_err(|source| CommonizerError::provider(&provider.target, source))?,
        );
    }

    let shared_library = ProvidedClassifiers::from_modules(
        format!("dependee modules of {shared_target}"),
        &shared_dependee_modules,
    )?;
    let mut classifiers =
        ClassifierIndex::new(leaf_targets.clone(), dependee_libraries, shared_library);

    let mut dependencies =
        DependencyTreeMerger::new(settings, &leaf_targets).merge(&dependee_modules, &mut classifiers)?;
    let stats = CommonizationVisitor::new(&mut dependencies.tree, &mut classifiers).visit()?;
    tracing::debug!(
        commonized = stats.commonized,
        left_as_is = stats.left_as_is,
        "dependency declarations commonized"
    );
    parameters.report_progress("Commonized dependency declarations");

    let mut merged = TreeMerger::new(settings, &leaf_targets).merge(&own_modules, &mut classifiers)?;
    let stats = CommonizationVisitor::new(&mut merged.tree, &mut classifiers).visit()?;
    tracing::debug!(
        commonized = stats.commonized,
        left_as_is = stats.left_as_is,
        classifiers = classifiers.commonized_count(),
        "declarations commonized"
    );
    parameters.report_progress("Commonized declarations");

    let components = build_declarations(
        &merged.tree,
        &dependencies.tree,
        &classifiers,
        &leaf_targets,
    )?;
    parameters.report_progress("Prepared new descriptors");

    aggregate(components, &merged.missing_module_infos)
}
