//! Run configuration
//!
//! Everything a commonization run consumes: the ordered leaf targets with
//! their module providers, the shared dependency provider, the advisory
//! progress sink and tunable settings.

use crate::error::CommonizerError;
use crate::target::{LeafTarget, SharedTarget};
use commonizer_metadata::{ModulesProvider, PackageName};
use std::fmt;

/// Receives informational messages at fixed pipeline milestones
pub type ProgressSink = Box<dyn Fn(&str) + Send + Sync>;

/// Settings that alter how declarations are merged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonizerSettings {
    /// Packages whose classifiers are opaque forward declarations: references
    /// to them resolve without a definition on any target
    pub forward_declaration_packages: Vec<PackageName>,
}

impl CommonizerSettings {
    pub fn with_forward_declaration_package(mut self, package: impl Into<PackageName>) -> Self {
        self.forward_declaration_packages.push(package.into());
        self
    }

    pub fn is_forward_declaration(&self, package: &PackageName) -> bool {
        self.forward_declaration_packages
            .iter()
            .any(|prefix| package.starts_with(prefix))
    }
}

/// The inputs of one leaf target
pub struct TargetProvider {
    pub target: LeafTarget,
    pub modules_provider: Box<dyn ModulesProvider>,
    pub dependee_modules_provider: Option<Box<dyn ModulesProvider>>,
}

impl TargetProvider {
    pub fn new(target: LeafTarget, modules_provider: impl ModulesProvider + 'static) -> Self {
        Self {
            target,
            modules_provider: Box::new(modules_provider),
            dependee_modules_provider: None,
        }
    }

    pub fn with_dependee_modules(mut self, provider: impl ModulesProvider + 'static) -> Self {
        self.dependee_modules_provider = Some(Box::new(provider));
        self
    }
}

impl fmt::Debug for TargetProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetProvider")
            .field("target", &self.target)
            .field("modules", &self.modules_provider.module_infos().len())
            .field(
                "has_dependee_modules",
                &self.dependee_modules_provider.is_some(),
            )
            .finish()
    }
}

#[derive(Default)]
pub struct CommonizerParameters {
    target_providers: Vec<TargetProvider>,
    shared_dependee_modules_provider: Option<Box<dyn ModulesProvider>>,
    progress_sink: Option<ProgressSink>,
    settings: CommonizerSettings,
}

impl CommonizerParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf target; targets keep their registration order
    pub fn add_target(&mut self, provider: TargetProvider) -> Result<(), CommonizerError> {
        if self
            .target_providers
            .iter()
            .any(|existing| existing.target == provider.target)
        {
            return Err(CommonizerError::DuplicateTarget {
                target: provider.target.to_string(),
            });
        }
        self.target_providers.push(provider);
        Ok(())
    }

    pub fn with_shared_dependee_modules(mut self, provider: impl ModulesProvider + 'static) -> Self {
        self.shared_dependee_modules_provider = Some(Box::new(provider));
        self
    }

    pub fn with_progress_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.progress_sink = Some(Box::new(sink));
        self
    }

    pub fn with_settings(mut self, settings: CommonizerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn target_providers(&self) -> &[TargetProvider] {
        &self.target_providers
    }

    pub fn leaf_targets(&self) -> Vec<LeafTarget> {
        self.target_providers
            .iter()
            .map(|provider| provider.target.clone())
            .collect()
    }

    pub fn shared_target(&self) -> SharedTarget {
        SharedTarget::new(self.leaf_targets())
    }

    pub fn shared_dependee_modules_provider(&self) -> Option<&dyn ModulesProvider> {
        self.shared_dependee_modules_provider.as_deref()
    }

    pub fn settings(&self) -> &CommonizerSettings {
        &self.settings
    }

    /// True when at least one leaf target has at least one module
    pub fn has_anything_to_commonize(&self) -> bool {
        self.target_providers
            .iter()
            .any(|provider| !provider.modules_provider.module_infos().is_empty())
    }

    pub(crate) fn report_progress(&self, message: &str) {
        tracing::info!(progress = message);
        if let Some(sink) = &self.progress_sink {
            sink(message);
        }
    }
}

impl fmt::Debug for CommonizerParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonizerParameters")
            .field("target_providers", &self.target_providers)
            .field(
                "has_shared_dependee_modules",
                &self.shared_dependee_modules_provider.is_some(),
            )
            .field("has_progress_sink", &self.progress_sink.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}
