// Commonizer Metadata Providers
// The seam through which per-target libraries reach the commonizer

use crate::declarations::{Module, ModuleInfo};
use crate::error::ProviderError;
use std::collections::HashSet;

/// Supplies the already-materialized modules of one target.
///
/// Implementations must be deterministic: repeated calls return the same
/// modules in the same order.
pub trait ModulesProvider {
    /// Names and locations of every module, without loading declarations
    fn module_infos(&self) -> Vec<ModuleInfo>;

    /// Load every module's declaration tree
    fn load_modules(&self) -> Result<Vec<Module>, ProviderError>;
}

/// A provider over modules that are already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryModulesProvider {
    modules: Vec<Module>,
}

impl InMemoryModulesProvider {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }
}

impl ModulesProvider for InMemoryModulesProvider {
    fn module_infos(&self) -> Vec<ModuleInfo> {
        self.modules.iter().map(Module::info).collect()
    }

    fn load_modules(&self) -> Result<Vec<Module>, ProviderError> {
        let mut seen = HashSet::new();
        for module in &self.modules {
            if !seen.insert(&module.name) {
                return Err(ProviderError::DuplicateModule {
                    module: module.name.clone(),
                });
            }
        }
        Ok(self.modules.clone())
    }
}
