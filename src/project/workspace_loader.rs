use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::error::Result;
use crate::index::{
    ModuleResources, ResourceIndex, ResourceIndexItem, ResourceLocation, ResourceReference,
    ResourceScope, ResourceType,
};

use super::config::ResolverConfig;
use super::discover::ModuleDiscoverer;
use super::element::{parse_resource_file, resource_path};
use super::sdk_loader;

/// What a set of changed paths requires of the current index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invalidation {
    /// Nothing resource-shaped changed.
    None,
    /// Re-read these modules (in index order) and/or the SDK script.
    Partial { modules: Vec<PathBuf>, sdk: bool },
    /// The set of modules changed; rediscover everything.
    Full,
}

/// Loads workspace resources into a [`ResourceIndex`].
pub struct WorkspaceLoader<'a> {
    config: &'a ResolverConfig,
}

impl<'a> WorkspaceLoader<'a> {
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self { config }
    }

    /// Discover modules and build a complete index.
    ///
    /// Fails only when the workspace root cannot be read.
    pub fn build(&self) -> Result<ResourceIndex> {
        let started = Instant::now();
        let modules = ModuleDiscoverer::new(self.config).discover(&self.config.workspace_root)?;
        let index = self.build_from(&modules, self.config.sdk_path.as_deref());

        let stats = index.stats();
        tracing::info!(
            "Indexed {} resource(s) ({} from SDK) across {} module(s) in {:?}",
            stats.visible,
            stats.sdk,
            stats.modules,
            started.elapsed()
        );
        Ok(index)
    }

    /// Build an index from known module roots and an optional SDK path.
    ///
    /// Modules are parsed in parallel but aggregated in the given order.
    pub fn build_from(&self, module_roots: &[PathBuf], sdk_path: Option<&Path>) -> ResourceIndex {
        let modules: Vec<ModuleResources> = module_roots
            .par_iter()
            .map(|root| self.load_module(root))
            .collect();
        let sdk = sdk_path.and_then(|path| sdk_loader::load_sdk(path, &self.config.sdk_script_paths));

        ResourceIndex::assemble(modules, sdk)
    }

    /// Read every resource type of one module, in declared type order.
    ///
    /// A file that fails to parse is logged and contributes nothing.
    pub fn load_module(&self, module_root: &Path) -> ModuleResources {
        let base = self.config.resource_base_of(module_root);
        let mut items = Vec::new();

        for ty in ResourceType::ALL {
            let path = resource_path(&base, ty);
            let entries = match parse_resource_file(&path, ty) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("{}", err);
                    continue;
                }
            };
            if entries.is_empty() {
                continue;
            }

            let shared_path: Arc<Path> = Arc::from(path.as_path());
            for entry in entries {
                let path = if ty.is_media() {
                    Arc::from(path.join(entry.value.as_ref()).as_path())
                } else {
                    shared_path.clone()
                };
                items.push(ResourceIndexItem {
                    reference: ResourceReference::new(ResourceScope::App, ty, entry.name),
                    location: ResourceLocation {
                        path,
                        value: entry.value,
                        raw_value: entry.raw_value,
                        range: entry.range,
                    },
                });
            }
        }

        tracing::debug!("Module {}: {} declaration(s)", module_root.display(), items.len());
        ModuleResources {
            root: Arc::from(module_root),
            items,
        }
    }

    // ========================================================================
    // INVALIDATION
    // ========================================================================

    /// Whether a changed path can affect the index.
    pub fn is_resource_path(&self, path: &Path) -> bool {
        if let Some(sdk_path) = &self.config.sdk_path {
            if path.starts_with(sdk_path) {
                return true;
            }
        }

        let Some(parent) = path.parent() else {
            return false;
        };
        let Some(base) = parent.parent() else {
            return false;
        };
        if !base.ends_with(&self.config.resource_base) {
            return false;
        }

        match parent.file_name().and_then(|name| name.to_str()) {
            Some("element") => path.extension().is_some_and(|ext| ext == "json"),
            Some("media") => true,
            _ => false,
        }
    }

    /// Decide how much of `previous` the changed `paths` invalidate.
    pub fn plan(&self, previous: &ResourceIndex, paths: &[PathBuf]) -> Invalidation {
        let discoverer = ModuleDiscoverer::new(self.config);
        let root = &self.config.workspace_root;
        let mut dirty: HashSet<&Path> = HashSet::new();
        let mut sdk = false;

        for path in paths {
            let in_sdk = self
                .config
                .sdk_path
                .as_deref()
                .is_some_and(|sdk_path| path.starts_with(sdk_path));
            if previous.sdk_script() == Some(path.as_path()) || in_sdk {
                sdk = true;
                continue;
            }

            if let Some(module) = previous.module_containing(path) {
                if !discoverer.is_module(module) {
                    return Invalidation::Full;
                }
                if path.starts_with(self.config.resource_base_of(module)) {
                    dirty.insert(module);
                }
                continue;
            }

            // A path under an unknown child of the root may have created a module
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let Some(child) = relative.components().next() else {
                continue;
            };
            let name = child.as_os_str().to_string_lossy();
            if !self.config.is_ignored_dir(&name) && discoverer.is_module(&root.join(child)) {
                return Invalidation::Full;
            }
        }

        if dirty.is_empty() && !sdk {
            return Invalidation::None;
        }
        let modules = previous
            .modules()
            .filter(|module| dirty.contains(module))
            .map(Path::to_path_buf)
            .collect();
        Invalidation::Partial { modules, sdk }
    }

    /// Produce the index that results from applying `invalidation` to `previous`.
    ///
    /// Returns `None` when nothing needs to change.
    pub fn apply(&self, previous: &ResourceIndex, invalidation: &Invalidation) -> Result<Option<ResourceIndex>> {
        match invalidation {
            Invalidation::None => Ok(None),
            Invalidation::Full => self.build().map(Some),
            Invalidation::Partial { modules: dirty, sdk: sdk_dirty } => {
                let (mut modules, mut sdk) = previous.to_parts();
                for module in modules.iter_mut() {
                    if dirty.iter().any(|path| path.as_path() == module.root.as_ref()) {
                        *module = self.load_module(&module.root);
                    }
                }
                if *sdk_dirty {
                    sdk = self
                        .config
                        .sdk_path
                        .as_deref()
                        .and_then(|path| sdk_loader::load_sdk(path, &self.config.sdk_script_paths));
                }

                tracing::debug!("Re-read {} module(s), sdk: {}", dirty.len(), sdk_dirty);
                Ok(Some(ResourceIndex::assemble(modules, sdk)))
            }
        }
    }
}
