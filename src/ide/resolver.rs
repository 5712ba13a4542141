//! The resolver façade: the only way hosts read the resource index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::Result;
use crate::index::{
    IndexStats, ResourceIndex, ResourceIndexItem, ResourceLocation, ResourceScope, ResourceType,
    parse_reference,
};
use crate::project::{Invalidation, ResolverConfig, WorkspaceLoader};

/// The index currently served, with the SDK path it was built against.
#[derive(Debug, Default)]
struct Snapshot {
    index: Arc<ResourceIndex>,
    sdk_path: Option<PathBuf>,
    built: bool,
}

/// Owns one workspace's resource index.
///
/// Readers clone the current `Arc<ResourceIndex>` under a short read lock and
/// never wait for a build. Builds are serialised and swap a complete index in
/// only when they finish, so a reader sees either the old or the new index.
#[derive(Debug)]
pub struct ResourceResolver {
    config: RwLock<ResolverConfig>,
    current: RwLock<Snapshot>,
    build_lock: Mutex<()>,
}

impl ResourceResolver {
    /// Create a resolver with an empty index. Nothing is read until
    /// [`build_index`](Self::build_index).
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config: RwLock::new(config),
            current: RwLock::new(Snapshot::default()),
            build_lock: Mutex::new(()),
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Full rebuild: discover modules, parse every file, parse the SDK.
    ///
    /// Only an unreadable workspace root fails; the previous index is then
    /// kept.
    pub fn build_index(&self) -> Result<IndexStats> {
        let _guard = self.build_lock.lock();
        let config = self.config.read().clone();

        let index = WorkspaceLoader::new(&config).build()?;
        Ok(self.swap(index, config.sdk_path))
    }

    fn swap(&self, index: ResourceIndex, sdk_path: Option<PathBuf>) -> IndexStats {
        let stats = index.stats();
        *self.current.write() = Snapshot {
            index: Arc::new(index),
            sdk_path,
            built: true,
        };
        stats
    }

    /// Drop the index; every query answers empty until the next build.
    pub fn clear_index(&self) {
        *self.current.write() = Snapshot::default();
    }

    /// React to changed files reported by the host.
    ///
    /// Unrelated paths are ignored, files of a known module re-read that
    /// module, the SDK script re-reads the SDK, and a module appearing or
    /// disappearing triggers a full rebuild. Does nothing before the first
    /// build.
    pub fn invalidate(&self, paths: &[PathBuf]) -> Result<Invalidation> {
        let _guard = self.build_lock.lock();
        let config = self.config.read().clone();
        let (previous, built_sdk) = {
            let current = self.current.read();
            if !current.built {
                return Ok(Invalidation::None);
            }
            (current.index.clone(), current.sdk_path.clone())
        };

        let loader = WorkspaceLoader::new(&config);
        let invalidation = if built_sdk != config.sdk_path {
            Invalidation::Full
        } else {
            loader.plan(&previous, paths)
        };

        if let Some(index) = loader.apply(&previous, &invalidation)? {
            tracing::debug!("Applied {:?}", invalidation);
            self.swap(index, config.sdk_path);
        }
        Ok(invalidation)
    }

    /// Whether a changed path can affect the index.
    pub fn is_resource_path(&self, path: &Path) -> bool {
        let config = self.config.read();
        WorkspaceLoader::new(&config).is_resource_path(path)
    }

    // ========================================================================
    // SDK PATH
    // ========================================================================

    /// The SDK path the current index was built with.
    pub fn get_sdk_path(&self) -> Option<PathBuf> {
        self.current.read().sdk_path.clone()
    }

    /// Change the configured SDK path. Takes effect on the next build.
    pub fn set_sdk_path(&self, sdk_path: Option<PathBuf>) {
        self.config.write().sdk_path = sdk_path;
    }

    /// Rebuild if the index was not built against `desired`.
    ///
    /// Returns whether a rebuild happened.
    pub fn ensure_sdk_path(&self, desired: Option<&Path>) -> Result<bool> {
        {
            let current = self.current.read();
            if current.built && current.sdk_path.as_deref() == desired {
                return Ok(false);
            }
        }
        tracing::info!(
            "SDK path changed to {:?}, rebuilding resource index",
            desired
        );
        self.set_sdk_path(desired.map(Path::to_path_buf));
        self.build_index()?;
        Ok(true)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    fn index(&self) -> Arc<ResourceIndex> {
        self.current.read().index.clone()
    }

    /// Resolve `scope.type.name` (optionally quoted) to its winning declaration.
    ///
    /// Malformed and undeclared references both answer `None`.
    pub fn resolve_resource_reference(&self, raw: &str) -> Option<ResourceLocation> {
        let reference = parse_reference(raw)?;
        self.index()
            .lookup(&reference)
            .map(|item| item.location.clone())
    }

    /// Every declaration of a reference, winning one first.
    pub fn lookup_all(&self, raw: &str) -> Vec<ResourceLocation> {
        let Some(reference) = parse_reference(raw) else {
            return Vec::new();
        };
        self.index()
            .lookup_all(&reference)
            .into_iter()
            .map(|item| item.location.clone())
            .collect()
    }

    pub fn get_all_resources(&self) -> Vec<ResourceIndexItem> {
        self.index().all().cloned().collect()
    }

    /// Case-insensitive substring search over `scope.type.name`.
    pub fn search_resources(&self, query: &str) -> Vec<ResourceIndexItem> {
        self.index().search(query).into_iter().cloned().collect()
    }

    pub fn get_resources_by_type(
        &self,
        scope: Option<ResourceScope>,
        ty: ResourceType,
    ) -> Vec<ResourceIndexItem> {
        self.index()
            .filter_by_type(scope, ty)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_built(&self) -> bool {
        self.current.read().built
    }

    pub fn stats(&self) -> IndexStats {
        self.index().stats()
    }
}
