//! Module discovery: finding resource-bearing modules under a workspace root.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ResourceError, Result};

use super::config::ResolverConfig;

/// Finds the resource-bearing modules of a workspace.
///
/// Only direct children of the root are candidates. A candidate qualifies
/// when `<candidate>/<resource_base>` is a directory. Results are ordered
/// lexicographically by directory name, which fixes duplicate-key
/// precedence independently of the host file system's listing order.
pub struct ModuleDiscoverer<'a> {
    config: &'a ResolverConfig,
}

impl<'a> ModuleDiscoverer<'a> {
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self { config }
    }

    /// Module directories under `root`, in precedence order.
    ///
    /// An unreadable root is an error; an unreadable child is skipped.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        // Probe first so a bad root surfaces its own io::Error
        std::fs::read_dir(root).map_err(|source| ResourceError::WorkspaceRoot {
            path: root.to_path_buf(),
            source,
        })?;

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut modules = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!("Skipping unreadable workspace entry: {}", err);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if self.config.is_ignored_dir(&name) {
                continue;
            }

            let path = entry.path();
            if path.is_dir() && self.is_module(path) {
                modules.push(path.to_path_buf());
            }
        }

        tracing::debug!("Discovered {} module(s) under {}", modules.len(), root.display());
        Ok(modules)
    }

    /// Whether `dir` has the resource-base layout.
    ///
    /// A resource base that exists but cannot be inspected is logged.
    pub fn is_module(&self, dir: &Path) -> bool {
        let base = self.config.resource_base_of(dir);
        match std::fs::metadata(&base) {
            Ok(metadata) => metadata.is_dir(),
            Err(err) if matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => false,
            Err(err) => {
                tracing::warn!("Skipping {}: cannot read {}: {}", dir.display(), base.display(), err);
                false
            }
        }
    }
}
