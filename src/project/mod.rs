//! Project loading: turning a workspace on disk into a [`ResourceIndex`].
//!
//! [`ResourceIndex`]: crate::index::ResourceIndex

mod config;
mod discover;
mod element;
pub mod sdk_loader;
mod workspace_loader;

pub use config::{DEFAULT_IGNORED_DIRS, DEFAULT_RESOURCE_BASE, DEFAULT_SDK_SCRIPT_PATHS, ResolverConfig};
pub use discover::ModuleDiscoverer;
pub use element::{ElementEntry, ElementError, parse_element_text, parse_resource_file, resource_path};
pub use workspace_loader::{Invalidation, WorkspaceLoader};
