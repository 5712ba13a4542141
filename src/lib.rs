//! # arkres-base
//!
//! Resource index and reference resolution for multi-module application
//! workspaces.
//!
//! Modules declare named resources (colors, strings, media, ...) in per-module
//! element files; code refers to them as `scope.type.name`. This crate finds
//! every declaration across the workspace and the SDK, builds an immutable
//! index, and resolves references to a file, a range and a value.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → ResourceResolver façade
//!   ↓
//! project  → Module discovery, element files, SDK script
//!   ↓
//! index    → Reference parsing, ResourceIndex
//!   ↓
//! base     → Primitives (LineIndex, SourceRange)
//! ```

/// Foundation types: positions and ranges
pub mod base;

/// Reference syntax, data model and the immutable index
pub mod index;

/// Loading a workspace from disk
pub mod project;

/// Host-facing resolver
pub mod ide;

pub mod error;

pub use base::{LineCol, LineIndex, SourceRange, TextRange, TextSize};
pub use error::{ResourceError, Result};
pub use ide::{ResolverConfig, ResourceResolver};
pub use index::{ResourceLocation, ResourceReference, ResourceScope, ResourceType};
pub use url::Url;
