//! Foundation types for the resource engine.
//!
//! This module provides fundamental position types:
//! - [`TextRange`], [`TextSize`] - Byte positions in raw file text
//! - [`LineCol`], [`LineIndex`] - Line/character conversion
//! - [`SourceRange`] - A declaration span handed to editors
//!
//! This module has NO dependencies on other arkres modules.

mod span;

pub use span::{LineCol, LineIndex, SourceRange, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
