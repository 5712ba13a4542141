//! Resource model and index.
//!
//! - [`ResourceReference`] and [`parse_reference`] - the `scope.type.name` triple
//! - [`ResourceLocation`], [`ResourceIndexItem`] - resolution results
//! - [`ResourceIndex`] - immutable key → declarations map

mod reference;
mod store;
mod types;

pub use reference::{ReferenceError, parse_reference};
pub use store::{IndexStats, ItemIdx, ModuleResources, ResourceIndex, SdkResources};
pub use types::{ResourceIndexItem, ResourceLocation, ResourceReference, ResourceScope, ResourceType};
