//! Host-facing API.
//!
//! Editor services (hover, go-to-definition, completion, diagnostics) hold a
//! [`ResourceResolver`] and never the index itself:
//!
//! ```ignore
//! use arkres::ide::{ResourceResolver, ResolverConfig};
//!
//! let resolver = ResourceResolver::new(ResolverConfig::new("/path/to/workspace"));
//! resolver.build_index()?;
//!
//! if let Some(location) = resolver.resolve_resource_reference("app.color.primary") {
//!     println!("{} = {}", location.path.display(), location.value);
//! }
//! ```

mod resolver;

pub use crate::project::{Invalidation, ResolverConfig};
pub use resolver::ResourceResolver;
