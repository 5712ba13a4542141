//! The resource index: an immutable, queryable map of every declaration.
//!
//! # Architecture
//!
//! Items are stored in a single vector in build order (application modules
//! in discovery order, then the SDK) and referenced by position from every
//! other map. A key declared more than once keeps all of its declarations;
//! the first one in build order is the *visible* one.
//!
//! An index is never mutated after [`ResourceIndex::assemble`] returns.
//! Incremental updates assemble a fresh index from the per-module slices of
//! the old one.

use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::types::{ResourceIndexItem, ResourceReference, ResourceScope, ResourceType};

/// Position into [`ResourceIndex::items`].
pub type ItemIdx = usize;

/// Everything one application module declares.
#[derive(Clone, Debug)]
pub struct ModuleResources {
    /// Module directory (direct child of the workspace root).
    pub root: Arc<Path>,
    pub items: Vec<ResourceIndexItem>,
}

/// Everything the SDK script declares.
#[derive(Clone, Debug)]
pub struct SdkResources {
    pub script: Arc<Path>,
    pub items: Vec<ResourceIndexItem>,
}

/// Summary counts, mostly for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub modules: usize,
    pub declarations: usize,
    pub visible: usize,
    pub sdk: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceIndex {
    /// The single source of truth for all declarations.
    items: Vec<ResourceIndexItem>,
    /// Module root -> slice of `items`, in discovery order.
    modules: IndexMap<Arc<Path>, Range<ItemIdx>>,
    /// SDK script -> slice of `items`.
    sdk: Option<(Arc<Path>, Range<ItemIdx>)>,
    /// Key -> every declaration, in precedence order.
    by_key: FxHashMap<ResourceReference, Vec<ItemIdx>>,
    /// First declaration of each key, in build order.
    visible: Vec<ItemIdx>,
    /// Lowercased `scope.type.name`, parallel to `visible`.
    search_keys: Vec<String>,
}

impl ResourceIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate module and SDK declarations into an index.
    ///
    /// `modules` must already be in precedence order.
    pub fn assemble(modules: Vec<ModuleResources>, sdk: Option<SdkResources>) -> Self {
        let mut index = Self::new();

        for module in modules {
            let range = index.push_items(module.items);
            index.modules.insert(module.root, range);
        }
        if let Some(sdk) = sdk {
            let range = index.push_items(sdk.items);
            index.sdk = Some((sdk.script, range));
        }

        index
    }

    fn push_items(&mut self, items: Vec<ResourceIndexItem>) -> Range<ItemIdx> {
        let start = self.items.len();
        for item in items {
            let idx = self.items.len();
            let slot = self.by_key.entry(item.reference.clone()).or_default();
            if slot.is_empty() {
                self.visible.push(idx);
                self.search_keys
                    .push(item.reference.qualified_name().to_lowercase());
            }
            slot.push(idx);
            self.items.push(item);
        }
        start..self.items.len()
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Exact, case-sensitive lookup; the first declaration wins.
    pub fn lookup(&self, reference: &ResourceReference) -> Option<&ResourceIndexItem> {
        self.by_key
            .get(reference)
            .and_then(|indices| indices.first())
            .and_then(|&idx| self.items.get(idx))
    }

    /// Every declaration of a key, visible one first.
    pub fn lookup_all(&self, reference: &ResourceReference) -> Vec<&ResourceIndexItem> {
        self.by_key
            .get(reference)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|&idx| self.items.get(idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every visible item, in build order.
    pub fn all(&self) -> impl Iterator<Item = &ResourceIndexItem> {
        self.visible.iter().filter_map(|&idx| self.items.get(idx))
    }

    /// Visible items whose `scope.type.name` contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&ResourceIndexItem> {
        let query = query.to_lowercase();
        self.visible
            .iter()
            .zip(&self.search_keys)
            .filter(|(_, key)| key.contains(&query))
            .filter_map(|(&idx, _)| self.items.get(idx))
            .collect()
    }

    /// Visible items of one type, optionally restricted to one scope.
    pub fn filter_by_type(
        &self,
        scope: Option<ResourceScope>,
        ty: ResourceType,
    ) -> Vec<&ResourceIndexItem> {
        self.all()
            .filter(|item| item.reference.ty == ty)
            .filter(|item| scope.is_none_or(|scope| item.reference.scope == scope))
            .collect()
    }

    // ========================================================================
    // STRUCTURE
    // ========================================================================

    /// Module roots in precedence order.
    pub fn modules(&self) -> impl Iterator<Item = &Path> {
        self.modules.keys().map(|root| root.as_ref())
    }

    /// The module owning `path`, if any.
    pub fn module_containing(&self, path: &Path) -> Option<&Path> {
        self.modules()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
    }

    /// The SDK script this index was built from.
    pub fn sdk_script(&self) -> Option<&Path> {
        self.sdk.as_ref().map(|(script, _)| script.as_ref())
    }

    /// Declarations contributed by the SDK.
    pub fn sdk_items(&self) -> &[ResourceIndexItem] {
        self.sdk
            .as_ref()
            .and_then(|(_, range)| self.items.get(range.clone()))
            .unwrap_or_default()
    }

    /// Rebuild the per-module inputs this index was assembled from.
    pub(crate) fn to_parts(&self) -> (Vec<ModuleResources>, Option<SdkResources>) {
        let modules = self
            .modules
            .iter()
            .map(|(root, range)| ModuleResources {
                root: root.clone(),
                items: self.items[range.clone()].to_vec(),
            })
            .collect();
        let sdk = self.sdk.as_ref().map(|(script, range)| SdkResources {
            script: script.clone(),
            items: self.items[range.clone()].to_vec(),
        });
        (modules, sdk)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            modules: self.modules.len(),
            declarations: self.items.len(),
            visible: self.visible.len(),
            sdk: self.sdk_items().len(),
        }
    }

    /// Number of visible keys.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::ResourceLocation;

    fn item(scope: ResourceScope, ty: ResourceType, name: &str, path: &str, value: &str) -> ResourceIndexItem {
        ResourceIndexItem {
            reference: ResourceReference::new(scope, ty, name),
            location: ResourceLocation {
                path: Arc::from(Path::new(path)),
                value: Arc::from(value),
                raw_value: None,
                range: None,
            },
        }
    }

    fn module(root: &str, items: Vec<ResourceIndexItem>) -> ModuleResources {
        ModuleResources {
            root: Arc::from(Path::new(root)),
            items,
        }
    }

    fn sample() -> ResourceIndex {
        ResourceIndex::assemble(
            vec![
                module(
                    "/ws/common",
                    vec![
                        item(ResourceScope::App, ResourceType::Color, "primary", "/ws/common/color.json", "#111111"),
                        item(ResourceScope::App, ResourceType::String, "app_name", "/ws/common/string.json", "Demo"),
                    ],
                ),
                module(
                    "/ws/entry",
                    vec![item(ResourceScope::App, ResourceType::Color, "primary", "/ws/entry/color.json", "#222222")],
                ),
            ],
            Some(SdkResources {
                script: Arc::from(Path::new("/sdk/sysResource.js")),
                items: vec![
                    item(ResourceScope::Sys, ResourceType::Color, "ohos_id_color_foreground", "/sdk/sysResource.js", "system resource #1"),
                    item(ResourceScope::Sys, ResourceType::String, "ohos_id_text", "/sdk/sysResource.js", "system resource #2"),
                ],
            }),
        )
    }

    #[test]
    fn test_first_declaration_wins() {
        let index = sample();
        let key = ResourceReference::new(ResourceScope::App, ResourceType::Color, "primary");

        assert_eq!(index.lookup(&key).unwrap().location.value.as_ref(), "#111111");
        assert_eq!(index.lookup_all(&key).len(), 2);
        assert_eq!(index.len(), 4);
        assert_eq!(index.stats().declarations, 5);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let index = sample();
        let key = ResourceReference::new(ResourceScope::App, ResourceType::Color, "Primary");
        assert!(index.lookup(&key).is_none());
        assert!(index.lookup_all(&key).is_empty());
    }

    #[test]
    fn test_search_ignores_case() {
        let index = sample();
        let hits: Vec<_> = index.search("COLOR").iter().map(|i| i.reference.to_string()).collect();
        assert_eq!(hits, vec!["app.color.primary", "sys.color.ohos_id_color_foreground"]);
        assert_eq!(index.search("").len(), index.len());
    }

    #[test]
    fn test_filter_by_type() {
        let index = sample();
        assert_eq!(index.filter_by_type(None, ResourceType::String).len(), 2);
        assert_eq!(index.filter_by_type(Some(ResourceScope::Sys), ResourceType::String).len(), 1);
        assert!(index.filter_by_type(None, ResourceType::Media).is_empty());
    }

    #[test]
    fn test_module_slices() {
        let index = sample();
        assert_eq!(index.sdk_items().len(), 2);
        assert_eq!(
            index.module_containing(Path::new("/ws/entry/src/main/resources/base/element/color.json")),
            Some(Path::new("/ws/entry"))
        );
        assert_eq!(index.module_containing(Path::new("/elsewhere/color.json")), None);
        assert_eq!(index.modules().count(), 2);
        assert_eq!(index.sdk_script(), Some(Path::new("/sdk/sysResource.js")));
    }

    #[test]
    fn test_to_parts_reassembles_equivalently() {
        let index = sample();
        let (modules, sdk) = index.to_parts();
        let rebuilt = ResourceIndex::assemble(modules, sdk);

        let before: Vec<_> = index.all().cloned().collect();
        let after: Vec<_> = rebuilt.all().cloned().collect();
        assert_eq!(before, after);
    }
}
