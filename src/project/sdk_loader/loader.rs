use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::index::{ResourceIndexItem, ResourceLocation, ResourceReference, ResourceScope, SdkResources};

use super::scanner::scan_sdk_script;

/// Find the SDK resource script.
///
/// `sdk_path` may be the script itself or an SDK root, in which case each
/// relative candidate is tried in order.
pub fn locate_script(sdk_path: &Path, candidates: &[PathBuf]) -> Option<PathBuf> {
    if sdk_path.is_file() {
        return Some(sdk_path.to_path_buf());
    }
    candidates
        .iter()
        .map(|candidate| sdk_path.join(candidate))
        .find(|path| path.is_file())
}

/// Load the `sys` resources of an SDK.
///
/// Returns `None` when no script can be found or read; the index then simply
/// has no `sys` entries.
pub fn load_sdk(sdk_path: &Path, candidates: &[PathBuf]) -> Option<SdkResources> {
    let Some(script) = locate_script(sdk_path, candidates) else {
        tracing::warn!("No SDK resource script found under {}", sdk_path.display());
        return None;
    };
    load_script(&script)
}

/// Load the `sys` resources of one script file.
pub fn load_script(script: &Path) -> Option<SdkResources> {
    let text = match std::fs::read_to_string(script) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("Failed to read SDK script {}: {}", script.display(), err);
            return None;
        }
    };

    let script: Arc<Path> = Arc::from(script);
    let items: Vec<ResourceIndexItem> = scan_sdk_script(&text)
        .into_iter()
        .map(|entry| ResourceIndexItem {
            reference: ResourceReference::new(ResourceScope::Sys, entry.ty, entry.name),
            location: ResourceLocation {
                path: script.clone(),
                value: entry.value,
                raw_value: None,
                range: entry.range,
            },
        })
        .collect();

    tracing::debug!("Loaded {} SDK resource(s) from {}", items.len(), script.display());
    Some(SdkResources { script, items })
}
