//! Resolver configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Module-relative directory that marks a resource-bearing module.
pub const DEFAULT_RESOURCE_BASE: &str = "src/main/resources/base";

/// SDK-relative locations of the generated system resource script.
pub const DEFAULT_SDK_SCRIPT_PATHS: &[&str] = &[
    "ets/build-tools/ets-loader/sysResource.js",
    "build-tools/ets-loader/sysResource.js",
    "sysResource.js",
];

/// Directory names never considered as modules.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "oh_modules",
    ".git",
    ".svn",
    ".hg",
    ".hvigor",
    ".idea",
    "build",
];

/// Configuration for a [`crate::ide::ResourceResolver`].
///
/// Deserializes from camelCase JSON (e.g. editor initialization options);
/// every missing field takes its default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Absolute workspace directory whose children are scanned for modules.
    pub workspace_root: PathBuf,
    /// SDK root directory, or the SDK resource script itself. `None` disables `sys`.
    pub sdk_path: Option<PathBuf>,
    /// Module-relative resource base (default `src/main/resources/base`).
    pub resource_base: PathBuf,
    /// SDK-relative script candidates, tried in order.
    pub sdk_script_paths: Vec<PathBuf>,
    /// Directory names skipped during module discovery.
    pub ignored_dirs: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::new(),
            sdk_path: None,
            resource_base: PathBuf::from(DEFAULT_RESOURCE_BASE),
            sdk_script_paths: DEFAULT_SDK_SCRIPT_PATHS.iter().map(PathBuf::from).collect(),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolverConfig {
    /// Defaults for a workspace root.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            ..Self::default()
        }
    }

    pub fn with_sdk_path(mut self, sdk_path: impl Into<PathBuf>) -> Self {
        self.sdk_path = Some(sdk_path.into());
        self
    }

    /// Parse loosely-typed host options.
    ///
    /// Each field is decoded on its own: a malformed field is logged and
    /// keeps its default, the others are still applied.
    pub fn from_json(value: &Value) -> Self {
        let mut config = Self::default();
        let Some(options) = value.as_object() else {
            tracing::warn!("Ignoring resolver options that are not an object: {}", value);
            return config;
        };

        if let Some(root) = option_field(options, "workspaceRoot") {
            config.workspace_root = root;
        }
        if let Some(sdk_path) = option_field(options, "sdkPath") {
            config.sdk_path = sdk_path;
        }
        if let Some(base) = option_field(options, "resourceBase") {
            config.resource_base = base;
        }
        if let Some(paths) = option_field(options, "sdkScriptPaths") {
            config.sdk_script_paths = paths;
        }
        if let Some(dirs) = option_field(options, "ignoredDirs") {
            config.ignored_dirs = dirs;
        }
        config
    }

    /// Whether `name` is a dependency/VCS directory to skip.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|ignored| ignored == name)
    }

    /// `<module>/<resource_base>`.
    pub fn resource_base_of(&self, module: &Path) -> PathBuf {
        module.join(&self.resource_base)
    }
}

/// Decode one option, or `None` when it is absent or malformed.
fn option_field<T: DeserializeOwned>(options: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = options.get(key)?;
    match T::deserialize(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Ignoring malformed resolver option '{}': {}", key, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::new("/ws");
        assert_eq!(config.workspace_root, PathBuf::from("/ws"));
        assert_eq!(config.sdk_path, None);
        assert_eq!(config.resource_base_of(Path::new("/ws/entry")), PathBuf::from("/ws/entry/src/main/resources/base"));
        assert!(config.is_ignored_dir("node_modules"));
        assert!(config.is_ignored_dir(".git"));
        assert!(!config.is_ignored_dir("entry"));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let value = serde_json::json!({
            "workspaceRoot": "/ws",
            "sdkPath": "/opt/sdk",
        });
        let config = ResolverConfig::from_json(&value);

        assert_eq!(config.sdk_path.as_deref(), Some(Path::new("/opt/sdk")));
        assert_eq!(config.resource_base, PathBuf::from(DEFAULT_RESOURCE_BASE));
        assert_eq!(config.sdk_script_paths.len(), DEFAULT_SDK_SCRIPT_PATHS.len());
    }

    #[test]
    fn test_from_json_malformed_falls_back() {
        let value = serde_json::json!({ "workspaceRoot": 42 });
        assert_eq!(ResolverConfig::from_json(&value), ResolverConfig::default());
        assert_eq!(ResolverConfig::from_json(&serde_json::json!("nope")), ResolverConfig::default());
    }

    #[test]
    fn test_from_json_bad_field_keeps_the_rest() {
        let value = serde_json::json!({
            "workspaceRoot": "/ws",
            "sdkPath": 5,
            "ignoredDirs": ["vendor"],
        });
        let config = ResolverConfig::from_json(&value);

        assert_eq!(config.workspace_root, PathBuf::from("/ws"));
        assert_eq!(config.sdk_path, None);
        assert_eq!(config.ignored_dirs, vec!["vendor".to_string()]);
        assert_eq!(config.resource_base, PathBuf::from(DEFAULT_RESOURCE_BASE));
    }

    #[test]
    fn test_from_json_null_sdk_path() {
        let value = serde_json::json!({ "workspaceRoot": "/ws", "sdkPath": null });
        assert_eq!(ResolverConfig::from_json(&value).sdk_path, None);
    }

    #[test]
    fn test_deserialize_whole_struct() {
        let config: ResolverConfig = serde_json::from_value(serde_json::json!({
            "workspaceRoot": "/ws",
            "resourceBase": "res/base",
        }))
        .unwrap();

        assert_eq!(config.resource_base, PathBuf::from("res/base"));
        assert!(config.sdk_path.is_none());
    }
}
