//! Resource data model: scopes, type tags, references and locations.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use url::Url;

use crate::base::SourceRange;

// ============================================================================
// SCOPE
// ============================================================================

/// Top-level namespace of a reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceScope {
    /// Declared by the application's own modules.
    App,
    /// Declared by the SDK.
    Sys,
}

impl ResourceScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceScope::App => "app",
            ResourceScope::Sys => "sys",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "app" => Some(ResourceScope::App),
            "sys" => Some(ResourceScope::Sys),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RESOURCE TYPE
// ============================================================================

/// Closed set of resource type tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Color,
    String,
    Float,
    Integer,
    Boolean,
    Plural,
    Pattern,
    IntArray,
    StrArray,
    Theme,
    Symbol,
    Media,
}

impl ResourceType {
    /// Every type, in the order a module's resources are processed.
    pub const ALL: [ResourceType; 12] = [
        ResourceType::Color,
        ResourceType::String,
        ResourceType::Float,
        ResourceType::Integer,
        ResourceType::Boolean,
        ResourceType::Plural,
        ResourceType::Pattern,
        ResourceType::IntArray,
        ResourceType::StrArray,
        ResourceType::Theme,
        ResourceType::Symbol,
        ResourceType::Media,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Color => "color",
            ResourceType::String => "string",
            ResourceType::Float => "float",
            ResourceType::Integer => "integer",
            ResourceType::Boolean => "boolean",
            ResourceType::Plural => "plural",
            ResourceType::Pattern => "pattern",
            ResourceType::IntArray => "intarray",
            ResourceType::StrArray => "strarray",
            ResourceType::Theme => "theme",
            ResourceType::Symbol => "symbol",
            ResourceType::Media => "media",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == tag)
    }

    /// File name under `element/` holding this type, `None` for media.
    pub fn element_file_name(self) -> Option<&'static str> {
        match self {
            ResourceType::Color => Some("color.json"),
            ResourceType::String => Some("string.json"),
            ResourceType::Float => Some("float.json"),
            ResourceType::Integer => Some("integer.json"),
            ResourceType::Boolean => Some("boolean.json"),
            ResourceType::Plural => Some("plural.json"),
            ResourceType::Pattern => Some("pattern.json"),
            ResourceType::IntArray => Some("intarray.json"),
            ResourceType::StrArray => Some("strarray.json"),
            ResourceType::Theme => Some("theme.json"),
            ResourceType::Symbol => Some("symbol.json"),
            ResourceType::Media => None,
        }
    }

    pub fn is_media(self) -> bool {
        self == ResourceType::Media
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// REFERENCE
// ============================================================================

/// Parsed form of `scope.type.name`.
///
/// Only ever produced fully formed; see [`super::reference`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceReference {
    pub scope: ResourceScope,
    pub ty: ResourceType,
    pub name: SmolStr,
}

impl ResourceReference {
    pub fn new(scope: ResourceScope, ty: ResourceType, name: impl Into<SmolStr>) -> Self {
        Self {
            scope,
            ty,
            name: name.into(),
        }
    }

    /// Fully-qualified `scope.type.name`.
    pub fn qualified_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.scope, self.ty, self.name)
    }
}

// ============================================================================
// LOCATION
// ============================================================================

/// Where a resource is declared and what it evaluates to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLocation {
    /// Absolute path of the declaring file.
    pub path: Arc<Path>,
    /// Materialized value, or a placeholder for SDK ids.
    pub value: Arc<str>,
    /// Compact JSON of a structured value (plural/variant arrays), if any.
    pub raw_value: Option<Arc<str>>,
    /// Span of the declaration's name; absent for media and rangeless SDK hits.
    pub range: Option<SourceRange>,
}

impl ResourceLocation {
    /// The declaring file as a `file://` URI; `None` for a relative path.
    pub fn uri(&self) -> Option<Url> {
        Url::from_file_path(&*self.path).ok()
    }
}

/// One indexed declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceIndexItem {
    pub reference: ResourceReference,
    pub location: ResourceLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags_round_trip() {
        for ty in ResourceType::ALL {
            assert_eq!(ResourceType::from_tag(ty.as_str()), Some(ty));
        }
        assert_eq!(ResourceType::from_tag("Color"), None);
        assert_eq!(ResourceType::from_tag("rawfile"), None);
    }

    #[test]
    fn test_only_media_has_no_element_file() {
        let without: Vec<_> = ResourceType::ALL
            .into_iter()
            .filter(|ty| ty.element_file_name().is_none())
            .collect();
        assert_eq!(without, vec![ResourceType::Media]);
        assert_eq!(ResourceType::Color.element_file_name(), Some("color.json"));
    }

    #[test]
    fn test_reference_display() {
        let reference = ResourceReference::new(ResourceScope::Sys, ResourceType::Float, "ohos_id_text_size");
        assert_eq!(reference.qualified_name(), "sys.float.ohos_id_text_size");
    }

    #[test]
    #[cfg(unix)]
    fn test_location_uri() {
        let location = ResourceLocation {
            path: Arc::from(Path::new("/ws/entry/color.json")),
            value: Arc::from("#fff"),
            raw_value: None,
            range: None,
        };
        assert_eq!(location.uri().unwrap().as_str(), "file:///ws/entry/color.json");
    }

    #[test]
    #[cfg(unix)]
    fn test_location_uri_is_percent_encoded() {
        let location = ResourceLocation {
            path: Arc::from(Path::new("/tmp/my ws/#1/color.json")),
            value: Arc::from("#fff"),
            raw_value: None,
            range: None,
        };
        let uri = location.uri().unwrap();

        assert_eq!(uri.as_str(), "file:///tmp/my%20ws/%231/color.json");
        assert_eq!(uri.fragment(), None);
        assert_eq!(uri.to_file_path().unwrap(), Path::new("/tmp/my ws/#1/color.json"));
    }

    #[test]
    fn test_relative_path_has_no_uri() {
        let location = ResourceLocation {
            path: Arc::from(Path::new("entry/color.json")),
            value: Arc::from(""),
            raw_value: None,
            range: None,
        };
        assert!(location.uri().is_none());
    }
}
