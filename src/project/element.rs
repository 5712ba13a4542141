//! Declarative resource files: `element/<type>.json` and `media/*`.
//!
//! An element file looks like:
//!
//! ```json
//! { "color": [ { "name": "primary", "value": "#1976D2" } ] }
//! ```
//!
//! JSON decoding yields names and values but no positions, so the raw text
//! is scanned separately for the span of every `"name"` value at entry
//! depth. The two are paired up in order.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use smol_str::SmolStr;
use walkdir::WalkDir;

use crate::base::{LineIndex, SourceRange, TextRange, TextSize};
use crate::error::{ResourceError, Result};
use crate::index::ResourceType;

/// One declaration read from a resource file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementEntry {
    pub name: SmolStr,
    /// Representative textual value.
    pub value: Arc<str>,
    /// Compact JSON of a structured value, when the value was flattened.
    pub raw_value: Option<Arc<str>>,
    /// Byte span of the name string (without quotes) in the raw file.
    pub span: Option<TextRange>,
    /// `span` in line/character coordinates.
    pub range: Option<SourceRange>,
}

/// Where a type's declarations live under a resource base directory.
///
/// `base/element/<type>.json`, or the `base/media` directory for media.
pub fn resource_path(base: &Path, ty: ResourceType) -> PathBuf {
    match ty.element_file_name() {
        Some(file_name) => base.join("element").join(file_name),
        None => base.join("media"),
    }
}

/// Parse the declarations of one type at `path`.
///
/// A missing file or directory contributes nothing and is not an error.
pub fn parse_resource_file(path: &Path, ty: ResourceType) -> Result<Vec<ElementEntry>> {
    if ty.is_media() {
        return list_media(path);
    }

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(ResourceError::io(path, err)),
    };

    parse_element_text(&text, ty).map_err(|err| match err {
        ElementError::Json(source) => ResourceError::Json {
            path: path.to_path_buf(),
            source,
        },
        ElementError::NotAnObject => ResourceError::NotAnObject {
            path: path.to_path_buf(),
        },
    })
}

/// Failure to decode element text, before a path is attached.
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("top level is not a JSON object")]
    NotAnObject,
}

/// Parse the raw text of an element file.
///
/// A leading byte-order mark is skipped; spans still index into `text`,
/// ranges are relative to the content after it.
pub fn parse_element_text(text: &str, ty: ResourceType) -> std::result::Result<Vec<ElementEntry>, ElementError> {
    let body = text.strip_prefix('\u{feff}').unwrap_or(text);
    let bom = TextSize::of(&text[..text.len() - body.len()]);

    let root: Value = serde_json::from_str(body).map_err(ElementError::Json)?;
    let Value::Object(root) = root else {
        return Err(ElementError::NotAnObject);
    };

    let Some(Value::Array(declarations)) = root.get(ty.as_str()) else {
        tracing::debug!("Element file has no '{}' array", ty);
        return Ok(Vec::new());
    };

    let spans = scan_name_spans(body, ty.as_str());
    let line_index = LineIndex::new(body);
    let mut cursor = 0;
    let mut entries = Vec::with_capacity(declarations.len());

    for declaration in declarations {
        let Some(name) = declaration
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
        else {
            tracing::warn!("Skipping '{}' entry without a name", ty);
            continue;
        };

        let (value, raw_value) = match declaration.get("value") {
            Some(value) => materialize(value),
            None => (Arc::from(""), None),
        };

        // Spans come in document order; never look behind the last match
        let span = spans[cursor..]
            .iter()
            .position(|(candidate, _)| candidate == name)
            .map(|offset| {
                cursor += offset + 1;
                spans[cursor - 1].1
            });

        entries.push(ElementEntry {
            name: SmolStr::new(name),
            value,
            raw_value,
            span: span.map(|span| span + bom),
            range: span.map(|span| line_index.range(span)),
        });
    }

    tracing::debug!("Parsed {} '{}' entries", entries.len(), ty);
    Ok(entries)
}

/// Turn a JSON value into one displayable string.
///
/// Arrays of `{.., "value": ..}` objects (plural forms, pattern/theme
/// attributes, string arrays) flatten to the first element's value and keep
/// the original array as compact JSON.
fn materialize(value: &Value) -> (Arc<str>, Option<Arc<str>>) {
    match value {
        Value::String(s) => (Arc::from(s.as_str()), None),
        Value::Null => (Arc::from(""), None),
        Value::Array(items) => {
            let first_value = items.first().and_then(|first| first.get("value"));
            match first_value {
                Some(inner) => (materialize(inner).0, Some(Arc::from(value.to_string()))),
                None => (Arc::from(value.to_string()), None),
            }
        }
        other => (Arc::from(other.to_string()), None),
    }
}

/// Byte spans of every `"name"` string value at entry depth under `section`.
///
/// Depth 1 is the root object, 2 the section array, 3 an entry object.
/// Nested `"name"` keys inside entry values are ignored.
fn scan_name_spans(text: &str, section: &str) -> Vec<(SmolStr, TextRange)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut root_key: Option<&str> = None;
    let mut expecting_name = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end] != b'"' {
                    end += if bytes[end] == b'\\' { 2 } else { 1 };
                }
                let end = end.min(bytes.len());
                let content = &text[start..end];
                i = end + 1;

                let mut next = i;
                while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                    next += 1;
                }
                let is_key = bytes.get(next) == Some(&b':');

                if is_key {
                    if depth == 1 {
                        root_key = Some(content);
                    }
                    expecting_name = depth == 3 && content == "name" && root_key == Some(section);
                    i = next + 1;
                } else if expecting_name {
                    let range = TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32));
                    spans.push((SmolStr::new(content), range));
                    expecting_name = false;
                }
                continue;
            }
            b'{' | b'[' => {
                depth += 1;
                expecting_name = false;
            }
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                expecting_name = false;
            }
            b',' => expecting_name = false,
            _ => {}
        }
        i += 1;
    }

    spans
}

/// Every regular, non-hidden file directly inside a media directory.
fn list_media(dir: &Path) -> Result<Vec<ElementEntry>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("Skipping unreadable media entry: {}", err);
                continue;
            }
        };
        if !entry.path().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if file_name.starts_with('.') {
            continue;
        }
        let Some(stem) = entry.path().file_stem().map(|stem| stem.to_string_lossy()) else {
            continue;
        };

        entries.push(ElementEntry {
            name: SmolStr::new(stem.as_ref()),
            value: Arc::from(file_name.as_ref()),
            raw_value: None,
            span: None,
            range: None,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::LineCol;

    const COLORS: &str = r##"{
  "color": [
    {
      "name": "primary",
      "value": "#1976D2"
    },
    { "name": "accent", "value": "#FF4081" }
  ]
}"##;

    #[test]
    fn test_parse_color_file() {
        let entries = parse_element_text(COLORS, ResourceType::Color).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "primary");
        assert_eq!(entries[0].value.as_ref(), "#1976D2");
        assert_eq!(
            entries[0].range,
            Some(SourceRange::new(LineCol::new(3, 15), LineCol::new(3, 22)))
        );
        let span = entries[1].span.unwrap();
        assert_eq!(&COLORS[span], "accent");
    }

    #[test]
    fn test_string_variants_flatten() {
        let text = r#"{"string":[{"name":"greeting","value":[{"id":"a","value":"Hello"},{"id":"b","value":"Hi"}]}]}"#;
        let entries = parse_element_text(text, ResourceType::String).unwrap();

        assert_eq!(entries[0].value.as_ref(), "Hello");
        let raw = entries[0].raw_value.as_deref().unwrap();
        assert!(raw.contains("\"Hi\""));
    }

    #[test]
    fn test_scalar_and_int_array_values() {
        let text = r#"{"integer":[{"name":"count","value":3}]}"#;
        let entries = parse_element_text(text, ResourceType::Integer).unwrap();
        assert_eq!(entries[0].value.as_ref(), "3");

        let text = r#"{"intarray":[{"name":"sizes","value":[1,2,3]}]}"#;
        let entries = parse_element_text(text, ResourceType::IntArray).unwrap();
        assert_eq!(entries[0].value.as_ref(), "[1,2,3]");
        assert_eq!(entries[0].raw_value, None);
    }

    #[test]
    fn test_nested_names_are_not_declarations() {
        // "width" is an attribute of the pattern, and a later pattern reuses that name
        let text = r#"{
  "pattern": [
    { "name": "card", "value": [ { "name": "width", "value": "100vp" } ] },
    { "name": "width", "value": [] }
  ]
}"#;
        let entries = parse_element_text(text, ResourceType::Pattern).unwrap();
        let span = entries[1].span.unwrap();

        assert_eq!(entries[1].range.unwrap().start.line, 3);
        assert_eq!(&text[span], "width");
    }

    #[test]
    fn test_other_sections_are_ignored() {
        let text = r##"{"float":[{"name":"primary","value":"1"}],"color":[{"name":"primary","value":"#000"}]}"##;
        let entries = parse_element_text(text, ResourceType::Color).unwrap();
        let span = entries[0].span.unwrap();

        assert!(usize::from(span.start()) > text.find("color").unwrap());
    }

    #[test]
    fn test_missing_section_and_nameless_entries() {
        let entries = parse_element_text(r#"{"float":[]}"#, ResourceType::Color).unwrap();
        assert!(entries.is_empty());

        let entries = parse_element_text(r##"{"color":[{"value":"#000"},{"name":"","value":"#111"}]}"##, ResourceType::Color).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_and_non_object() {
        assert!(matches!(
            parse_element_text("{\"color\": [", ResourceType::Color),
            Err(ElementError::Json(_))
        ));
        assert!(matches!(
            parse_element_text("[]", ResourceType::Color),
            Err(ElementError::NotAnObject)
        ));
    }

    #[test]
    fn test_escaped_quotes_do_not_derail_scan() {
        let text = r#"{"string":[{"name":"quote","value":"say \"name\": x"},{"name":"next","value":"y"}]}"#;
        let entries = parse_element_text(text, ResourceType::String).unwrap();

        assert_eq!(&text[entries[1].span.unwrap()], "next");
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let text = format!("\u{feff}{}", COLORS);
        let entries = parse_element_text(&text, ResourceType::Color).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(&text[entries[0].span.unwrap()], "primary");
        assert_eq!(&text[entries[1].span.unwrap()], "accent");
        assert_eq!(
            entries[0].range,
            Some(SourceRange::new(LineCol::new(3, 15), LineCol::new(3, 22)))
        );
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = resource_path(dir.path(), ResourceType::Color);

        assert!(parse_resource_file(&path, ResourceType::Color).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.json");
        std::fs::write(&path, "not json").unwrap();

        let err = parse_resource_file(&path, ResourceType::Color).unwrap_err();
        assert!(matches!(err, ResourceError::Json { .. }));
        assert!(err.to_string().contains("color.json"));
    }

    #[test]
    fn test_media_listing() {
        let dir = tempfile::tempdir().unwrap();
        let media = resource_path(dir.path(), ResourceType::Media);
        std::fs::create_dir_all(media.join("nested")).unwrap();
        std::fs::write(media.join("icon.png"), [0u8; 4]).unwrap();
        std::fs::write(media.join("background.svg"), "<svg/>").unwrap();
        std::fs::write(media.join(".DS_Store"), "").unwrap();

        let entries = parse_resource_file(&media, ResourceType::Media).unwrap();
        let names: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.value.as_ref())).collect();

        assert_eq!(names, vec![("background", "background.svg"), ("icon", "icon.png")]);
        assert!(entries.iter().all(|e| e.range.is_none()));
    }
}
