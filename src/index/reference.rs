//! Reference parsing: turning `'app.color.primary'` into a [`ResourceReference`].
//!
//! This runs on every keystroke-triggered request, so it is pure: no I/O,
//! no allocation beyond the resulting name.

use std::str::FromStr;

use super::types::{ResourceReference, ResourceScope, ResourceType};

/// Why a raw string is not a reference.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("empty reference")]
    Empty,
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),
    #[error("empty segment in reference")]
    EmptySegment,
    #[error("unknown scope '{0}' (expected 'app' or 'sys')")]
    UnknownScope(String),
    #[error("unknown resource type '{0}'")]
    UnknownType(String),
}

const QUOTES: [char; 3] = ['\'', '"', '`'];

/// Strip one layer of matching surrounding quotes.
fn unquote(raw: &str) -> &str {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && QUOTES.contains(&first) => {
            &raw[first.len_utf8()..raw.len() - last.len_utf8()]
        }
        _ => raw,
    }
}

impl FromStr for ResourceReference {
    type Err = ReferenceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let inner = unquote(raw);
        if inner.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let mut segments = inner.split('.');
        let (Some(scope), Some(ty), Some(name), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return Err(ReferenceError::SegmentCount(inner.split('.').count()));
        };

        if scope.is_empty() || ty.is_empty() || name.is_empty() {
            return Err(ReferenceError::EmptySegment);
        }

        let scope = ResourceScope::from_tag(scope)
            .ok_or_else(|| ReferenceError::UnknownScope(scope.to_string()))?;
        let ty = ResourceType::from_tag(ty)
            .ok_or_else(|| ReferenceError::UnknownType(ty.to_string()))?;

        Ok(ResourceReference::new(scope, ty, name))
    }
}

/// Parse a raw reference, returning `None` for anything malformed.
pub fn parse_reference(raw: &str) -> Option<ResourceReference> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unquoted() {
        let reference = parse_reference("app.color.primary").unwrap();
        assert_eq!(reference.scope, ResourceScope::App);
        assert_eq!(reference.ty, ResourceType::Color);
        assert_eq!(reference.name, "primary");
    }

    #[test]
    fn test_parse_each_quote_style() {
        for raw in ["'sys.float.x'", "\"sys.float.x\"", "`sys.float.x`"] {
            let reference = parse_reference(raw).unwrap();
            assert_eq!(reference.to_string(), "sys.float.x");
        }
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        // The quote characters stay part of the segments, so the scope is unknown
        assert_eq!(
            "'app.color.x\"".parse::<ResourceReference>(),
            Err(ReferenceError::UnknownScope("'app".to_string()))
        );
    }

    #[test]
    fn test_only_one_quote_layer_is_stripped() {
        assert!(parse_reference("''app.color.x''").is_none());
    }

    #[test]
    fn test_rejections() {
        assert_eq!("".parse::<ResourceReference>(), Err(ReferenceError::Empty));
        assert_eq!("''".parse::<ResourceReference>(), Err(ReferenceError::Empty));
        assert_eq!(
            "app.color".parse::<ResourceReference>(),
            Err(ReferenceError::SegmentCount(2))
        );
        assert_eq!(
            "app.color.a.b".parse::<ResourceReference>(),
            Err(ReferenceError::SegmentCount(4))
        );
        assert_eq!(
            "app..x".parse::<ResourceReference>(),
            Err(ReferenceError::EmptySegment)
        );
        assert_eq!(
            "app.color.".parse::<ResourceReference>(),
            Err(ReferenceError::EmptySegment)
        );
        assert_eq!(
            "ohos.color.x".parse::<ResourceReference>(),
            Err(ReferenceError::UnknownScope("ohos".to_string()))
        );
        assert_eq!(
            "app.colour.x".parse::<ResourceReference>(),
            Err(ReferenceError::UnknownType("colour".to_string()))
        );
    }

    #[test]
    fn test_single_quote_char_is_not_stripped() {
        assert_eq!(unquote("'"), "'");
        assert!(parse_reference("'").is_none());
    }
}
