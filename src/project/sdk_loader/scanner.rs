//! Structural scanning of the SDK's generated resource script.
//!
//! The script has no schema. It is roughly a nested object literal:
//!
//! ```text
//! module.exports.sys = {
//!     color: {
//!         ohos_id_color_foreground: 125829120,
//!         ...
//!     },
//!     float: { ... },
//! }
//! ```
//!
//! A section starts at a `<type>:` key followed by `{` and ends when brace
//! depth drops back to where it was before that `{`. Keys directly inside a
//! section are resource names.
//!
//! Two passes run over the same text:
//!
//! 1. **Line pass** - every key and its `:` (and a section marker and its
//!    `{`) must sit on one line. Hits from this pass carry a precise range.
//! 2. **Catalogue pass** - the same walk with line breaks allowed anywhere.
//!    It decides which resources exist; hits the line pass missed have no
//!    range.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::{LineIndex, SourceRange, TextRange, TextSize};
use crate::index::ResourceType;

/// One system resource found in the script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdkEntry {
    pub ty: ResourceType,
    pub name: SmolStr,
    /// Placeholder carrying the numeric id, or the literal when not numeric.
    pub value: Arc<str>,
    pub range: Option<SourceRange>,
}

/// Scan the script text for every `(type, name)` declaration.
///
/// Never fails: an unrecognizable script yields no entries.
pub fn scan_sdk_script(text: &str) -> Vec<SdkEntry> {
    let precise = Walker::new(text, true).run();
    let catalogue = Walker::new(text, false).run();
    let line_index = LineIndex::new(text);

    let mut ranges: FxHashMap<(ResourceType, &str), TextRange> = FxHashMap::default();
    for hit in &precise {
        ranges.entry((hit.ty, hit.name)).or_insert(hit.span);
    }

    let mut seen: FxHashSet<(ResourceType, &str)> = FxHashSet::default();
    let mut entries = Vec::with_capacity(catalogue.len());
    for hit in catalogue.iter().chain(&precise) {
        if !seen.insert((hit.ty, hit.name)) {
            continue;
        }
        entries.push(SdkEntry {
            ty: hit.ty,
            name: SmolStr::new(hit.name),
            value: hit.value.clone(),
            range: ranges.get(&(hit.ty, hit.name)).map(|&span| line_index.range(span)),
        });
    }

    let rangeless = entries.iter().filter(|e| e.range.is_none()).count();
    if rangeless > 0 {
        tracing::debug!("{} SDK resource(s) found without a line-level match", rangeless);
    }
    entries
}

/// Placeholder value for an SDK id.
pub fn id_placeholder(id: &str) -> String {
    format!("system resource #{}", id)
}

struct Hit<'t> {
    ty: ResourceType,
    name: &'t str,
    value: Arc<str>,
    span: TextRange,
}

struct Walker<'t> {
    text: &'t str,
    bytes: &'t [u8],
    /// Keys and markers must not straddle a line break.
    line_bound: bool,
}

impl<'t> Walker<'t> {
    fn new(text: &'t str, line_bound: bool) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            line_bound,
        }
    }

    fn run(&self) -> Vec<Hit<'t>> {
        let text = self.text;
        let mut hits = Vec::new();
        let mut depth = 0usize;
        let mut section: Option<(ResourceType, usize)> = None;
        let mut marker: Option<ResourceType> = None;
        let mut i = 0;

        while i < self.bytes.len() {
            let b = self.bytes[i];
            match b {
                b'\n' => {
                    if self.line_bound {
                        marker = None;
                    }
                    i += 1;
                }
                b'/' if matches!(self.bytes.get(i + 1), Some(b'/') | Some(b'*')) => {
                    i = self.skip_comment(i);
                }
                b'{' => {
                    if section.is_none() {
                        if let Some(ty) = marker {
                            section = Some((ty, depth));
                        }
                    }
                    marker = None;
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if matches!(section, Some((_, base)) if depth <= base) {
                        section = None;
                    }
                    marker = None;
                    i += 1;
                }
                b'"' | b'\'' | b'`' | b'_' | b'$' | b'a'..=b'z' | b'A'..=b'Z' => {
                    let (content, after) = self.read_key(i);
                    let colon = self.skip_trivia(after, self.line_bound);
                    if self.bytes.get(colon) != Some(&b':') {
                        marker = None;
                        i = after;
                        continue;
                    }

                    let name = &text[content.clone()];
                    i = colon + 1;
                    match section {
                        None => marker = ResourceType::from_tag(name),
                        Some((ty, base)) if depth == base + 1 && !name.is_empty() => {
                            let (value, next) = self.read_value(i);
                            hits.push(Hit {
                                ty,
                                name,
                                value,
                                span: TextRange::new(
                                    TextSize::from(content.start as u32),
                                    TextSize::from(content.end as u32),
                                ),
                            });
                            i = next;
                        }
                        Some(_) => {}
                    }
                }
                b if b.is_ascii_whitespace() => i += 1,
                _ => {
                    marker = None;
                    i += 1;
                }
            }
        }

        hits
    }

    /// Read an identifier or a quoted string starting at `i`.
    ///
    /// Returns the byte range of the content (without quotes) and the
    /// position after the token.
    fn read_key(&self, i: usize) -> (std::ops::Range<usize>, usize) {
        if matches!(self.bytes[i], b'"' | b'\'' | b'`') {
            return self.read_string(i);
        }

        let mut end = i;
        while end < self.bytes.len() && is_ident_byte(self.bytes[end]) {
            end += 1;
        }
        (i..end, end)
    }

    /// Read the string literal opening at `i`.
    ///
    /// An unterminated literal ends at the line break (or end of text).
    fn read_string(&self, i: usize) -> (std::ops::Range<usize>, usize) {
        let quote = self.bytes[i];
        let mut j = i + 1;
        while j < self.bytes.len() {
            match self.bytes[j] {
                b'\\' => j += 2,
                b'\n' if quote != b'`' => return (i + 1..j, j),
                b if b == quote => return (i + 1..j, j + 1),
                _ => j += 1,
            }
        }
        let end = self.bytes.len();
        (i + 1..end, end)
    }

    /// Skip a `//` or `/* */` comment starting at `i`.
    fn skip_comment(&self, i: usize) -> usize {
        if self.bytes.get(i + 1) == Some(&b'/') {
            let mut j = i + 2;
            while j < self.bytes.len() && self.bytes[j] != b'\n' {
                j += 1;
            }
            return j;
        }
        match self.text[i + 2..].find("*/") {
            Some(offset) => i + 2 + offset + 2,
            None => self.bytes.len(),
        }
    }

    /// Skip whitespace and comments, optionally stopping at a line break.
    fn skip_trivia(&self, mut i: usize, stop_at_newline: bool) -> usize {
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\n' if stop_at_newline => return i,
                b'/' if matches!(self.bytes.get(i + 1), Some(b'/') | Some(b'*')) => {
                    let end = self.skip_comment(i);
                    if stop_at_newline && self.text[i..end].contains('\n') {
                        return i;
                    }
                    i = end;
                }
                b if b.is_ascii_whitespace() => i += 1,
                _ => return i,
            }
        }
        i
    }

    /// Read the value after a resource name's `:`.
    ///
    /// Nested objects and arrays are left for the main walk.
    fn read_value(&self, i: usize) -> (Arc<str>, usize) {
        let start = self.skip_trivia(i, false);
        let Some(&first) = self.bytes.get(start) else {
            return (Arc::from(""), start);
        };

        match first {
            b'{' | b'[' => (Arc::from(""), start),
            b'"' | b'\'' | b'`' => {
                let (content, end) = self.read_string(start);
                (Arc::from(&self.text[content]), end)
            }
            _ => {
                let mut end = start;
                while end < self.bytes.len() && !matches!(self.bytes[end], b',' | b'}' | b'\n') {
                    if self.bytes[end] == b'/' && matches!(self.bytes.get(end + 1), Some(b'/') | Some(b'*')) {
                        break;
                    }
                    end += 1;
                }
                let literal = self.text[start..end].trim();
                let value = if is_numeric(literal) {
                    id_placeholder(literal)
                } else {
                    literal.to_string()
                };
                (Arc::from(value), end)
            }
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_numeric(literal: &str) -> bool {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    !digits.is_empty()
        && digits.as_bytes()[0].is_ascii_digit()
        && digits
            .bytes()
            .all(|b| b.is_ascii_hexdigit() || matches!(b, b'x' | b'X' | b'.' | b'_'))
}
