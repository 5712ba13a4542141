//! Source text positions and ranges.

use std::fmt;

// Re-export from text-size for compatibility
pub use text_size::TextRange;
pub use text_size::TextSize;

/// A line and character position in source text.
///
/// Both fields are 0-indexed internally, but displayed as 1-indexed.
/// `character` counts UTF-16 code units, which is what editors expect.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct LineCol {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed character offset within the line (UTF-16 code units)
    pub character: u32,
}

impl LineCol {
    /// Create a new LineCol position.
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Get 1-indexed line number (for display).
    #[inline]
    pub const fn line_one_indexed(self) -> u32 {
        self.line + 1
    }

    /// Get 1-indexed character number (for display).
    #[inline]
    pub const fn character_one_indexed(self) -> u32 {
        self.character + 1
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.character_one_indexed())
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.character_one_indexed())
    }
}

/// A start/end span in line/character coordinates.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SourceRange {
    pub start: LineCol,
    pub end: LineCol,
}

impl SourceRange {
    #[inline]
    pub const fn new(start: LineCol, end: LineCol) -> Self {
        Self { start, end }
    }

    /// A span lying on a single line.
    #[inline]
    pub const fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self {
            start: LineCol::new(line, start),
            end: LineCol::new(line, end),
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Index for converting byte offsets of one text into line/character positions.
#[derive(Clone, Debug)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of the start of each line
    line_starts: Vec<TextSize>,
}

impl<'a> LineIndex<'a> {
    /// Build a line index from source text.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];

        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }

        Self { text, line_starts }
    }

    /// Convert a byte offset to a line/character position.
    ///
    /// Offsets past the end of the text clamp to the end.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(TextSize::of(self.text));
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);

        let line_start = usize::from(self.line_starts[line]);
        let end = usize::from(offset);
        let character = self
            .text
            .get(line_start..end)
            .map(|prefix| prefix.encode_utf16().count())
            .unwrap_or(end - line_start);

        LineCol {
            line: line as u32,
            character: character as u32,
        }
    }

    /// Convert a byte range to a line/character span.
    pub fn range(&self, range: TextRange) -> SourceRange {
        SourceRange::new(self.line_col(range.start()), self.line_col(range.end()))
    }
}
