//! Source position tracking for tgo.
//!
//! This crate provides byte spans, line/column lookup, the `file:line:col`
//! positions reported by diagnostics and written into line directives, and a
//! code builder that records which generated ranges were copied verbatim
//! from the original source.

use std::fmt;
use std::ops::Range;

/// Byte range `[start, end)` of a node or token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`, used for inserted semicolons.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Offsets of every line start, for offset to line/column lookups.
#[derive(Debug, Clone)]
struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// 1-indexed line and byte column of `offset`, clamped to the text.
    fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        (line as u32 + 1, offset - self.line_starts[line] + 1)
    }
}

/// A resolved position inside a named source file.
///
/// Lines and columns are 1-indexed, columns count bytes. A position
/// renders as `file:line:col`, the form Go tools print and the form line
/// directives carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Name of the file, may be empty.
    pub filename: String,
    /// Byte offset, 0-indexed.
    pub offset: u32,
    /// Line number, 1-indexed.
    pub line: u32,
    /// Column number, 1-indexed.
    pub column: u32,
}

impl Position {
    /// Whether the position carries a line number.
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return if self.filename.is_empty() {
                f.write_str("-")
            } else {
                f.write_str(&self.filename)
            };
        }
        if !self.filename.is_empty() {
            write!(f, "{}:", self.filename)?;
        }
        write!(f, "{}", self.line)?;
        if self.column != 0 {
            write!(f, ":{}", self.column)?;
        }
        Ok(())
    }
}

/// A named source text together with its line index.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    text: String,
    index: LineIndex,
}

impl SourceFile {
    /// Create a source file from its name and contents.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let index = LineIndex::new(&text);
        Self {
            name: name.into(),
            text,
            index,
        }
    }

    /// The file name as given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolve a byte offset into a position.
    pub fn position(&self, offset: u32) -> Position {
        let (line, column) = self.index.line_col(offset);
        Position {
            filename: self.name.clone(),
            offset: offset.min(self.text.len() as u32),
            line,
            column,
        }
    }
}

/// The two spellings of a Go line directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveForm {
    /// `/*line file:line:col*/`, applies to the character right after it.
    Inline,
    /// `//line file:line:col` on its own line, applies to the next line.
    Block,
}

/// Render a line directive pointing at `pos`.
///
/// The inline form starts with a space and the block form with a newline,
/// so both can be appended directly after arbitrary generated code.
pub fn line_directive(form: DirectiveForm, pos: &Position) -> String {
    match form {
        DirectiveForm::Inline => format!(
            " /*line {}:{}:{}*/",
            pos.filename, pos.line, pos.column
        ),
        DirectiveForm::Block => format!("\n//line {}:{}:{}", pos.filename, pos.line, pos.column),
    }
}

/// A range of generated code copied byte for byte from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMapping {
    pub generated_offset: u32,
    pub source_offset: u32,
    /// Length of the copied range, equal on both sides.
    pub length: u32,
}

/// Verbatim ranges of a generated file, ordered by generated offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMap {
    mappings: Vec<SourceMapping>,
}

impl SourceMap {
    /// Source offset of a generated byte, `None` for generated text.
    pub fn to_source_offset(&self, generated_offset: u32) -> Option<u32> {
        let idx = self
            .mappings
            .partition_point(|m| m.generated_offset + m.length <= generated_offset);
        let m = self.mappings.get(idx)?;
        (m.generated_offset <= generated_offset)
            .then(|| m.source_offset + (generated_offset - m.generated_offset))
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceMapping> {
        self.mappings.iter()
    }
}

/// Generated text plus the source map of its verbatim parts.
///
/// Text is normally appended, but [`CodeBuilder::insert_str`] can grow an
/// earlier unmapped region; mappings behind the insertion point move with
/// it.
#[derive(Debug, Default)]
pub struct CodeBuilder {
    code: String,
    source_map: SourceMap,
}

impl CodeBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: String::with_capacity(capacity),
            source_map: SourceMap::default(),
        }
    }

    /// Append generated text.
    pub fn push_str(&mut self, code: &str) {
        self.code.push_str(code);
    }

    /// Append `code`, copied from the source at `source_offset`.
    pub fn push_mapped(&mut self, code: &str, source_offset: u32) {
        if code.is_empty() {
            return;
        }
        self.source_map.mappings.push(SourceMapping {
            generated_offset: self.code.len() as u32,
            source_offset,
            length: code.len() as u32,
        });
        self.code.push_str(code);
    }

    /// Insert generated text at byte `at` of the output.
    pub fn insert_str(&mut self, at: usize, code: &str) {
        self.code.insert_str(at, code);
        let delta = code.len() as u32;
        for m in self.source_map.mappings.iter_mut().rev() {
            if (m.generated_offset as usize) < at {
                break;
            }
            m.generated_offset += delta;
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn finish(self) -> (String, SourceMap) {
        (self.code, self.source_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_positions() {
        let file = SourceFile::new("a.tgo", "hello\nworld\nfoo");
        let at = |offset| {
            let pos = file.position(offset);
            (pos.line, pos.column)
        };
        assert_eq!(at(0), (1, 1));
        assert_eq!(at(5), (1, 6));
        assert_eq!(at(6), (2, 1));
        assert_eq!(at(12), (3, 1));
        assert_eq!(at(99), (3, 4));
        assert_eq!(file.position(99).offset, 15);
    }

    #[test]
    fn test_position_display() {
        let file = SourceFile::new("test.tgo", "package a\n\nfunc A() {}\n");
        assert_eq!(file.position(11).to_string(), "test.tgo:3:1");
        assert_eq!(file.position(16).to_string(), "test.tgo:3:6");

        let unnamed = SourceFile::new("", "a\nb");
        assert_eq!(unnamed.position(2).to_string(), "2:1");
        assert_eq!(Position::default().to_string(), "-");
    }

    #[test]
    fn test_line_directive() {
        let file = SourceFile::new("x.tgo", "a\n\tb()\n");
        let pos = file.position(3);
        assert_eq!(
            line_directive(DirectiveForm::Inline, &pos),
            " /*line x.tgo:2:2*/"
        );
        assert_eq!(
            line_directive(DirectiveForm::Block, &pos),
            "\n//line x.tgo:2:2"
        );
    }

    #[test]
    fn test_code_builder_insert_keeps_mappings() {
        let mut builder = CodeBuilder::with_capacity(16);
        builder.push_str("w(`a");
        let at = builder.code().len();
        builder.push_str("`)\n");
        builder.insert_str(at, "b");
        builder.push_mapped("x := 1", 40);

        let (code, map) = builder.finish();
        assert_eq!(code, "w(`ab`)\nx := 1");
        assert_eq!(map.to_source_offset(8), Some(40));
        assert_eq!(map.to_source_offset(13), Some(45));
        assert_eq!(map.to_source_offset(2), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.iter().next().map(|m| m.length), Some(6));
    }
}
