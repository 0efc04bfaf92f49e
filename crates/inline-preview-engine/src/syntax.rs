//! Read-only views the decoration engine consumes from its host.
//!
//! The walker never talks to tree-sitter or xi-rope directly. It sees a
//! [`SyntaxTree`] that can enumerate typed spans and a [`TextAccess`] that can
//! slice text and resolve lines. [`crate::editing::Document`] implements both.

use std::borrow::Cow;
use std::ops::Range;

use xi_rope::Rope;

/// A single node of a parsed buffer: its grammatical category and byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxNode<'a> {
    pub kind: &'a str,
    pub from: usize,
    pub to: usize,
}

impl<'a> SyntaxNode<'a> {
    pub fn new(kind: &'a str, from: usize, to: usize) -> Self {
        Self { kind, from, to }
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// A parse tree that can be walked in full.
pub trait SyntaxTree {
    /// Visit every node depth-first, parents before children.
    fn visit(&self, visitor: &mut dyn FnMut(SyntaxNode<'_>));
}

/// A line of the buffer. `to` stops before the line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// 0-based line number
    pub number: usize,
    pub from: usize,
    pub to: usize,
}

/// Slicing and line lookup over the buffer text.
pub trait TextAccess {
    /// Text for a byte range, clamped to the buffer.
    fn slice(&self, range: Range<usize>) -> Cow<'_, str>;

    /// The line containing `offset`. Offsets past the end resolve to the last line.
    fn line_at(&self, offset: usize) -> Line;
}

impl TextAccess for Rope {
    fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.slice_to_cow(start..end)
    }

    fn line_at(&self, offset: usize) -> Line {
        let offset = offset.min(self.len());
        let number = self.line_of_offset(offset);
        let from = self.offset_of_line(number);
        let next = self.offset_of_line(number + 1).clamp(from, self.len());

        let raw = self.slice_to_cow(from..next);
        let content = raw.strip_suffix('\n').unwrap_or(&raw);
        let content = content.strip_suffix('\r').unwrap_or(content);

        Line {
            number,
            from,
            to: from + content.len(),
        }
    }
}
