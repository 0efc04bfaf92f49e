use std::ops::Range;

use crate::decorations::{ImageMark, ImageWidget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Block preview anchored at a single offset
    Widget(ImageWidget),
    /// Inline styling over a span
    Mark(ImageMark),
}

/// One decoration and where it applies. Widgets have `from == to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationEntry {
    pub from: usize,
    pub to: usize,
    pub decoration: Decoration,
}

impl DecorationEntry {
    pub fn widget(at: usize, widget: ImageWidget) -> Self {
        Self {
            from: at,
            to: at,
            decoration: Decoration::Widget(widget),
        }
    }

    pub fn mark(range: Range<usize>, mark: ImageMark) -> Self {
        Self {
            from: range.start,
            to: range.end,
            decoration: Decoration::Mark(mark),
        }
    }

    pub fn as_widget(&self) -> Option<&ImageWidget> {
        match &self.decoration {
            Decoration::Widget(widget) => Some(widget),
            Decoration::Mark(_) => None,
        }
    }

    pub fn as_mark(&self) -> Option<&ImageMark> {
        match &self.decoration {
            Decoration::Mark(mark) => Some(mark),
            Decoration::Widget(_) => None,
        }
    }
}

/// Immutable, position-ordered collection of decorations.
///
/// Built wholesale from a walk of the document; there is no incremental
/// patching. Two sets are equal when their entries are, which is the only
/// comparison callers should rely on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    entries: Vec<DecorationEntry>,
}

impl DecorationSet {
    /// The empty set
    pub const fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Order entries by `from`. Entries sharing an offset keep their emission order.
    pub fn build(mut entries: Vec<DecorationEntry>) -> Self {
        if entries.is_empty() {
            return Self::none();
        }
        entries.sort_by_key(|entry| entry.from);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecorationEntry> {
        self.entries.iter()
    }

    pub fn widgets(&self) -> impl Iterator<Item = (usize, &ImageWidget)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.as_widget().map(|widget| (entry.from, widget)))
    }

    pub fn marks(&self) -> impl Iterator<Item = (Range<usize>, &ImageMark)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.as_mark().map(|mark| (entry.from..entry.to, mark)))
    }

    /// Entries touching `range`, for hosts that only draw a viewport
    pub fn in_range(&self, range: Range<usize>) -> impl Iterator<Item = &DecorationEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.from <= range.end && entry.to >= range.start)
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a DecorationEntry;
    type IntoIter = std::slice::Iter<'a, DecorationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
