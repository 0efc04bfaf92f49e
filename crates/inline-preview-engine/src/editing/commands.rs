use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;

/// Edit commands accepted by [`Document::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert text at a byte offset
    InsertText { at: usize, text: String },
    /// Remove a byte range
    DeleteRange { range: Range<usize> },
    /// Replace a byte range with new text
    ReplaceRange { range: Range<usize>, text: String },
    /// Move the caret or selection without touching the text
    SetSelection { range: Range<usize> },
}

/// A single contiguous replacement, in old-document byte offsets
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

impl Edit {
    pub(crate) fn inserted_len(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn to_delta(&self, base_len: usize) -> Delta<RopeInfo> {
        let mut builder = Builder::new(base_len);
        builder.replace(self.range.clone(), Rope::from(self.text.as_str()));
        builder.build()
    }

    /// Map an old offset to its position after this edit.
    /// Offsets at the end of the replaced range move past the inserted text.
    pub(crate) fn map_offset(&self, offset: usize) -> usize {
        if offset >= self.range.end {
            offset - self.range.len() + self.inserted_len()
        } else if offset <= self.range.start {
            offset
        } else {
            self.range.start + self.inserted_len()
        }
    }
}

/// Compile a command into a text edit. Selection-only commands and no-op edits yield `None`.
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Option<Edit> {
    let len = doc.len();
    let clamp = |range: &Range<usize>| {
        let start = range.start.min(len);
        start..range.end.min(len).max(start)
    };

    let edit = match cmd {
        Cmd::InsertText { at, text } => {
            let at = (*at).min(len);
            Edit {
                range: at..at,
                text: text.clone(),
            }
        }
        Cmd::DeleteRange { range } => Edit {
            range: clamp(range),
            text: String::new(),
        },
        Cmd::ReplaceRange { range, text } => Edit {
            range: clamp(range),
            text: text.clone(),
        },
        Cmd::SetSelection { .. } => return None,
    };

    if edit.range.is_empty() && edit.text.is_empty() {
        return None;
    }

    // Never split a UTF-8 sequence
    let text = doc.text();
    if !text.is_char_boundary(edit.range.start) || !text.is_char_boundary(edit.range.end) {
        log::warn!(
            "ignoring edit at {:?}: not on a character boundary",
            edit.range
        );
        return None;
    }

    Some(edit)
}

/// Selection after the command has been applied
pub(crate) fn transform_selection_for_command(
    doc: &Document,
    selection: &Range<usize>,
    cmd: &Cmd,
    edit: Option<&Edit>,
) -> Range<usize> {
    if let Cmd::SetSelection { range } = cmd {
        let len = doc.len();
        let start = range.start.min(len);
        return start..range.end.min(len).max(start);
    }

    match edit {
        Some(edit) => edit.map_offset(selection.start)..edit.map_offset(selection.end),
        None => selection.clone(),
    }
}
