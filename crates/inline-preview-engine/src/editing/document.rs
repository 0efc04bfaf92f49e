use std::borrow::Cow;
use std::ops::Range;

use tree_sitter::{InputEdit, Parser, Point};
use tree_sitter_md::{INLINE_LANGUAGE, LANGUAGE, MarkdownParser, MarkdownTree};
use xi_rope::Rope;

use crate::editing::commands::{self, Edit};
use crate::editing::{Cmd, Transaction};
use crate::syntax::{Line, SyntaxNode, SyntaxTree, TextAccess};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Failed to load markdown grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

/// Markdown buffer with its tree-sitter parse
///
/// The document owns:
/// - **Text**: a single `xi_rope::Rope`, never regenerated from a model
/// - **Tree**: a tree-sitter-md `MarkdownTree`, the block tree plus one inline
///   tree per `inline` and `pipe_table_cell` node, reparsed incrementally
///   after each edit
/// - **Selection** and a **version** counter bumped on every transaction
///
/// It implements [`SyntaxTree`] and [`TextAccess`], which is all the
/// decoration engine needs to see.
///
/// ```rust
/// # use inline_preview_engine::editing::{Cmd, Document};
/// let mut doc = Document::from_bytes(b"![cat](cat.png)\n").unwrap();
/// let tr = doc.apply(Cmd::InsertText { at: 0, text: "# Pets\n".to_string() });
/// assert!(tr.doc_changed);
/// assert_eq!(doc.text(), "# Pets\n![cat](cat.png)\n");
/// ```
pub struct Document {
    pub(crate) buffer: Rope,
    pub(crate) selection: Range<usize>,
    pub(crate) version: u64,
    parser: MarkdownParser,
    pub(crate) tree: Option<MarkdownTree>,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        check_grammars()?;

        let buffer = Rope::from(text);
        let len = buffer.len();
        let mut doc = Self {
            buffer,
            selection: len..len,
            version: 0,
            parser: MarkdownParser::default(),
            tree: None,
        };
        doc.reparse(None);

        Ok(doc)
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply a command and reparse
    ///
    /// The tree is told about the edit with `MarkdownTree::edit` while the old
    /// buffer is still in place, since `InputEdit` points are computed against
    /// old coordinates. The delta is applied afterwards and the tree reparsed
    /// incrementally.
    pub fn apply(&mut self, cmd: Cmd) -> Transaction {
        let edit = commands::compile_command(self, &cmd);

        let mut changed = Vec::new();
        if let Some(edit) = &edit {
            let input_edit = self.input_edit(edit);
            let delta = edit.to_delta(self.buffer.len());

            let old_tree = self.tree.take().map(|mut tree| {
                tree.edit(&input_edit);
                tree
            });

            self.buffer = delta.apply(&self.buffer);
            self.reparse(old_tree.as_ref());

            changed.push(edit.range.start..edit.range.start + edit.inserted_len());
        }

        let new_selection =
            commands::transform_selection_for_command(self, &self.selection, &cmd, edit.as_ref());
        self.selection = new_selection.clone();
        self.version += 1;

        Transaction {
            changed,
            new_selection,
            version: self.version,
            doc_changed: edit.is_some(),
        }
    }

    /// Get the current selection range
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the parse tree, for tests and diagnostics
    pub fn tree(&self) -> Option<&MarkdownTree> {
        self.tree.as_ref()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Number of lines, counting a trailing empty line after a final newline
    pub fn line_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    fn reparse(&mut self, old_tree: Option<&MarkdownTree>) {
        let text = self.buffer.to_string();
        self.tree = self.parser.parse(text.as_bytes(), old_tree);
        if self.tree.is_none() {
            log::warn!("markdown parse produced no tree");
        }
    }

    /// Build the tree-sitter edit for a replacement, in old-document coordinates
    fn input_edit(&self, edit: &Edit) -> InputEdit {
        let start_position = self.point_at(edit.range.start);
        InputEdit {
            start_byte: edit.range.start,
            old_end_byte: edit.range.end,
            new_end_byte: edit.range.start + edit.inserted_len(),
            start_position,
            old_end_position: self.point_at(edit.range.end),
            new_end_position: advance_point(start_position, &edit.text),
        }
    }

    fn point_at(&self, offset: usize) -> Point {
        let offset = offset.min(self.buffer.len());
        let row = self.buffer.line_of_offset(offset);
        Point {
            row,
            column: offset - self.buffer.offset_of_line(row),
        }
    }
}

/// `MarkdownParser` panics when a grammar does not match the tree-sitter
/// runtime, so both are loaded once here to report it as an error instead
fn check_grammars() -> Result<(), DocumentError> {
    let mut parser = Parser::new();
    parser.set_language(&LANGUAGE.into())?;
    parser.set_language(&INLINE_LANGUAGE.into())?;
    Ok(())
}

/// Point reached after inserting `text` at `start`
fn advance_point(start: Point, text: &str) -> Point {
    match text.rfind('\n') {
        Some(last_newline) => Point {
            row: start.row + text.matches('\n').count(),
            column: text.len() - last_newline - 1,
        },
        None => Point {
            row: start.row,
            column: start.column + text.len(),
        },
    }
}

impl SyntaxTree for Document {
    fn visit(&self, visitor: &mut dyn FnMut(SyntaxNode<'_>)) {
        let Some(tree) = &self.tree else {
            return;
        };

        // The cursor steps from `inline` and `pipe_table_cell` block nodes
        // into their inline trees, so inline nodes follow their block parent
        let mut cursor = tree.walk();
        loop {
            let node = cursor.node();
            visitor(SyntaxNode::new(node.kind(), node.start_byte(), node.end_byte()));

            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }
}

impl TextAccess for Document {
    fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        TextAccess::slice(&self.buffer, range)
    }

    fn line_at(&self, offset: usize) -> Line {
        self.buffer.line_at(offset)
    }
}

impl Clone for Document {
    fn clone(&self) -> Self {
        // Parsers are not Clone; the grammars were checked when `self` was built
        Self {
            buffer: self.buffer.clone(),
            selection: self.selection.clone(),
            version: self.version,
            parser: MarkdownParser::default(),
            tree: self.tree.clone(),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // Trees are derived from the buffer
        self.buffer.to_string() == other.buffer.to_string()
            && self.selection == other.selection
            && self.version == other.version
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.buffer.len())
            .field("selection", &self.selection)
            .field("version", &self.version)
            .field(
                "inline_trees",
                &self.tree.as_ref().map_or(0, |tree| tree.inline_trees().len()),
            )
            .finish()
    }
}
