/*!
 * # Editing Core
 *
 * The buffer side of the editor: text, parse trees, and the command loop that
 * turns user input into transactions.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire document lives in one **`xi_rope::Rope`**
 * - Every command compiles to a single contiguous replacement and then to a **Delta**
 * - Saving writes the rope bytes verbatim
 *
 * ### 2. Incremental Parsing with Tree-sitter
 * - The **tree-sitter-md** block grammar is reparsed incrementally: edits are fed
 *   via `tree.edit()` before the delta is applied
 * - The inline grammar runs over each block-level `inline` node, so inline
 *   constructs such as images appear in the same offset space as blocks
 *
 * ### 3. Transactions
 * - [`Document::apply`] returns a [`Transaction`] describing what changed
 * - Selection-only commands still produce a transaction with `doc_changed == false`
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` with rope buffer and tree-sitter integration
 * - **`commands`**: `Cmd` enum and its compilation to edits
 * - **`transaction`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use inline_preview_engine::editing::*;
 *
 * let mut doc = Document::from_bytes(b"# Hello\n").unwrap();
 * let tr = doc.apply(Cmd::InsertText { at: 8, text: "![logo](logo.png)\n".to_string() });
 * assert_eq!(tr.version, 1);
 * assert_eq!(doc.text(), "# Hello\n![logo](logo.png)\n");
 * ```
 */

pub mod commands;
pub mod document;
pub mod transaction;

pub use commands::Cmd;
pub use document::{Document, DocumentError};
pub use transaction::Transaction;
