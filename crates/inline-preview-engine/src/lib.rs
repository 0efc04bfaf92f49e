pub mod decorations;
pub mod editing;
pub mod editor;
pub mod syntax;

// Re-export key types for easier usage
pub use decorations::*;
pub use editing::{Cmd, Document, DocumentError, Transaction};
pub use editor::Editor;
pub use syntax::{Line, SyntaxNode, SyntaxTree, TextAccess};
