use std::ops::Range;

/// Result of applying a command: one atomic edit or selection change
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Byte ranges of inserted text, in new-document offsets
    pub changed: Vec<Range<usize>>,
    pub new_selection: Range<usize>,
    pub version: u64,
    /// False for selection-only transactions
    pub doc_changed: bool,
}
