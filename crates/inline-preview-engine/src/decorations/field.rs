use crate::decorations::{DecorationSet, walker};
use crate::editing::Transaction;
use crate::syntax::{SyntaxTree, TextAccess};

static NO_DECORATIONS: DecorationSet = DecorationSet::none();

/// Compute the decorations for a buffer from scratch
pub fn decorate<S>(state: &S) -> DecorationSet
where
    S: SyntaxTree + TextAccess + ?Sized,
{
    DecorationSet::build(walker::walk(state, state))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldState {
    #[default]
    Uninitialized,
    Attached(DecorationSet),
}

/// Per-editor holder of the current image decorations.
///
/// Every transaction replaces the set with a full recomputation over the new
/// state, selection-only transactions included. Mapping the old set through
/// the edit is not attempted: it left decorations outside the visible region
/// stale.
#[derive(Debug, Default)]
pub struct ImagePreviewField {
    state: FieldState,
}

impl ImagePreviewField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, FieldState::Attached(_))
    }

    /// Compute the initial set for a freshly attached editor
    pub fn attach<S>(&mut self, state: &S)
    where
        S: SyntaxTree + TextAccess + ?Sized,
    {
        let decorations = decorate(state);
        log::debug!("attached with {} decorations", decorations.len());
        self.state = FieldState::Attached(decorations);
    }

    /// Replace the set after a transaction. An unattached field attaches.
    pub fn update<S>(&mut self, state: &S, transaction: &Transaction)
    where
        S: SyntaxTree + TextAccess + ?Sized,
    {
        let decorations = decorate(state);
        log::trace!(
            "recomputed {} decorations for version {} (doc_changed: {})",
            decorations.len(),
            transaction.version,
            transaction.doc_changed
        );
        self.state = FieldState::Attached(decorations);
    }

    /// Current decorations; empty until attached
    pub fn decorations(&self) -> &DecorationSet {
        match &self.state {
            FieldState::Attached(decorations) => decorations,
            FieldState::Uninitialized => &NO_DECORATIONS,
        }
    }
}
