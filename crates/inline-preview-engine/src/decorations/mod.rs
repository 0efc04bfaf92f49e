/*!
 * # Image Preview Decorations
 *
 * Overlays rendered image previews on a markdown buffer without touching its text.
 *
 * ## Pipeline
 *
 * buffer + syntax tree → [`walker::walk`] → [`matcher`] → [`ImageWidget`] / [`ImageMark`]
 * → [`DecorationSet::build`] → [`ImagePreviewField`] → host rendering pass
 *
 * - **`matcher`**: extracts `(url, alt)` from `![alt](url)` and `<img src alt>` text
 * - **`widget`**: block-level preview, equal whenever urls are equal
 * - **`mark`**: inline class + tooltip over the reference's lines
 * - **`walker`**: single full-tree pass emitting widget then mark per match
 * - **`set`**: ordered immutable collection, empty sentinel via [`DecorationSet::none`]
 * - **`field`**: per-editor state, recomputed in full on every transaction
 *
 * Nothing in this module returns an error. A reference that cannot be
 * understood contributes no decorations.
 */

pub mod field;
pub mod mark;
pub mod matcher;
pub mod set;
pub mod theme;
pub mod walker;
pub mod widget;

pub use field::{FieldState, ImagePreviewField, decorate};
pub use mark::ImageMark;
pub use matcher::{ImageNodeKind, MatchResult, match_node};
pub use set::{Decoration, DecorationEntry, DecorationSet};
pub use theme::Theme;
pub use widget::ImageWidget;

use crate::editing::Transaction;
use crate::syntax::{SyntaxTree, TextAccess};

/// Hook the host's rendering pass reads decorations from
pub trait DecorationSource {
    fn decorations(&self) -> &DecorationSet;
}

/// Editor extension bundling the preview field with its theme
#[derive(Debug, Default)]
pub struct ImagePreviews {
    theme: Theme,
    field: ImagePreviewField,
}

impl ImagePreviews {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            field: ImagePreviewField::new(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn field(&self) -> &ImagePreviewField {
        &self.field
    }

    pub fn attach<S>(&mut self, state: &S)
    where
        S: SyntaxTree + TextAccess + ?Sized,
    {
        self.field.attach(state);
    }

    pub fn update<S>(&mut self, state: &S, transaction: &Transaction)
    where
        S: SyntaxTree + TextAccess + ?Sized,
    {
        self.field.update(state, transaction);
    }

    /// Stylesheet the host installs once
    pub fn base_theme_css(&self) -> String {
        self.theme.base_css()
    }

    pub fn render_widget(&self, widget: &ImageWidget) -> String {
        widget.render_html(&self.theme)
    }
}

impl DecorationSource for ImagePreviews {
    fn decorations(&self) -> &DecorationSet {
        self.field.decorations()
    }
}

impl DecorationSource for ImagePreviewField {
    fn decorations(&self) -> &DecorationSet {
        ImagePreviewField::decorations(self)
    }
}
