/// Inline annotation over the source text of an image reference.
/// Styles the span and exposes the alt text (or url) as a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageMark {
    tooltip: String,
}

impl ImageMark {
    pub const CLASS: &'static str = "cm-image";

    pub fn new(tooltip: impl Into<String>) -> Self {
        Self {
            tooltip: tooltip.into(),
        }
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Attributes for the marked span
    pub fn attributes(&self) -> [(&'static str, &str); 2] {
        [("class", Self::CLASS), ("title", &self.tooltip)]
    }
}
