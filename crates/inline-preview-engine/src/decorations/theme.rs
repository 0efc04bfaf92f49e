/// Style tokens supplied by the host surface.
///
/// Values are opaque CSS values (`"20rem"`, `"var(--radius)"`, `"#222"`)
/// and are passed through to rendered output unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub block_max_height: String,
    pub border_radius: String,
    pub background_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            block_max_height: "var(--ink-internal-block-max-height)".to_string(),
            border_radius: "var(--ink-internal-all-border-radius)".to_string(),
            background_color: "var(--ink-internal-block-background-color)".to_string(),
        }
    }
}

impl Theme {
    /// Base stylesheet for preview blocks
    pub fn base_css(&self) -> String {
        format!(
            ".cm-image-backdrop {{ background-color: {}; }}\n",
            self.background_color
        )
    }
}
