use html_escape::encode_double_quoted_attribute as attr;

use crate::decorations::Theme;

/// Block-level preview of an image, rendered beneath its source line.
///
/// Equality is keyed solely on the url. A host comparing the widget from a
/// fresh recomputation with the one it already rendered can keep the existing
/// block (and the loaded image) whenever they compare equal, even if the text
/// around the reference moved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageWidget {
    url: String,
}

impl ImageWidget {
    /// CSS class attached to the widget decoration
    pub const CLASS: &'static str = "image";

    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Widgets occupy their own block rather than flowing inline
    pub fn is_block(&self) -> bool {
        true
    }

    /// Placed after anything else anchored at the same offset
    pub fn side(&self) -> i8 {
        1
    }

    /// Events over the preview reach the editor
    pub fn ignore_event(&self) -> bool {
        false
    }

    /// Short textual form for hosts that cannot show images
    pub fn describe(&self) -> String {
        format!("[image] {}", self.url)
    }

    /// Render the preview block as HTML.
    ///
    /// The container is `aria-hidden`: the source text stays the accessible
    /// content and the preview is a visual adjunct.
    pub fn render_html(&self, theme: &Theme) -> String {
        format!(
            concat!(
                r#"<div class="cm-image-container" aria-hidden="true" style="padding-bottom: 0.5rem; padding-top: 0.5rem;">"#,
                r#"<div class="cm-image-backdrop" style="border-radius: {radius}; display: flex; overflow: hidden; max-width: 100%;">"#,
                r#"<figure class="cm-image-figure" style="margin: 0;">"#,
                r#"<img class="cm-image-img" src="{src}" style="display: block; max-height: {max_height}; max-width: 100%; width: 100%;">"#,
                r#"</figure></div></div>"#,
            ),
            radius = attr(&theme.border_radius),
            src = attr(&self.url),
            max_height = attr(&theme.block_max_height),
        )
    }
}
