use regex::Regex;
use std::sync::OnceLock;

/// Syntax node kinds that can carry an image reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageNodeKind {
    /// Markdown `![alt](url)`, tree-sitter-md inline node `image`
    InlineImage,
    /// Raw HTML block holding an `<img>` tag, tree-sitter-md block node `html_block`
    MarkupBlock,
}

impl ImageNodeKind {
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "image" => Some(Self::InlineImage),
            "html_block" => Some(Self::MarkupBlock),
            _ => None,
        }
    }
}

/// Image reference extracted from a node's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Never empty
    pub url: String,
    /// `None` when the reference has no alt text or an empty one
    pub alt: Option<String>,
}

impl MatchResult {
    /// Hover text for the reference: the alt text, else the url
    pub fn tooltip(&self) -> &str {
        self.alt.as_deref().unwrap_or(&self.url)
    }
}

/// Extract an image reference from a node of the given kind.
///
/// Unknown kinds, unrecognized text and references without a url all yield
/// `None`. Only the first reference in `text` is considered.
pub fn match_node(kind: &str, text: &str) -> Option<MatchResult> {
    ImageNodeKind::from_node_kind(kind).and_then(|kind| match_image(kind, text))
}

pub fn match_image(kind: ImageNodeKind, text: &str) -> Option<MatchResult> {
    match kind {
        ImageNodeKind::InlineImage => match_inline_image(text),
        ImageNodeKind::MarkupBlock => match_img_tag(text),
    }
}

fn match_inline_image(text: &str) -> Option<MatchResult> {
    static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
    let image_regex = IMAGE_REGEX.get_or_init(|| {
        Regex::new(r"!\[(?<alt>.*?)\]\((?<url>.*?)\)").expect("Invalid image regex")
    });

    let captures = image_regex.captures(text)?;
    build_result(
        captures.name("url").map(|m| m.as_str().to_string()),
        captures.name("alt").map(|m| m.as_str().to_string()),
    )
}

fn match_img_tag(text: &str) -> Option<MatchResult> {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    let tag_regex = TAG_REGEX.get_or_init(|| {
        Regex::new(r#"(?is)<img\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("Invalid tag regex")
    });
    // One attribute per match, scanned left to right so quoted values are consumed whole
    let attr_regex = ATTR_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?s)(?<name>[^\s"'>/=]+)(?:\s*=\s*(?:"(?<dq>[^"]*)"|'(?<sq>[^']*)'|(?<uq>[^\s"'=<>`]+)))?"#,
        )
        .expect("Invalid attribute regex")
    });

    let tag = tag_regex.find(text)?.as_str();
    // Strip `<img` and the closing `>`
    let attributes = &tag[4..tag.len() - 1];

    let mut src = None;
    let mut alt = None;
    for captures in attr_regex.captures_iter(attributes) {
        let name = &captures["name"];
        let slot = if name.eq_ignore_ascii_case("src") {
            &mut src
        } else if name.eq_ignore_ascii_case("alt") {
            &mut alt
        } else {
            continue;
        };
        let Some(value) = captures
            .name("dq")
            .or_else(|| captures.name("sq"))
            .or_else(|| captures.name("uq"))
        else {
            continue;
        };
        // First occurrence wins
        if slot.is_none() {
            *slot = Some(html_escape::decode_html_entities(value.as_str()).into_owned());
        }
    }

    let result = build_result(src, alt);
    if let Some(result) = &result {
        log::debug!("matched <img> tag: {result:?}");
    }
    result
}

fn build_result(url: Option<String>, alt: Option<String>) -> Option<MatchResult> {
    let url = url.filter(|url| !url.is_empty())?;
    Some(MatchResult {
        url,
        alt: alt.filter(|alt| !alt.is_empty()),
    })
}
