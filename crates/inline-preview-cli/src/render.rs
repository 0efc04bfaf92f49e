//! Turns an editor's buffer and decorations into terminal rows and
//! the plain-text outputs of `--list` and `--html`.

use inline_preview_engine::{Decoration, DecorationSource, Editor, Line, TextAccess};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    /// A buffer line, `marked` when an image mark covers it
    Source { marked: bool },
    /// Stand-in for a block preview widget
    Preview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub text: String,
    /// Buffer line this row shows, `None` for previews
    pub source: Option<Line>,
}

fn buffer_lines(editor: &Editor) -> Vec<Line> {
    let doc = editor.document();
    let text = doc.text();
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(at, _)| at + 1))
        .map(|start| doc.line_at(start))
        .collect()
}

/// Source rows in buffer order. Each widget's preview row follows the line
/// its anchor sits on, since previews are placed below their line.
pub fn display_rows(editor: &Editor) -> Vec<Row> {
    let doc = editor.document();
    let decorations = editor.decorations();
    let mut rows = Vec::new();

    for line in buffer_lines(editor) {
        let marked = decorations
            .marks()
            .any(|(span, _)| span.start <= line.to && span.end >= line.from);
        rows.push(Row {
            kind: RowKind::Source { marked },
            text: doc.slice(line.from..line.to).into_owned(),
            source: Some(line),
        });

        for (_, widget) in decorations
            .widgets()
            .filter(|(anchor, _)| *anchor == line.from)
        {
            rows.push(Row {
                kind: RowKind::Preview,
                text: widget.describe(),
                source: None,
            });
        }
    }

    rows
}

/// One line per decoration: `from..to kind detail`
pub fn decoration_listing(editor: &Editor) -> String {
    let mut out = String::new();
    for entry in editor.decorations() {
        let _ = match &entry.decoration {
            Decoration::Widget(widget) => {
                writeln!(out, "{}..{} widget {}", entry.from, entry.to, widget.url())
            }
            Decoration::Mark(mark) => {
                writeln!(out, "{}..{} mark {}", entry.from, entry.to, mark.tooltip())
            }
        };
    }
    out
}

/// Standalone page: the base stylesheet, every buffer line as a `cm-line`
/// (marked lines carry the mark's attributes) and the rendered previews.
pub fn html_preview(editor: &Editor) -> String {
    let previews = editor.previews();
    let decorations = editor.decorations();
    let doc = editor.document();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<style>\n{}</style>\n</head>\n<body>",
        previews.base_theme_css()
    );

    for line in buffer_lines(editor) {
        let text = doc.slice(line.from..line.to);
        let escaped = html_escape::encode_text(&text);
        let mark = decorations
            .marks()
            .find(|(span, _)| span.start <= line.to && span.end >= line.from)
            .map(|(_, mark)| mark);

        match mark {
            Some(mark) => {
                let attrs: String = mark
                    .attributes()
                    .iter()
                    .map(|(name, value)| {
                        format!(
                            " {name}=\"{}\"",
                            html_escape::encode_double_quoted_attribute(value)
                        )
                    })
                    .collect();
                let _ = writeln!(
                    out,
                    "<div class=\"cm-line\"><span{attrs}>{escaped}</span></div>"
                );
            }
            None => {
                let _ = writeln!(out, "<div class=\"cm-line\">{escaped}</div>");
            }
        }

        for (_, widget) in decorations
            .widgets()
            .filter(|(anchor, _)| *anchor == line.from)
        {
            let _ = writeln!(out, "{}", previews.render_widget(widget));
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use inline_preview_engine::Theme;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn editor(text: &str) -> Editor {
        Editor::from_bytes(text.as_bytes(), Theme::default()).unwrap()
    }

    #[rstest]
    #[case("", 1)]
    #[case("one", 1)]
    #[case("one\n", 2)]
    #[case("one\ntwo\nthree", 3)]
    #[case("\n\n", 3)]
    #[case("one\r\ntwo\r\n", 3)]
    fn buffer_lines_cover_every_line(#[case] text: &str, #[case] expected: usize) {
        let ed = editor(text);
        let lines = buffer_lines(&ed);
        assert_eq!(lines.len(), expected);
        assert_eq!(lines.len(), ed.document().line_count());
    }

    #[test]
    fn preview_row_follows_anchored_line() {
        let ed = editor("intro\n\n![cat](cat.png)\n");
        let rows = display_rows(&ed);

        let kinds: Vec<_> = rows.iter().map(|row| row.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::Source { marked: false },
                RowKind::Source { marked: false },
                RowKind::Source { marked: true },
                RowKind::Preview,
                RowKind::Source { marked: false },
            ]
        );
        assert_eq!(rows[2].text, "![cat](cat.png)");
        assert_eq!(rows[3].text, "[image] cat.png");
        assert_eq!(rows[3].source, None);
    }

    #[test]
    fn listing_names_widget_then_mark() {
        let ed = editor("![A photo](http://x/img.png)\n");

        assert_eq!(
            decoration_listing(&ed),
            "0..0 widget http://x/img.png\n0..28 mark A photo\n"
        );
    }

    #[test]
    fn listing_is_empty_without_images() {
        assert_eq!(decoration_listing(&editor("just text\n")), "");
    }

    #[test]
    fn html_preview_escapes_source_and_includes_widget() {
        let ed = editor("a < b\n\n![x](x.png)\n");
        let html = html_preview(&ed);

        assert!(html.contains(".cm-image-backdrop"));
        assert!(html.contains("<div class=\"cm-line\">a &lt; b</div>"));
        assert!(html.contains("<span class=\"cm-image\" title=\"x\">![x](x.png)</span>"));
        assert!(html.contains("src=\"x.png\""));
    }
}
