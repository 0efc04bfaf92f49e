use crate::decorations::matcher::{ImageNodeKind, match_image};
use crate::decorations::{DecorationEntry, ImageMark, ImageWidget};
use crate::syntax::{SyntaxTree, TextAccess};

/// Walk every node of `tree` and emit decorations for image references.
///
/// For each match the widget is anchored at the start of the line holding the
/// node's start, so the preview renders as its own block. The mark covers
/// whole lines, from that line start to the end of the line holding the
/// node's last byte (block nodes end after their line break). Matched nodes
/// are not pruned: nested references produce their own, possibly
/// overlapping, entries.
///
/// A raw HTML line that ends the buffer without a line break parses as a
/// paragraph holding a single inline `html_tag`. Such a tag is treated as a
/// markup block, so the preview does not depend on a trailing newline.
pub fn walk(
    tree: &(impl SyntaxTree + ?Sized),
    text: &(impl TextAccess + ?Sized),
) -> Vec<DecorationEntry> {
    let mut entries = Vec::new();
    let mut paragraph = None;

    tree.visit(&mut |node| {
        if node.kind == "paragraph" {
            paragraph = Some(node.byte_range());
        }

        let kind = match ImageNodeKind::from_node_kind(node.kind) {
            Some(kind) => kind,
            None if node.kind == "html_tag"
                && paragraph.as_ref().is_some_and(|range| {
                    range.start <= node.from
                        && node.to <= range.end
                        && text.slice(range.clone()).trim()
                            == text.slice(node.byte_range()).trim()
                }) =>
            {
                ImageNodeKind::MarkupBlock
            }
            None => return,
        };
        let source = text.slice(node.byte_range());
        let Some(result) = match_image(kind, &source) else {
            return;
        };

        let line_start = text.line_at(node.from).from;
        let last_byte = if node.to > node.from {
            node.to - 1
        } else {
            node.from
        };
        let line_end = text.line_at(last_byte).to;

        entries.push(DecorationEntry::widget(
            line_start,
            ImageWidget::new(result.url.as_str()),
        ));
        entries.push(DecorationEntry::mark(
            line_start..line_end.max(line_start),
            ImageMark::new(result.tooltip()),
        ));
    });

    log::trace!("walk produced {} decoration entries", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorations::Decoration;
    use crate::syntax::SyntaxNode;
    use pretty_assertions::assert_eq;
    use xi_rope::Rope;

    /// Hand-built tree: nodes are visited in the order given
    struct FakeTree(Vec<(&'static str, usize, usize)>);

    impl SyntaxTree for FakeTree {
        fn visit(&self, visitor: &mut dyn FnMut(SyntaxNode<'_>)) {
            for &(kind, from, to) in &self.0 {
                visitor(SyntaxNode::new(kind, from, to));
            }
        }
    }

    #[test]
    fn test_walk_inline_image_anchors_at_line_start() {
        let text = Rope::from("intro\nsee ![cat](cat.png) here\n");
        let tree = FakeTree(vec![("document", 0, 31), ("image", 10, 25)]);

        let entries = walk(&tree, &text);

        assert_eq!(
            entries,
            vec![
                DecorationEntry::widget(6, ImageWidget::new("cat.png")),
                DecorationEntry::mark(6..30, ImageMark::new("cat")),
            ]
        );
    }

    #[test]
    fn test_walk_multiline_markup_block_covers_all_lines() {
        let source = "<img\n  src=\"a.png\">\nafter\n";
        let text = Rope::from(source);
        let tree = FakeTree(vec![("html_block", 0, 19)]);

        let entries = walk(&tree, &text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].from, 0);
        assert_eq!(entries[1].to, 19);
        assert_eq!(entries[1].decoration, Decoration::Mark(ImageMark::new("a.png")));
    }

    #[test]
    fn test_walk_block_node_ending_after_newline_stays_on_its_line() {
        let text = Rope::from("<img src=\"a.png\">\nnext\n");
        let tree = FakeTree(vec![("html_block", 0, 18)]);

        let entries = walk(&tree, &text);
        assert_eq!(entries[1].from..entries[1].to, 0..17);
    }

    #[test]
    fn test_walk_skips_non_matching_and_unknown_nodes() {
        let text = Rope::from("![]()\nplain\n");
        let tree = FakeTree(vec![("image", 0, 5), ("paragraph", 6, 11)]);

        assert!(walk(&tree, &text).is_empty());
    }

    #[test]
    fn test_walk_does_not_prune_nested_matches() {
        let text = Rope::from("![a](a.png)\n");
        let tree = FakeTree(vec![("image", 0, 11), ("image", 0, 11)]);

        assert_eq!(walk(&tree, &text).len(), 4);
    }

    #[test]
    fn test_walk_lone_html_tag_in_paragraph_is_markup_block() {
        let text = Rope::from("<img src=\"a.png\" alt=\"c\">");
        let tree = FakeTree(vec![
            ("paragraph", 0, 25),
            ("inline", 0, 25),
            ("html_tag", 0, 25),
        ]);

        assert_eq!(
            walk(&tree, &text),
            vec![
                DecorationEntry::widget(0, ImageWidget::new("a.png")),
                DecorationEntry::mark(0..25, ImageMark::new("c")),
            ]
        );
    }

    #[test]
    fn test_walk_html_tag_among_other_inline_content_is_ignored() {
        let text = Rope::from("see <img src=\"a.png\"> here");
        let tree = FakeTree(vec![
            ("paragraph", 0, 26),
            ("inline", 0, 26),
            ("html_tag", 4, 21),
        ]);

        assert!(walk(&tree, &text).is_empty());
    }

    #[test]
    fn test_walk_html_tag_outside_last_paragraph_is_ignored() {
        let text = Rope::from("<img src=\"a.png\">\n\n<img src=\"b.png\">");
        let tree = FakeTree(vec![("paragraph", 0, 17), ("html_tag", 19, 36)]);

        assert!(walk(&tree, &text).is_empty());
    }

    #[test]
    fn test_walk_emits_widget_before_mark() {
        let text = Rope::from("![a](a.png)");
        let tree = FakeTree(vec![("image", 0, 11)]);

        let entries = walk(&tree, &text);
        assert!(entries[0].as_widget().is_some());
        assert!(entries[1].as_mark().is_some());
    }
}
