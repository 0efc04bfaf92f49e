use inline_preview_engine::{
    Cmd, Decoration, DecorationEntry, DecorationSet, DecorationSource, Document, Editor,
    ImageMark, ImageWidget, Theme, decorate,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn decorations_for(text: &str) -> DecorationSet {
    let doc = Document::from_bytes(text.as_bytes()).expect("valid document");
    decorate(&doc)
}

fn entries(set: &DecorationSet) -> Vec<DecorationEntry> {
    set.iter().cloned().collect()
}

#[test]
fn scenario_a_inline_image_with_alt() {
    let set = decorations_for("![A photo](http://x/img.png)\n");

    assert_eq!(
        entries(&set),
        vec![
            DecorationEntry::widget(0, ImageWidget::new("http://x/img.png")),
            DecorationEntry::mark(0..28, ImageMark::new("A photo")),
        ]
    );
}

#[test]
fn scenario_b_empty_alt_falls_back_to_url() {
    let set = decorations_for("![](http://x/img.png)\n");

    let (_, mark) = set.marks().next().expect("one mark");
    assert_eq!(mark.tooltip(), "http://x/img.png");
}

#[test]
fn scenario_c_img_tag_in_html_block() {
    let set = decorations_for("<img src=\"http://x/img.png\" alt=\"cat\">\n");

    let widgets: Vec<_> = set.widgets().collect();
    let marks: Vec<_> = set.marks().map(|(_, mark)| mark.tooltip().to_string()).collect();
    assert_eq!(widgets, vec![(0, &ImageWidget::new("http://x/img.png"))]);
    assert_eq!(marks, vec!["cat".to_string()]);
}

#[rstest]
#[case("<img src=\"http://x/img.png\" alt=\"cat\">", 0)]
#[case("text\n\n<img src=\"http://x/img.png\" alt=\"cat\">", 6)]
fn scenario_c_img_tag_without_trailing_newline(#[case] text: &str, #[case] anchor: usize) {
    let set = decorations_for(text);

    let widgets: Vec<_> = set.widgets().collect();
    let marks: Vec<_> = set.marks().map(|(span, mark)| (span, mark.tooltip().to_string())).collect();
    assert_eq!(widgets, vec![(anchor, &ImageWidget::new("http://x/img.png"))]);
    assert_eq!(marks, vec![(anchor..text.len(), "cat".to_string())]);
}

#[test]
fn img_tag_inside_paragraph_text_gets_no_preview() {
    let set = decorations_for("see <img src=\"a.png\"> here");
    assert!(set.is_empty());
}

#[test]
fn image_in_table_cell() {
    let set = decorations_for("| a | b |\n|---|---|\n| ![cat](cat.png) | x |\n");

    assert_eq!(
        entries(&set),
        vec![
            DecorationEntry::widget(20, ImageWidget::new("cat.png")),
            DecorationEntry::mark(20..43, ImageMark::new("cat")),
        ]
    );
}

#[test]
fn typing_img_tag_at_end_of_buffer_creates_a_preview() {
    let mut editor = Editor::from_bytes(b"intro\n\n", Theme::default()).unwrap();

    editor.dispatch(Cmd::InsertText {
        at: 7,
        text: "<img src=\"a.png\">".to_string(),
    });

    let widgets: Vec<_> = editor.decorations().widgets().collect();
    assert_eq!(widgets, vec![(7, &ImageWidget::new("a.png"))]);
}

#[test]
fn scenario_d_no_images_is_empty_sentinel() {
    let set = decorations_for("# Heading\n\nJust words and a [link](http://x).\n");
    assert_eq!(set, DecorationSet::none());
}

#[test]
fn scenario_e_deleting_reference_clears_decorations() {
    let mut editor =
        Editor::from_bytes(b"![A photo](http://x/img.png)\n", Theme::default()).unwrap();
    assert_eq!(editor.decorations().len(), 2);

    editor.dispatch(Cmd::DeleteRange { range: 0..28 });

    assert!(editor.decorations().is_empty());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(7)]
fn n_table_images_yield_2n_entries(#[case] n: usize) {
    let mut text = String::from("| image | note |\n|---|---|\n");
    for i in 0..n {
        text.push_str(&format!("| ![img {i}](http://x/{i}.png) | row {i} |\n"));
    }
    let set = decorations_for(&text);

    assert_eq!(set.len(), 2 * n);
    assert_eq!(set.widgets().count(), n);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(7)]
fn n_images_yield_2n_entries(#[case] n: usize) {
    let text: String = (0..n)
        .map(|i| format!("Paragraph {i}\n\n![img {i}](http://x/{i}.png)\n\n"))
        .collect();
    let set = decorations_for(&text);

    assert_eq!(set.len(), 2 * n);
    assert_eq!(set.widgets().count(), n);
    assert_eq!(set.marks().count(), n);
}

#[test]
fn entries_are_ordered_by_anchor() {
    let set = decorations_for(
        "![one](1.png)\n\ntext\n\n<img src=\"2.png\">\n\nmore ![three](3.png)\n",
    );

    let froms: Vec<usize> = set.iter().map(|entry| entry.from).collect();
    assert!(froms.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(set.widgets().count(), 3);
}

#[test]
fn widget_precedes_mark_for_each_reference() {
    let set = decorations_for("![a](a.png)\n\n![b](b.png)\n");

    let kinds: Vec<&str> = set
        .iter()
        .map(|entry| match entry.decoration {
            Decoration::Widget(_) => "widget",
            Decoration::Mark(_) => "mark",
        })
        .collect();
    assert_eq!(kinds, vec!["widget", "mark", "widget", "mark"]);
}

#[test]
fn recomputation_is_idempotent() {
    let doc = Document::from_bytes(b"intro\n\n![a](a.png)\n\n<img src=\"b.png\" alt=\"b\">\n")
        .unwrap();

    assert_eq!(decorate(&doc), decorate(&doc));
}

#[test]
fn image_mid_line_anchors_widget_at_line_start() {
    let set = decorations_for("before\nsome text ![x](x.png) after\n");

    let (anchor, _) = set.widgets().next().unwrap();
    let (span, _) = set.marks().next().unwrap();
    assert_eq!(anchor, 7);
    assert_eq!(span, 7..34);
}

#[test]
fn typing_an_image_reference_creates_a_preview() {
    let mut editor = Editor::from_bytes(b"", Theme::default()).unwrap();

    let mut at = 0;
    for ch in "![cat](cat.png)".chars() {
        editor.dispatch(Cmd::InsertText {
            at,
            text: ch.to_string(),
        });
        at += ch.len_utf8();
    }

    let widgets: Vec<_> = editor.decorations().widgets().collect();
    assert_eq!(widgets, vec![(0, &ImageWidget::new("cat.png"))]);
}

#[test]
fn widget_for_unchanged_url_survives_unrelated_edits() {
    let mut editor = Editor::from_bytes(b"![a](a.png)\n", Theme::default()).unwrap();
    let before = editor.decorations().widgets().next().unwrap().1.clone();

    editor.dispatch(Cmd::InsertText {
        at: 0,
        text: "Title\n\n".to_string(),
    });

    let (anchor, after) = editor.decorations().widgets().next().unwrap();
    assert_eq!(anchor, 7);
    assert_eq!(after, &before);
}

#[test]
fn rendered_preview_markup() {
    let editor = Editor::from_bytes(b"![a](a.png)\n", Theme::default()).unwrap();
    let (_, widget) = editor.decorations().widgets().next().unwrap();

    insta::assert_snapshot!(editor.previews().render_widget(widget), @r#"<div class="cm-image-container" aria-hidden="true" style="padding-bottom: 0.5rem; padding-top: 0.5rem;"><div class="cm-image-backdrop" style="border-radius: var(--ink-internal-all-border-radius); display: flex; overflow: hidden; max-width: 100%;"><figure class="cm-image-figure" style="margin: 0;"><img class="cm-image-img" src="a.png" style="display: block; max-height: var(--ink-internal-block-max-height); max-width: 100%; width: 100%;"></figure></div></div>"#);
}
