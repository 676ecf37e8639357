use pdf_flow::demos::{boxed_text, sample_document, wrap};
use pdf_flow::{
    split_paragraphs, DocumentFlow, FlowError, FontChoice, LayoutConfig, Orientation,
    PageRenderer, Paragraph, RecordingRenderer, RenderOp,
};

fn recording_flow(config: LayoutConfig) -> DocumentFlow<RecordingRenderer> {
    DocumentFlow::new(RecordingRenderer::new(), config)
}

fn long_text(paragraphs: usize, lines: usize) -> String {
    (0..paragraphs)
        .map(|p| {
            (0..lines)
                .map(|l| format!("paragraph {p} line {l}"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[test]
fn sample_document_draws_rules_relative_to_the_cursor() {
    let mut flow = recording_flow(LayoutConfig::default());
    sample_document::build(&mut flow, None).unwrap();

    let lines: Vec<_> = flow
        .renderer()
        .ops()
        .iter()
        .filter_map(|op| match op {
            RenderOp::Line { from, to, thickness, .. } => Some((*from, *to, *thickness)),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 2);

    // title: 3 mm line + 4.5 mm spacing from the 10 mm top margin, rule 4.5 / 8 above
    let (from, to, thickness) = lines[0];
    assert!((from.y - (17.5 - 4.5 / 8.0)).abs() < 1e-9);
    assert_eq!(from.x, 10.0);
    assert_eq!(to.x, 200.0);
    assert_eq!(thickness, 1.0);
    assert_eq!(lines[1].2, 0.2);

    let texts = flow.renderer().texts();
    assert_eq!(texts[0].2, "Test Title");
    assert!(texts.iter().any(|(_, _, text)| *text == "Conclusion"));
    assert!(texts.iter().all(|(page, _, _)| *page == 1));
}

#[test]
fn appendix_starts_on_its_own_page_and_flows_on() {
    let appendix_text = long_text(20, 6);
    let mut flow = recording_flow(LayoutConfig::default());
    sample_document::build(
        &mut flow,
        Some(sample_document::Appendix {
            title: "Appendix A",
            text: &appendix_text,
        }),
    )
    .unwrap();

    let renderer = flow.renderer();
    let appendices = renderer
        .texts()
        .into_iter()
        .find(|(_, _, text)| *text == "Appendices")
        .unwrap();
    assert_eq!(appendices.0, 2);
    assert_eq!(appendices.1, 10.0);
    assert!(renderer.page_count() > 2);

    // every paragraph that opens a page starts on the top margin
    let mut previous_page = 0;
    for (page, y, text) in renderer.texts() {
        if page != previous_page && text.starts_with("paragraph") {
            assert_eq!(y, 10.0);
        }
        previous_page = page;
    }
}

#[test]
fn break_count_matches_paragraphs_that_overflow() {
    let text = long_text(15, 9);
    let paragraphs = split_paragraphs(&text);
    let mut flow = recording_flow(LayoutConfig::default());
    let style = flow.body_style(FontChoice::Courier);

    let mut overflowing = 0;
    let mut cursor = flow.page().cursor_y();
    for (index, paragraph) in paragraphs.iter().enumerate() {
        let required = style.line_height * paragraph.line_count() as f64;
        let available = 297.0 - 20.0 - cursor;
        if index != 0 && required > available {
            overflowing += 1;
            cursor = 10.0;
        }
        cursor += required + style.line_height;
    }

    let report = flow.write_paragraphs(&paragraphs, FontChoice::Courier).unwrap();
    assert_eq!(report.page_breaks(), overflowing);
    assert_eq!(flow.renderer().page_breaks(), overflowing);
    assert!(!report.placements[0].page_break_before);
}

#[test]
fn oversized_first_paragraph_overflows_instead_of_breaking() {
    let mut flow = recording_flow(LayoutConfig::default());
    let huge = Paragraph::new(long_text(1, 100));
    let report = flow
        .write_paragraphs(&[huge, Paragraph::new("after")], FontChoice::Arial)
        .unwrap();

    assert!(!report.placements[0].page_break_before);
    assert!(report.placements[0].rendered_height > 297.0);
    // the follow-up paragraph sees negative space and moves to page 2
    assert!(report.placements[1].page_break_before);
    assert_eq!(report.page_breaks(), 1);
}

#[test]
fn explicit_page_breaks_use_the_configured_orientation() {
    let config = LayoutConfig::default().with_orientation(Orientation::Landscape);
    let mut flow = recording_flow(config);
    assert_eq!(flow.page().width(), 297.0);
    flow.add_page().unwrap();
    assert_eq!(
        flow.renderer().ops().last(),
        Some(&RenderOp::NewPage {
            orientation: Orientation::Landscape
        })
    );
    assert_eq!(flow.page().number(), 2);
}

#[test]
fn images_keep_aspect_ratio_and_break_when_they_do_not_fit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.png");
    image::RgbImage::new(40, 20).save(&path).unwrap();

    let mut flow = recording_flow(LayoutConfig::default());
    let height = flow.place_image(&path, Some(100.0)).unwrap();
    assert!((height - 50.0).abs() < 1e-9);
    assert!((flow.page().cursor_y() - 60.0).abs() < 1e-9);

    flow.write_paragraph(&long_text(1, 40), false, FontChoice::Arial)
        .unwrap();
    flow.place_image(&path, None).unwrap();

    match flow.renderer().ops().last() {
        Some(RenderOp::Image { page, frame, height, .. }) => {
            assert_eq!(*page, 2);
            assert_eq!(frame.y, 10.0);
            assert_eq!(frame.width, 190.0);
            assert!((height - 95.0).abs() < 1e-9);
        }
        other => panic!("expected an image, got {other:?}"),
    }
}

#[test]
fn missing_image_is_reported_with_its_path() {
    let mut flow = recording_flow(LayoutConfig::default());
    let err = flow
        .place_image("/__pdf_flow_missing__/nothing.png", None)
        .unwrap_err();
    match err {
        FlowError::Image { path, .. } => assert!(path.ends_with("nothing.png")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsupported_format_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("wrapped.pdf");
    std::fs::write(&input, "one\n\ntwo").unwrap();

    let result = LayoutConfig::new()
        .with_page_format_str("A3")
        .and_then(|config| wrap::run(&input, &output, config));

    assert!(matches!(result, Err(FlowError::UnsupportedPageFormat(ref f)) if f == "A3"));
    assert!(!output.exists());
}

#[test]
fn missing_input_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("wrapped.pdf");

    let result = wrap::run(
        &dir.path().join("does-not-exist.txt"),
        &output,
        LayoutConfig::default(),
    );

    assert!(matches!(result, Err(FlowError::Io(_))));
    assert!(!output.exists());
}

#[test]
fn wrap_build_flows_every_paragraph() {
    let text = long_text(8, 12);
    let mut flow = recording_flow(LayoutConfig::default().with_font(FontChoice::Courier));
    let report = wrap::build(&mut flow, &text).unwrap();
    assert_eq!(report.placements.len(), 8);
    assert!(report.page_breaks() >= 1);

    let mut listing = Vec::new();
    flow.output(&mut listing).unwrap();
    let listing = String::from_utf8(listing).unwrap();
    assert!(listing.contains("new page portrait"));
    assert!(listing.contains("paragraph 7 line 11"));
}

#[test]
fn boxed_text_is_drawn_from_the_page_corner() {
    let mut renderer = RecordingRenderer::new();
    let height = boxed_text::draw(&mut renderer, 148.0).unwrap();
    assert!((height - 6.0 * 4.5).abs() < 1e-9);
    match &renderer.ops()[0] {
        RenderOp::Text { frame, content, .. } => {
            assert_eq!((frame.x, frame.y), (0.0, 0.0));
            assert!(content.starts_with('┌'));
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn builder_operations_break_instead_of_running_off_the_page() {
    let mut flow = recording_flow(LayoutConfig::default());
    flow.write_paragraphs(&split_paragraphs(&long_text(5, 10)), FontChoice::Arial)
        .unwrap();
    assert!((flow.page().cursor_y() - 257.5).abs() < 1e-9);
    assert_eq!(flow.page().number(), 1);

    flow.write_paragraph(&long_text(1, 20), false, FontChoice::Arial)
        .unwrap();
    assert_eq!(flow.page().number(), 2);

    flow.write_paragraph(&long_text(1, 38), true, FontChoice::Arial)
        .unwrap();
    flow.write_section_title("Next section").unwrap();
    assert_eq!(flow.page().number(), 3);

    let bottom = 297.0 - 10.0;
    for op in flow.renderer().ops() {
        if let RenderOp::Text { frame, height, .. } = op {
            assert!(
                frame.y == 10.0 || frame.y + height <= bottom + 1e-9,
                "text at y={} with height {} runs past the bottom margin",
                frame.y,
                height
            );
        }
    }
    let section = flow
        .renderer()
        .texts()
        .into_iter()
        .find(|(_, _, text)| *text == "Next section")
        .unwrap();
    assert_eq!((section.0, section.1), (3, 10.0));
}

#[test]
fn rules_move_to_the_next_page_when_the_page_is_full() {
    let mut flow = recording_flow(LayoutConfig::default());
    flow.write_paragraph(&long_text(1, 59), false, FontChoice::Arial)
        .unwrap();
    flow.hr(1.0).unwrap();
    flow.write_paragraph(&long_text(1, 58), false, FontChoice::Arial)
        .unwrap();
    flow.sub_hr(0.5).unwrap();

    let rules: Vec<(usize, f64)> = flow
        .renderer()
        .ops()
        .iter()
        .filter_map(|op| match op {
            RenderOp::Line { page, from, .. } => Some((*page, from.y)),
            _ => None,
        })
        .collect();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].0, 2);
    assert!((rules[0].1 - (10.0 - 4.5 / 8.0)).abs() < 1e-9);
    assert_eq!(rules[1].0, 3);
    assert!((rules[1].1 - 14.5).abs() < 1e-9);
}

#[test]
fn crlf_input_splits_into_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("windows.txt");
    std::fs::write(&input, "first\r\nparagraph\r\n\r\nsecond\r\n\r\nthird\r\n").unwrap();

    let text = wrap::read_input(&input).unwrap();
    assert_eq!(text, "first\nparagraph\n\nsecond\n\nthird\n");

    let mut flow = recording_flow(LayoutConfig::default());
    let report = wrap::build(&mut flow, &text).unwrap();
    assert_eq!(report.placements.len(), 3);
    assert!((report.placements[0].required_height - 9.0).abs() < 1e-9);
}
