//! Pipeline tests for outline assembly and section segmentation on synthetic
//! run sequences.

use pdfsift::outline::OutlineAssembler;
use pdfsift::rank::segment_sections;
use pdfsift::{HeadingLevel, TextRun};

fn run(text: &str, size: f32, bold: bool, page: u32, y: f32, order: u32) -> TextRun {
    TextRun {
        text: text.to_string(),
        font_size: size,
        is_bold: bold,
        page,
        y,
        order,
    }
}

/// A small two-page report: title, two H1s, one H2, body prose at 11pt.
fn report_runs() -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut order = 0;
    let mut push = |text: &str, size: f32, bold: bool, page: u32, y: f32| {
        runs.push(run(text, size, bold, page, y, order));
        order += 1;
    };

    push("Connected Library Services", 22.0, true, 1, 780.0);
    push("1. Introduction", 16.0, true, 1, 740.0);
    for i in 0..6 {
        push(
            "This report describes the proposal in plain prose and ends with a period.",
            11.0,
            false,
            1,
            700.0 - i as f32 * 14.0,
        );
    }
    push("1.1 Background", 13.0, true, 1, 600.0);
    for i in 0..5 {
        push(
            "Additional background material written as ordinary sentences follows here.",
            11.0,
            false,
            1,
            580.0 - i as f32 * 14.0,
        );
    }
    push("2. Evaluation", 16.0, true, 2, 760.0);
    for i in 0..5 {
        push(
            "The evaluation criteria are described with ordinary body prose below.",
            11.0,
            false,
            2,
            730.0 - i as f32 * 14.0,
        );
    }

    runs
}

#[test]
fn outline_levels_follow_font_tiers() {
    let runs = report_runs();
    let outline = OutlineAssembler::new().assemble(&runs, "fallback");

    assert_eq!(outline.title, "Connected Library Services");

    let entries: Vec<(HeadingLevel, &str, u32)> = outline
        .outline
        .iter()
        .map(|h| (h.level, h.text.as_str(), h.page))
        .collect();
    assert_eq!(
        entries,
        vec![
            (HeadingLevel::H1, "1. Introduction", 1),
            (HeadingLevel::H2, "1.1 Background", 1),
            (HeadingLevel::H1, "2. Evaluation", 2),
        ]
    );
}

#[test]
fn body_prose_never_becomes_headings() {
    // §-style example: "1. Introduction" at 18pt qualifies, capitalized 12pt
    // prose does not.
    let mut runs = vec![run("1. Introduction", 18.0, true, 1, 780.0, 0)];
    for i in 0..8 {
        runs.push(run(
            "The proposal describes a phased rollout across all branch libraries.",
            12.0,
            false,
            1,
            740.0 - i as f32 * 14.0,
            1 + i,
        ));
    }
    runs.push(run("Overview", 18.0, true, 1, 600.0, 9));

    let outline = OutlineAssembler::new().assemble(&runs, "doc");

    assert!(outline
        .outline
        .iter()
        .any(|h| h.text == "1. Introduction" && h.level == HeadingLevel::H1));
    assert!(outline
        .outline
        .iter()
        .all(|h| h.text == "Overview" || h.text == "1. Introduction"));
    assert!(outline.outline.iter().all(|h| h.level == HeadingLevel::H1));
}

#[test]
fn uniform_font_outline_uses_content_alone() {
    let mut runs = vec![run("Quarterly Checklist", 12.0, false, 1, 780.0, 0)];
    for i in 0..6 {
        runs.push(run(
            "Every item in this list is written as a full sentence for the reader.",
            12.0,
            false,
            1,
            740.0 - i as f32 * 14.0,
            1 + i,
        ));
    }
    runs.push(run("Appendix A: Resources", 12.0, false, 1, 620.0, 7));

    let outline = OutlineAssembler::new().assemble(&runs, "checklist");

    assert!(!outline.outline.is_empty());
    let distinct_levels: std::collections::HashSet<_> =
        outline.outline.iter().map(|h| h.level).collect();
    assert_eq!(distinct_levels.len(), 1);
}

#[test]
fn segmentation_partitions_the_document() {
    let runs = report_runs();
    let assembler = OutlineAssembler::new();
    let (outline, placed) = assembler.assemble_placed(&runs, "fallback");
    let sections = segment_sections("report.pdf", &outline.title, &runs, &placed);

    assert!(!sections.is_empty());

    // Coverage: every run order appears in exactly one [start, end) span
    let total = runs.len() as u32;
    let mut covered = vec![0u8; total as usize];
    for section in &sections {
        for order in section.start_order..section.end_order {
            covered[order as usize] += 1;
        }
    }
    assert!(
        covered.iter().all(|&c| c == 1),
        "coverage counts: {:?}",
        covered
    );

    // Sections inherit their opening heading
    assert!(sections.iter().any(|s| s.heading == "1. Introduction"));
    assert!(sections.iter().any(|s| s.heading == "2. Evaluation"));
}

#[test]
fn outline_is_deterministic_across_calls() {
    let runs = report_runs();
    let assembler = OutlineAssembler::new();

    let first = assembler.assemble(&runs, "fallback");
    for _ in 0..3 {
        let next = assembler.assemble(&runs, "fallback");
        assert_eq!(first.title, next.title);
        assert_eq!(first.outline, next.outline);
    }
}

#[test]
fn outline_serializes_to_contract_shape() {
    let runs = report_runs();
    let outline = OutlineAssembler::new().assemble(&runs, "fallback");
    let json = pdfsift::to_json(&outline, pdfsift::JsonFormat::Pretty).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed["title"].is_string());
    let entries = parsed["outline"].as_array().unwrap();
    assert!(!entries.is_empty());
    for entry in entries {
        assert!(matches!(
            entry["level"].as_str(),
            Some("H1") | Some("H2") | Some("H3")
        ));
        assert!(entry["text"].is_string());
        assert!(entry["page"].is_u64());
    }
}
