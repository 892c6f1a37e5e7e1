//! Section segmentation at heading boundaries.

use crate::model::{HeadingLevel, Section, TextRun};
use crate::outline::PlacedHeading;

/// Cut a document's run sequence into contiguous sections.
///
/// Every heading opens a section that runs to the next heading or document
/// end; a coarser heading therefore closes any finer section still open. Runs
/// before the first heading form a leading section under the document title,
/// and a document with no headings at all becomes one title-level section.
/// The resulting `[start_order, end_order)` spans partition the run sequence
/// with no gaps or overlaps.
pub fn segment_sections(
    document: &str,
    title: &str,
    runs: &[TextRun],
    headings: &[PlacedHeading],
) -> Vec<Section> {
    if runs.is_empty() {
        return Vec::new();
    }

    let doc_start = runs.first().map(|r| r.order).unwrap_or(0);
    let doc_end = runs.last().map(|r| r.order + 1).unwrap_or(0);
    let mut sections = Vec::new();

    let first_heading = headings.first().map(|h| h.order).unwrap_or(doc_end);

    // Preamble (or the whole document when no headings were detected)
    if first_heading > doc_start {
        let body = body_text(runs, doc_start, first_heading);
        sections.push(Section {
            document: document.to_string(),
            heading: title.to_string(),
            level: HeadingLevel::Title,
            page: runs.first().map(|r| r.page).unwrap_or(1),
            body,
            start_order: doc_start,
            end_order: first_heading,
        });
    }

    for (i, placed) in headings.iter().enumerate() {
        let end = headings
            .get(i + 1)
            .map(|next| next.order)
            .unwrap_or(doc_end);

        let body = body_text(runs, placed.end_order, end);
        sections.push(Section {
            document: document.to_string(),
            heading: placed.heading.text.clone(),
            level: placed.heading.level,
            page: placed.heading.page,
            body,
            start_order: placed.order,
            end_order: end,
        });
    }

    sections
}

/// Join the text of runs in `[start, end)`.
fn body_text(runs: &[TextRun], start: u32, end: u32) -> String {
    let parts: Vec<&str> = runs
        .iter()
        .filter(|r| r.order >= start && r.order < end)
        .map(|r| r.text.as_str())
        .collect();
    parts.join(" ").trim().to_string()
}
