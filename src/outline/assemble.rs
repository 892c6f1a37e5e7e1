//! Outline assembly: fuse font ranks and content scores into a final outline.

use crate::model::{group_runs_into_lines, Heading, HeadingLevel, Outline, TextLine, TextRun};

use super::classify::{ClassifierConfig, HeadingClassifier};
use super::fonts::{FontClusterAnalyzer, FontHierarchy};

/// Maximum heading rank that maps onto an outline level (0..=2 -> H1..H3).
const MAX_LEVEL_RANK: usize = 2;

/// A heading together with the run span it occupies.
///
/// `order` is the first run of the heading line(s); `end_order` is one past
/// the last. The section segmenter cuts the document at these positions.
#[derive(Debug, Clone)]
pub struct PlacedHeading {
    pub heading: Heading,
    pub order: u32,
    pub end_order: u32,
}

/// Assembles a document outline from collected text runs.
///
/// The assembler is deterministic: an identical run sequence always yields an
/// identical outline.
#[derive(Debug, Clone, Default)]
pub struct OutlineAssembler {
    classifier: HeadingClassifier,
    analyzer: FontClusterAnalyzer,
}

impl OutlineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier_config(mut self, config: ClassifierConfig) -> Self {
        self.classifier = HeadingClassifier::new(config);
        self
    }

    pub fn with_font_analyzer(mut self, analyzer: FontClusterAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Assemble the outline for one document.
    ///
    /// `fallback_title` (metadata title or file stem) is used when no page-1
    /// line carries the top-ranked font.
    pub fn assemble(&self, runs: &[TextRun], fallback_title: &str) -> Outline {
        self.assemble_placed(runs, fallback_title).0
    }

    /// Assemble the outline and keep each heading's run span for segmentation.
    pub fn assemble_placed(
        &self,
        runs: &[TextRun],
        fallback_title: &str,
    ) -> (Outline, Vec<PlacedHeading>) {
        let lines = group_runs_into_lines(runs);
        if lines.is_empty() {
            return (Outline::new(fallback_title), Vec::new());
        }

        let sizes: Vec<f32> = runs.iter().map(|r| r.font_size).collect();
        let hierarchy = self.analyzer.hierarchy(&sizes);

        let (title, title_line) = self.select_title(&lines, &hierarchy, fallback_title);

        // A font-derived title owns the whole top cluster, so the next
        // cluster down is the real H1 tier.
        let rank_offset = usize::from(title_line.is_some());
        let title_order = title_line.map(|idx| lines[idx].order);

        let mut placed: Vec<PlacedHeading> = Vec::new();
        let mut merging = false;
        let mut seen: Vec<String> = Vec::new();

        for line in &lines {
            if Some(line.order) == title_order {
                merging = false;
                continue;
            }

            let text = line.text();
            let level = self.classify_line(line, &text, &hierarchy, rank_offset);
            if !level.is_outline_level() {
                merging = false;
                continue;
            }

            // Wrapped headings: consecutive qualifying lines at the same
            // level and adjacent order merge into one entry.
            if merging {
                if let Some(prev) = placed.last_mut() {
                    if prev.heading.level == level
                        && prev.heading.page == line.page
                        && prev.end_order == line.order
                    {
                        prev.heading.text.push(' ');
                        prev.heading.text.push_str(&text);
                        prev.end_order = line.end_order;
                        continue;
                    }
                }
            }

            // Repeated text (running headers) only counts once
            let normalized = text.to_lowercase();
            if seen.contains(&normalized) {
                merging = false;
                continue;
            }
            seen.push(normalized);

            placed.push(PlacedHeading {
                heading: Heading::new(level, text, line.page),
                order: line.order,
                end_order: line.end_order,
            });
            merging = true;
        }

        let mut outline = Outline::new(title);
        outline.outline = placed.iter().map(|p| p.heading.clone()).collect();
        (outline, placed)
    }

    /// Resolve the level of one line, or `HeadingLevel::None` for body text.
    fn classify_line(
        &self,
        line: &TextLine,
        text: &str,
        hierarchy: &FontHierarchy,
        rank_offset: usize,
    ) -> HeadingLevel {
        let assessment = self.classifier.assess(text);
        let rank = hierarchy
            .heading_rank(line.font_size())
            .map(|r| r.saturating_sub(rank_offset));
        let top_cluster = rank.map(|r| r <= MAX_LEVEL_RANK).unwrap_or(false);

        if !self.classifier.qualifies(assessment, top_cluster) {
            return HeadingLevel::None;
        }

        if !hierarchy.has_signal() {
            // Uniform-font document: content alone decides, a single level
            return HeadingLevel::H1;
        }

        match rank {
            Some(r) if r <= MAX_LEVEL_RANK => HeadingLevel::from_cluster_rank(r),
            // Deeper-than-H3 ranks and body-sized fonts only qualify in bold,
            // and land on the finest level
            _ if line.is_bold()
                && assessment.score >= self.classifier.config().accept_threshold =>
            {
                HeadingLevel::H3
            }
            _ => HeadingLevel::None,
        }
    }

    /// Title: the earliest page-1 line in the top font cluster, but only when
    /// that cluster is distinguished — used by no other line. A top cluster
    /// shared across lines is a heading tier, not a title font, and the
    /// document falls back to its metadata title or file stem.
    ///
    /// Returns the title text and the index of the chosen line, if any.
    fn select_title(
        &self,
        lines: &[TextLine],
        hierarchy: &FontHierarchy,
        fallback: &str,
    ) -> (String, Option<usize>) {
        if hierarchy.has_signal() {
            let top_count = hierarchy.clusters().first().map(|c| c.count).unwrap_or(0);
            for (idx, line) in lines.iter().enumerate() {
                if line.page != 1 {
                    continue;
                }
                if hierarchy.heading_rank(line.font_size()) == Some(0) {
                    let text = line.text();
                    if !text.is_empty() && top_count == line.runs.len() {
                        return (text, Some(idx));
                    }
                    break;
                }
            }
        }
        (fallback.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    /// Body filler so the 11pt cluster dominates by frequency.
    fn body(page: u32, y0: f32, order0: u32, n: u32) -> Vec<TextRun> {
        (0..n)
            .map(|i| {
                run(
                    "This sentence is ordinary body prose and it ends with a period.",
                    11.0,
                    false,
                    page,
                    y0 - i as f32 * 14.0,
                    order0 + i,
                )
            })
            .collect()
    }

    #[test]
    fn test_title_and_levels() {
        let mut runs = vec![
            run("Annual Safety Report", 24.0, true, 1, 760.0, 0),
            run("1. Introduction", 18.0, true, 1, 720.0, 1),
        ];
        runs.extend(body(1, 700.0, 2, 8));
        runs.push(run("1.1 Scope", 14.0, true, 1, 560.0, 10));
        runs.extend(body(1, 540.0, 11, 8));

        let outline = OutlineAssembler::new().assemble(&runs, "fallback");
        assert_eq!(outline.title, "Annual Safety Report");
        assert_eq!(outline.outline.len(), 2);
        assert_eq!(outline.outline[0].level, HeadingLevel::H1);
        assert_eq!(outline.outline[0].text, "1. Introduction");
        assert_eq!(outline.outline[1].level, HeadingLevel::H2);
        assert_eq!(outline.outline[1].text, "1.1 Scope");
    }

    #[test]
    fn test_title_shares_heading_tier() {
        // "1. Introduction" and "Overview" share 18pt with no separate title
        // font; the tier is a heading tier, so both stay H1 and the title
        // falls back.
        let mut runs = vec![
            run("1. Introduction", 18.0, true, 1, 760.0, 0),
            run("Overview", 18.0, true, 1, 500.0, 9),
        ];
        runs.splice(1..1, body(1, 740.0, 1, 8));

        let outline = OutlineAssembler::new().assemble(&runs, "fallback");
        assert_eq!(outline.title, "fallback");
        assert_eq!(outline.outline.len(), 2);
        assert_eq!(outline.outline[0].level, HeadingLevel::H1);
        assert_eq!(outline.outline[0].text, "1. Introduction");
        assert_eq!(outline.outline[1].level, HeadingLevel::H1);
        assert_eq!(outline.outline[1].text, "Overview");
    }

    #[test]
    fn test_prose_in_large_font_rejected() {
        let mut runs = vec![run(
            "This whole paragraph was set large by mistake and it is clearly a sentence.",
            18.0,
            true,
            1,
            760.0,
            0,
        )];
        runs.extend(body(1, 700.0, 1, 10));

        let outline = OutlineAssembler::new().assemble(&runs, "doc");
        assert!(outline.outline.is_empty());
    }

    #[test]
    fn test_uniform_font_single_level() {
        let mut runs = vec![run("Revision History", 12.0, false, 1, 760.0, 0)];
        runs.extend((0..6).map(|i| {
            run(
                "Ordinary body prose continues here and ends with a period.",
                12.0,
                false,
                1,
                700.0 - i as f32 * 14.0,
                1 + i,
            )
        }));
        runs.push(run("Appendix A: Tables", 12.0, false, 1, 560.0, 7));

        let outline = OutlineAssembler::new().assemble(&runs, "uniform");
        assert_eq!(outline.title, "uniform");
        assert!(!outline.outline.is_empty());
        let levels: std::collections::HashSet<_> =
            outline.outline.iter().map(|h| h.level).collect();
        assert_eq!(levels.len(), 1);
        assert!(levels.contains(&HeadingLevel::H1));
    }

    #[test]
    fn test_wrapped_heading_merges() {
        let mut runs = vec![
            run("Document Title", 24.0, true, 1, 780.0, 0),
            run("Guidelines for the Preparation", 18.0, true, 1, 740.0, 1),
            run("of Technical Reports", 18.0, true, 1, 722.0, 2),
        ];
        runs.extend(body(1, 700.0, 3, 10));

        let outline = OutlineAssembler::new().assemble(&runs, "doc");
        assert_eq!(outline.outline.len(), 1);
        assert_eq!(
            outline.outline[0].text,
            "Guidelines for the Preparation of Technical Reports"
        );
    }

    #[test]
    fn test_running_header_deduplicated() {
        let mut runs = Vec::new();
        for page in 1..=3 {
            runs.push(run(
                "ACME Corp Confidential",
                14.0,
                true,
                page,
                780.0,
                runs.len() as u32,
            ));
            let order0 = runs.len() as u32;
            runs.extend(body(page, 740.0, order0, 6));
        }

        let outline = OutlineAssembler::new().assemble(&runs, "doc");
        let repeats = outline
            .outline
            .iter()
            .filter(|h| h.text == "ACME Corp Confidential")
            .count();
        assert!(repeats <= 1);
    }

    #[test]
    fn test_deterministic() {
        let mut runs = vec![
            run("Title Line", 24.0, true, 1, 780.0, 0),
            run("1. Overview", 18.0, true, 1, 740.0, 1),
        ];
        runs.extend(body(1, 700.0, 2, 10));

        let assembler = OutlineAssembler::new();
        let a = assembler.assemble(&runs, "doc");
        let b = assembler.assemble(&runs, "doc");
        assert_eq!(a.title, b.title);
        assert_eq!(a.outline, b.outline);
    }

    #[test]
    fn test_empty_runs() {
        let outline = OutlineAssembler::new().assemble(&[], "empty");
        assert_eq!(outline.title, "empty");
        assert!(outline.outline.is_empty());
    }
}
