//! Positioned text runs and baseline-merged lines.

use serde::{Deserialize, Serialize};

/// A text run with font and position information.
///
/// Runs are produced per page by the collector, ordered by reading order;
/// `order` is the global index across the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// Decoded text content
    pub text: String,
    /// Effective font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Baseline Y position on the page
    pub y: f32,
    /// Global reading-order index
    pub order: u32,
}

/// A line composed of runs sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The runs in this line, in reading order
    pub runs: Vec<TextRun>,
    /// Page number (1-indexed)
    pub page: u32,
    /// Baseline Y position
    pub y: f32,
    /// Order of the first run in the line
    pub order: u32,
    /// One past the order of the last run
    pub end_order: u32,
}

impl TextLine {
    /// Build a line from a non-empty run of spans on one baseline.
    fn from_runs(runs: Vec<TextRun>) -> Option<Self> {
        let first = runs.first()?;
        let last = runs.last()?;
        Some(Self {
            page: first.page,
            y: first.y,
            order: first.order,
            end_order: last.order + 1,
            runs,
        })
    }

    /// Combined text of all runs.
    ///
    /// A space is inserted between runs unless one is already present or the
    /// boundary characters come from a script without word spaces.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for run in &self.runs {
            if !result.is_empty() {
                let prev_last = result.chars().last();
                let curr_first = run.text.chars().next();
                let spaceless = prev_last.map(is_spaceless_script_char).unwrap_or(false)
                    && curr_first.map(is_spaceless_script_char).unwrap_or(false);
                if !spaceless && !result.ends_with(' ') && !run.text.starts_with(' ') {
                    result.push(' ');
                }
            }
            result.push_str(&run.text);
        }
        result.trim().to_string()
    }

    /// Dominant font size, weighted by text length.
    pub fn font_size(&self) -> f32 {
        let total_chars: usize = self.runs.iter().map(|r| r.text.chars().count()).sum();
        if total_chars == 0 {
            return self.runs.first().map(|r| r.font_size).unwrap_or(0.0);
        }
        let weighted: f32 = self
            .runs
            .iter()
            .map(|r| r.font_size * r.text.chars().count() as f32)
            .sum();
        weighted / total_chars as f32
    }

    /// Whether the line is predominantly bold, by character count.
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .runs
            .iter()
            .filter(|r| r.is_bold)
            .map(|r| r.text.chars().count())
            .sum();
        let total_chars: usize = self.runs.iter().map(|r| r.text.chars().count()).sum();
        total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5
    }
}

/// Group document-ordered runs into baseline lines.
///
/// Runs belong to the same line when they are on the same page and their Y
/// positions differ by less than a tolerance proportional to the font size.
pub fn group_runs_into_lines(runs: &[TextRun]) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();

    for run in runs {
        let same_line = current.last().map(|prev: &TextRun| {
            prev.page == run.page && (prev.y - run.y).abs() <= run.font_size.max(1.0) * 0.3
        });

        match same_line {
            Some(true) => current.push(run.clone()),
            Some(false) => {
                if let Some(line) = TextLine::from_runs(std::mem::take(&mut current)) {
                    lines.push(line);
                }
                current.push(run.clone());
            }
            None => current.push(run.clone()),
        }
    }

    if let Some(line) = TextLine::from_runs(current) {
        lines.push(line);
    }

    lines
}

/// Check if a character is from a script that does not use word spaces.
///
/// Chinese and Japanese omit spaces between words; Korean uses them.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2A6DF).contains(&code)
        // Hiragana / Katakana
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        // CJK symbols and punctuation
        || (0x3000..=0x303F).contains(&code)
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

    #[test]
    fn test_group_runs_same_baseline() {
        let runs = vec![
            run("Revision", 14.0, true, 1, 700.0, 0),
            run("History", 14.0, true, 1, 700.5, 1),
            run("Body text follows.", 11.0, false, 1, 680.0, 2),
        ];
        let lines = group_runs_into_lines(&runs);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Revision History");
        assert_eq!(lines[0].order, 0);
        assert_eq!(lines[0].end_order, 2);
        assert_eq!(lines[1].order, 2);
    }

    #[test]
    fn test_group_runs_page_break() {
        let runs = vec![
            run("End of page one", 11.0, false, 1, 50.0, 0),
            run("Top of page two", 11.0, false, 2, 50.0, 1),
        ];
        let lines = group_runs_into_lines(&runs);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_line_dominant_size_and_bold() {
        let runs = vec![
            run("Mostly this size here", 12.0, true, 1, 100.0, 0),
            run("x", 24.0, false, 1, 100.0, 1),
        ];
        let lines = group_runs_into_lines(&runs);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].font_size() < 13.0);
        assert!(lines[0].is_bold());
    }

    #[test]
    fn test_cjk_join_without_space() {
        let runs = vec![
            run("日本", 12.0, false, 1, 100.0, 0),
            run("語", 12.0, false, 1, 100.0, 1),
        ];
        let lines = group_runs_into_lines(&runs);
        assert_eq!(lines[0].text(), "日本語");
    }
}
