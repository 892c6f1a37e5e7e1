//! Content-based heading classification, independent of font size.
//!
//! A line's heading-likelihood comes from four features: brevity, absence of
//! sentence-terminal punctuation, a heading-like lead (capital, numbering
//! pattern), and low stop-word density. Feature weights and thresholds are
//! tunable through [`ClassifierConfig`]; script-specific behavior comes from
//! the [`crate::script`] rule tables.

use std::sync::LazyLock;

use regex::Regex;

use crate::script::Script;

/// Numbering patterns that open headings: "1.", "1.2.3", "2)", "A.", "iv)".
static NUMBERING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?:\d+\.)+\d*|\d+[.)]|[A-Za-z][.)]|[IVXLCDMivxlcdm]+[.)])\s+\S").unwrap()
});

/// Tunable weights and thresholds for heading classification.
///
/// Weights need not sum to one; the combined score is normalized by their sum
/// and clipped to `[0,1]`.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Weight of the brevity feature
    pub w_short: f32,
    /// Weight of the no-terminal-punctuation feature
    pub w_terminal: f32,
    /// Weight of the heading-like-lead feature
    pub w_lead: f32,
    /// Weight of the low-stop-word-density feature
    pub w_stopword: f32,
    /// Score at which content alone qualifies a line
    pub accept_threshold: f32,
    /// Minimum score counted as support for a top-cluster font
    pub weak_threshold: f32,
    /// Stop-word ratio at which the density feature bottoms out
    pub stopword_ceiling: f32,
    /// Lines shorter than this many characters are never headings
    pub min_chars: usize,
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accept_threshold(mut self, threshold: f32) -> Self {
        self.accept_threshold = threshold;
        self
    }

    pub fn with_weak_threshold(mut self, threshold: f32) -> Self {
        self.weak_threshold = threshold;
        self
    }

    pub fn with_weights(mut self, short: f32, terminal: f32, lead: f32, stopword: f32) -> Self {
        self.w_short = short;
        self.w_terminal = terminal;
        self.w_lead = lead;
        self.w_stopword = stopword;
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            w_short: 0.20,
            w_terminal: 0.35,
            w_lead: 0.20,
            w_stopword: 0.25,
            accept_threshold: 0.60,
            weak_threshold: 0.25,
            stopword_ceiling: 0.40,
            min_chars: 2,
        }
    }
}

/// The classifier's verdict on one line.
#[derive(Debug, Clone, Copy)]
pub struct Assessment {
    /// Combined heading-likelihood in `[0,1]`
    pub score: f32,
    /// Whether the line reads as a full sentence (terminal marker present)
    pub sentence_like: bool,
}

/// Scores lines for heading-likelihood from content cues alone.
#[derive(Debug, Clone, Default)]
pub struct HeadingClassifier {
    config: ClassifierConfig,
}

impl HeadingClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Assess one line of text.
    pub fn assess(&self, text: &str) -> Assessment {
        let text = text.trim();
        let char_count = text.chars().count();

        let script = Script::detect(text);
        let rules = script.rules();
        let sentence_like = rules.ends_as_sentence(text);

        if char_count < self.config.min_chars || char_count > rules.max_heading_chars {
            return Assessment {
                score: 0.0,
                sentence_like,
            };
        }

        // Clause punctuation mid-line marks prose in scripts that never use
        // it in titles (Japanese 、 and Chinese ，).
        if rules.has_clause_punctuation(text) {
            return Assessment {
                score: 0.0,
                sentence_like: true,
            };
        }

        let f_short = 1.0 - (char_count as f32 / rules.max_heading_chars as f32);
        let f_terminal = if sentence_like { 0.0 } else { 1.0 };
        let f_lead = if self.heading_lead(text, rules.word_spaced) {
            1.0
        } else {
            0.0
        };
        let ratio = rules.stop_word_ratio(text);
        let f_stopword = (1.0 - ratio / self.config.stopword_ceiling).clamp(0.0, 1.0);

        let c = &self.config;
        let weight_sum = c.w_short + c.w_terminal + c.w_lead + c.w_stopword;
        let score = (c.w_short * f_short
            + c.w_terminal * f_terminal
            + c.w_lead * f_lead
            + c.w_stopword * f_stopword)
            / weight_sum;

        Assessment {
            score: score.clamp(0.0, 1.0),
            sentence_like,
        }
    }

    /// Whether a line qualifies as a heading candidate.
    ///
    /// Content alone qualifies past `accept_threshold`; a top-cluster font
    /// qualifies with weak content support, but never for sentence-like
    /// lines — that keeps large bold prose out of the outline.
    pub fn qualifies(&self, assessment: Assessment, top_cluster_font: bool) -> bool {
        if assessment.score >= self.config.accept_threshold {
            return true;
        }
        top_cluster_font && !assessment.sentence_like && assessment.score >= self.config.weak_threshold
    }

    /// Heading-like lead: capital letter, digit, or a numbering pattern.
    ///
    /// Scripts without letter case treat any non-punctuation lead as neutral.
    fn heading_lead(&self, text: &str, word_spaced: bool) -> bool {
        if NUMBERING.is_match(text) {
            return true;
        }
        match text.chars().next() {
            Some(c) if c.is_uppercase() || c.is_ascii_digit() => true,
            Some(c) if !word_spaced => c.is_alphanumeric() || !c.is_ascii(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeadingClassifier {
        HeadingClassifier::new(ClassifierConfig::default())
    }

    #[test]
    fn test_numbered_heading_scores_high() {
        let a = classifier().assess("1. Introduction");
        assert!(a.score > 0.8, "score was {}", a.score);
        assert!(!a.sentence_like);
    }

    #[test]
    fn test_prose_sentence_scores_low() {
        let a = classifier()
            .assess("The system extracts structured information from PDF documents in two stages.");
        assert!(a.score < 0.6, "score was {}", a.score);
        assert!(a.sentence_like);
    }

    #[test]
    fn test_too_short_and_too_long() {
        assert_eq!(classifier().assess("x").score, 0.0);
        let long = "word ".repeat(40);
        assert_eq!(classifier().assess(&long).score, 0.0);
    }

    #[test]
    fn test_japanese_clause_comma_disqualifies() {
        let a = classifier().assess("今日は、晴れです");
        assert_eq!(a.score, 0.0);
    }

    #[test]
    fn test_japanese_noun_heading() {
        let a = classifier().assess("第一章 概要");
        assert!(a.score > 0.6, "score was {}", a.score);
    }

    #[test]
    fn test_qualification_disjunction() {
        let c = classifier();
        let strong = c.assess("2. Methods");
        assert!(c.qualifies(strong, false));

        let weak = c.assess("summary of the results from the first trial");
        assert!(weak.score < c.config().accept_threshold);
        assert!(c.qualifies(weak, true));
        assert!(!c.qualifies(weak, false));
    }

    #[test]
    fn test_sentence_like_never_weakly_qualifies() {
        let c = classifier();
        let prose = c.assess("This paragraph happens to be set in a very large font.");
        assert!(!c.qualifies(prose, true));
    }

    #[test]
    fn test_monotonic_in_threshold() {
        // Lowering the acceptance threshold never removes a qualifying line
        let lines = [
            "1. Introduction",
            "Revision History",
            "The quick brown fox jumps over the lazy dog.",
            "Appendix A: Tables",
        ];
        let strict = HeadingClassifier::new(ClassifierConfig::new().with_accept_threshold(0.8));
        let loose = HeadingClassifier::new(ClassifierConfig::new().with_accept_threshold(0.5));

        for line in lines {
            let qualified_strict = strict.qualifies(strict.assess(line), false);
            let qualified_loose = loose.qualifies(loose.assess(line), false);
            if qualified_strict {
                assert!(qualified_loose, "line dropped by lower threshold: {}", line);
            }
        }
    }
}
