//! Sections cut at heading boundaries, their scores, and extracted snippets.

use serde::{Deserialize, Serialize};

use super::HeadingLevel;

/// A contiguous content section of one document.
///
/// Spans `[start_order, end_order)` of the document's run sequence, from a
/// heading to the run before the next heading of equal-or-coarser level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Source document identifier (filename)
    pub document: String,
    /// Heading text that opens the section
    pub heading: String,
    /// Level of the opening heading
    pub level: HeadingLevel,
    /// Page the section starts on (1-indexed)
    pub page: u32,
    /// Concatenated body text (heading excluded)
    pub body: String,
    /// First run order covered by the section
    pub start_order: u32,
    /// One past the last run order covered
    pub end_order: u32,
}

impl Section {
    /// Heading and body together, for scoring.
    pub fn full_text(&self) -> String {
        if self.body.is_empty() {
            self.heading.clone()
        } else {
            format!("{} {}", self.heading, self.body)
        }
    }
}

/// A section with its relevance scores.
#[derive(Debug, Clone)]
pub struct ScoredSection {
    pub section: Section,
    /// Cosine similarity of section and query embeddings
    pub semantic: f32,
    /// Normalized keyword-weight overlap
    pub lexical: f32,
    /// Filename-derived document prior
    pub document_prior: f32,
    /// Fixed weighted sum of the three
    pub combined: f32,
}

/// The best-scoring sentence of a section with its immediate neighbors.
///
/// Always 1 to 3 sentences, contiguous in original order; 2 at section edges.
#[derive(Debug, Clone)]
pub struct SentenceCluster {
    pub sentences: Vec<String>,
    pub center_score: f32,
}

impl SentenceCluster {
    /// The cluster joined back into running text.
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }
}
