//! Hybrid relevance scoring: semantic, lexical, and document prior.

use crate::error::Result;
use crate::model::{ScoredSection, Section};

use super::embed::{cosine, Embedder};
use super::keywords::KeywordSet;

/// Tunable weights and limits for relevance scoring.
///
/// The three score weights form the fixed combination
/// `combined = semantic_weight * semantic + lexical_weight * lexical +
/// prior_weight * prior`; defaults sum to one with the semantic signal
/// dominant.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Weight of the embedding similarity (default 0.60)
    pub semantic_weight: f32,
    /// Weight of the keyword overlap (default 0.25)
    pub lexical_weight: f32,
    /// Weight of the filename-derived document prior (default 0.15)
    pub prior_weight: f32,
    /// Weight factor for persona-derived terms
    pub persona_term_factor: f32,
    /// Weight factor for job-derived terms
    pub job_term_factor: f32,
    /// Character window passed to the embedding model
    pub embed_window_chars: usize,
    /// Number of top-ranked sections retained for snippet extraction
    pub top_k: usize,
}

impl ScoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, semantic: f32, lexical: f32, prior: f32) -> Self {
        self.semantic_weight = semantic;
        self.lexical_weight = lexical;
        self.prior_weight = prior;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_embed_window(mut self, chars: usize) -> Self {
        self.embed_window_chars = chars;
        self
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.60,
            lexical_weight: 0.25,
            prior_weight: 0.15,
            persona_term_factor: 1.0,
            job_term_factor: 2.0,
            embed_window_chars: 2000,
            top_k: 5,
        }
    }
}

/// Scores sections against one persona + job query.
///
/// The query embedding is computed once at construction; the embedder is the
/// single shared access point to the model.
pub struct RelevanceScorer<'a> {
    embedder: &'a dyn Embedder,
    keywords: &'a KeywordSet,
    query_embedding: Vec<f32>,
    config: &'a ScoreConfig,
}

impl<'a> RelevanceScorer<'a> {
    /// Build a scorer for a query; embeds the query text once.
    pub fn new(
        embedder: &'a dyn Embedder,
        keywords: &'a KeywordSet,
        query_text: &str,
        config: &'a ScoreConfig,
    ) -> Result<Self> {
        let query_embedding = embedder.embed(query_text)?;
        Ok(Self {
            embedder,
            keywords,
            query_embedding,
            config,
        })
    }

    pub fn config(&self) -> &ScoreConfig {
        self.config
    }

    /// Document prior from the filename: the same keyword overlap applied to
    /// the humanized file name. Computed once per document.
    pub fn document_prior(&self, filename: &str) -> f32 {
        self.keywords.lexical_score(&humanize_filename(filename))
    }

    /// Semantic and lexical scores for an arbitrary text.
    pub fn text_scores(&self, text: &str) -> Result<(f32, f32)> {
        let window = truncate_chars(text, self.config.embed_window_chars);
        let embedding = self.embedder.embed(window)?;
        // Model vectors are near-normalized; clamp keeps the score in [0,1]
        let semantic = cosine(&self.query_embedding, &embedding).clamp(0.0, 1.0);
        let lexical = self.keywords.lexical_score(text);
        Ok((semantic, lexical))
    }

    /// Score one section, folding in its document's prior.
    pub fn score_section(&self, section: Section, prior: f32) -> Result<ScoredSection> {
        let (semantic, lexical) = self.text_scores(&section.full_text())?;
        let combined = self.config.semantic_weight * semantic
            + self.config.lexical_weight * lexical
            + self.config.prior_weight * prior;

        Ok(ScoredSection {
            section,
            semantic,
            lexical,
            document_prior: prior,
            combined,
        })
    }

    /// Sentence-granularity score on the same basis, without the prior.
    pub fn sentence_score(&self, sentence: &str) -> Result<f32> {
        let (semantic, lexical) = self.text_scores(sentence)?;
        let weight_sum = self.config.semantic_weight + self.config.lexical_weight;
        Ok((self.config.semantic_weight * semantic + self.config.lexical_weight * lexical)
            / weight_sum)
    }
}

/// Order sections into the final ranking.
///
/// Descending combined score; ties resolve by higher document prior, then
/// lower page, then earlier position, making the order total and stable
/// across runs.
pub fn rank_sections(mut scored: Vec<ScoredSection>) -> Vec<ScoredSection> {
    scored.sort_by(|a, b| {
        b.combined
            .partial_cmp(&a.combined)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.document_prior
                    .partial_cmp(&a.document_prior)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(a.section.page.cmp(&b.section.page))
            .then(a.section.start_order.cmp(&b.section.start_order))
    });
    scored
}

/// File stem with separators spaced out: "Fillable_Form_Guide.pdf" ->
/// "Fillable Form Guide".
fn humanize_filename(filename: &str) -> String {
    let name = std::path::Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    name.replace(['_', '-'], " ")
}

/// Truncate to a character budget without splitting a codepoint.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    /// Deterministic embedder: maps texts to fixed per-token vectors.
    struct TokenCountEmbedder;

    impl Embedder for TokenCountEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(vec![
                lower.matches("form").count() as f32,
                lower.matches("travel").count() as f32,
                lower.matches("menu").count() as f32,
                1.0,
            ])
        }
    }

    fn section(document: &str, heading: &str, body: &str, page: u32, order: u32) -> Section {
        Section {
            document: document.to_string(),
            heading: heading.to_string(),
            level: HeadingLevel::H1,
            page,
            body: body.to_string(),
            start_order: order,
            end_order: order + 2,
        }
    }

    #[test]
    fn test_document_prior_from_filename() {
        let keywords = KeywordSet::generate("HR professional", "create onboarding forms", 1.0, 2.0);
        let config = ScoreConfig::default();
        let scorer =
            RelevanceScorer::new(&TokenCountEmbedder, &keywords, "query", &config).unwrap();

        let guide = scorer.document_prior("Fillable_Form_Guide.pdf");
        let appendix = scorer.document_prior("Appendix_Notes.pdf");
        assert!(guide > appendix, "{} <= {}", guide, appendix);
    }

    #[test]
    fn test_combined_is_weighted_sum() {
        let keywords = KeywordSet::generate("", "forms", 1.0, 2.0);
        let config = ScoreConfig::default();
        let scorer =
            RelevanceScorer::new(&TokenCountEmbedder, &keywords, "forms", &config).unwrap();

        let scored = scorer
            .score_section(section("a.pdf", "Forms", "All about forms here.", 1, 0), 0.5)
            .unwrap();

        let expected = 0.60 * scored.semantic + 0.25 * scored.lexical + 0.15 * 0.5;
        assert!((scored.combined - expected).abs() < 1e-6);
    }

    #[test]
    fn test_rank_tie_breaks() {
        let base = ScoredSection {
            section: section("a.pdf", "H", "b", 3, 10),
            semantic: 0.5,
            lexical: 0.5,
            document_prior: 0.2,
            combined: 0.7,
        };
        let higher_prior = ScoredSection {
            section: section("b.pdf", "H", "b", 3, 10),
            document_prior: 0.9,
            ..base.clone()
        };
        let earlier_page = ScoredSection {
            section: section("c.pdf", "H", "b", 1, 10),
            ..base.clone()
        };
        let earlier_order = ScoredSection {
            section: section("d.pdf", "H", "b", 3, 2),
            ..base.clone()
        };

        let ranked = rank_sections(vec![
            base.clone(),
            earlier_order.clone(),
            higher_prior.clone(),
            earlier_page.clone(),
        ]);

        assert_eq!(ranked[0].section.document, "b.pdf"); // prior desc first
        assert_eq!(ranked[1].section.document, "c.pdf"); // then page asc
        assert_eq!(ranked[2].section.document, "d.pdf"); // then order asc
        assert_eq!(ranked[3].section.document, "a.pdf");
    }

    #[test]
    fn test_rank_is_deterministic() {
        let make = |doc: &str, combined: f32| ScoredSection {
            section: section(doc, "H", "b", 1, 0),
            semantic: 0.0,
            lexical: 0.0,
            document_prior: 0.0,
            combined,
        };
        let a = rank_sections(vec![make("x", 0.3), make("y", 0.9), make("z", 0.6)]);
        let b = rank_sections(vec![make("z", 0.6), make("x", 0.3), make("y", 0.9)]);
        let order_a: Vec<_> = a.iter().map(|s| s.section.document.clone()).collect();
        let order_b: Vec<_> = b.iter().map(|s| s.section.document.clone()).collect();
        assert_eq!(order_a, order_b);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_humanize_filename() {
        assert_eq!(
            humanize_filename("Fillable_Form_Guide.pdf"),
            "Fillable Form Guide"
        );
        assert_eq!(humanize_filename("menu-ideas.pdf"), "menu ideas");
    }
}
