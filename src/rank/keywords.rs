//! Query keyword generation from persona and job descriptions.

use std::collections::HashMap;

use crate::script::Script;

/// Weighted query terms derived from a persona + job-to-be-done pair.
///
/// Ephemeral: generated per query and never persisted. Terms from the job
/// description weigh more than persona terms since the job states what is
/// actually being looked for.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    weights: HashMap<String, f32>,
}

impl KeywordSet {
    /// Generate keywords from the two query texts.
    ///
    /// `job_factor` and `persona_factor` scale term weights by origin; each
    /// occurrence adds its factor, so frequency raises weight.
    pub fn generate(persona: &str, job: &str, persona_factor: f32, job_factor: f32) -> Self {
        let mut weights = HashMap::new();

        for term in tokenize(persona) {
            *weights.entry(term).or_insert(0.0) += persona_factor;
        }
        for term in tokenize(job) {
            *weights.entry(term).or_insert(0.0) += job_factor;
        }

        Self { weights }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Weight of a single term, 0 for unknown terms.
    pub fn weight(&self, term: &str) -> f32 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// Maximum attainable match score: the sum of all term weights.
    pub fn max_score(&self) -> f32 {
        self.weights.values().sum()
    }

    /// Lexical relevance of a text in `[0,1]`: matched term weight over the
    /// maximum attainable. Each distinct term counts once.
    pub fn lexical_score(&self, text: &str) -> f32 {
        let max = self.max_score();
        if max <= 0.0 {
            return 0.0;
        }

        let present: std::collections::HashSet<String> = tokenize_all(text).collect();
        let matched: f32 = self
            .weights
            .iter()
            .filter(|(term, _)| present.contains(*term))
            .map(|(_, w)| w)
            .sum();

        matched / max
    }
}

/// Lowercased tokens with stop words removed and plurals folded.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    let rules = Script::detect(text).rules();
    raw_tokens(text)
        .filter(move |t| !rules.stop_words.contains(&t.as_str()))
        .map(fold_plural)
}

/// Lowercased tokens with plurals folded, stop words included.
fn tokenize_all(text: &str) -> impl Iterator<Item = String> + '_ {
    raw_tokens(text).map(fold_plural)
}

fn raw_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
}

/// Naive plural folding so "forms" matches "Form_Guide".
fn fold_plural(token: String) -> String {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        token[..token.len() - 1].to_string()
    } else {
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_drops_stop_words() {
        let set = KeywordSet::generate("an HR professional", "create onboarding forms", 1.0, 2.0);
        assert!(set.weight("hr") > 0.0);
        assert!(set.weight("form") > 0.0, "plurals fold to the singular");
        assert_eq!(set.weight("an"), 0.0);
        assert_eq!(set.weight("the"), 0.0);
    }

    #[test]
    fn test_job_terms_weigh_more() {
        let set = KeywordSet::generate("travel planner", "plan group travel", 1.0, 2.0);
        // "travel" occurs in both: 1.0 + 2.0
        assert!((set.weight("travel") - 3.0).abs() < f32::EPSILON);
        assert!((set.weight("planner") - 1.0).abs() < f32::EPSILON);
        assert!((set.weight("group") - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_lexical_score_normalized() {
        let set = KeywordSet::generate("", "fillable forms", 1.0, 2.0);
        let full = set.lexical_score("How to create fillable forms in minutes");
        let half = set.lexical_score("General notes about forms");
        let none = set.lexical_score("Completely unrelated text");

        assert!((full - 1.0).abs() < 1e-6);
        assert!(half > 0.0 && half < 1.0);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn test_empty_query() {
        let set = KeywordSet::generate("", "", 1.0, 2.0);
        assert!(set.is_empty());
        assert_eq!(set.lexical_score("anything"), 0.0);
    }
}
