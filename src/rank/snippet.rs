//! Sentence splitting and best-sentence-cluster extraction.

use crate::error::Result;
use crate::model::{Section, SentenceCluster};
use crate::script::Script;

use super::score::RelevanceScorer;

/// Latin abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "vs", "cf", "dr", "mr", "mrs", "ms", "prof", "fig", "no", "al", "st",
];

/// Split text into sentences using the dominant script's terminal markers.
///
/// A terminal character followed by whitespace (or end of text) closes a
/// sentence, except after a known Latin abbreviation or a bare initial
/// ("J. Smith"). The concatenation of the returned sentences preserves the
/// original order.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let rules = Script::detect(text).rules();
    let chars: Vec<char> = text.chars().collect();

    let mut sentences = Vec::new();
    let mut start = 0;

    for i in 0..chars.len() {
        if !rules.sentence_terminals.contains(&chars[i]) {
            continue;
        }

        let at_end = i + 1 == chars.len();
        let followed_by_space = chars.get(i + 1).map(|c| c.is_whitespace()).unwrap_or(false);
        // Word-spaced scripts require whitespace after the terminal so that
        // "3.14" stays intact; CJK terminals end a sentence on their own.
        if !at_end && !followed_by_space && rules.word_spaced {
            continue;
        }

        if chars[i] == '.' && is_abbreviation(&chars[start..i]) {
            continue;
        }

        let sentence: String = chars[start..=i].iter().collect();
        let sentence = sentence.trim().to_string();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = i + 1;
    }

    // Trailing text without a terminal marker is still a sentence
    if start < chars.len() {
        let tail: String = chars[start..].iter().collect();
        let tail = tail.trim().to_string();
        if !tail.is_empty() {
            sentences.push(tail);
        }
    }

    sentences
}

/// Whether the text before a period ends in an abbreviation or bare initial.
fn is_abbreviation(before: &[char]) -> bool {
    let last_word: String = before
        .iter()
        .rev()
        .take_while(|c| !c.is_whitespace())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    // Single capital letter: an initial, not a sentence end
    if last_word.chars().count() == 1
        && last_word.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
    {
        return true;
    }

    let lower = last_word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Substantial sentences carry enough words (or characters, for unspaced
/// scripts) to be worth ranking as a snippet center.
fn is_substantial(sentence: &str) -> bool {
    let rules = Script::detect(sentence).rules();
    if rules.word_spaced {
        sentence.split_whitespace().count() > 4
    } else {
        sentence.chars().count() > 8
    }
}

/// Extract the best sentence cluster from a section.
///
/// Every sentence is scored on the section's query basis; the best substantial
/// sentence (earliest on ties) is returned with its immediate neighbors. The
/// cluster is 1 to 3 contiguous sentences and shrinks at section edges rather
/// than wrapping. Sections with no sentences yield `None`.
pub fn extract_cluster(
    scorer: &RelevanceScorer<'_>,
    section: &Section,
) -> Result<Option<SentenceCluster>> {
    let sentences = split_sentences(&section.body);
    if sentences.is_empty() {
        return Ok(None);
    }

    let mut best: Option<(usize, f32)> = None;
    for (i, sentence) in sentences.iter().enumerate() {
        if sentences.len() > 1 && !is_substantial(sentence) {
            continue;
        }
        let score = scorer.sentence_score(sentence)?;
        let better = match best {
            Some((_, best_score)) => score > best_score,
            None => true,
        };
        if better {
            best = Some((i, score));
        }
    }

    // All sentences filtered as fragments: fall back to the first one
    let (center, center_score) = match best {
        Some(found) => found,
        None => (0, scorer.sentence_score(&sentences[0])?),
    };

    let start = center.saturating_sub(1);
    let end = (center + 2).min(sentences.len());

    Ok(Some(SentenceCluster {
        sentences: sentences[start..end].to_vec(),
        center_score,
    }))
}
