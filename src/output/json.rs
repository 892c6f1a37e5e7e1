//! JSON output records for both pipeline stages.
//!
//! Stage A serializes [`crate::model::Outline`] directly. Stage B produces an
//! [`AnalysisRecord`] echoing the run inputs plus the ranked sections and
//! their refined snippets.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ScoredSection, SentenceCluster};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any record to JSON.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Echo of the ranking run inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

/// One ranked section in the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedSectionRecord {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page: u32,
}

/// The refined snippet for one ranked section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub document: String,
    pub refined_text: String,
    pub page: u32,
}

/// The complete Stage B output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub metadata: AnalysisMetadata,
    pub extracted_sections: Vec<RankedSectionRecord>,
    pub sub_section_analysis: Vec<SnippetRecord>,
}

impl AnalysisRecord {
    /// Build the record from ranked sections and their snippet clusters.
    ///
    /// `ranked` and `clusters` are parallel slices; a missing cluster falls
    /// back to the section heading so every ranked section has a snippet row.
    pub fn build(
        input_documents: Vec<String>,
        persona: &str,
        job: &str,
        ranked: &[ScoredSection],
        clusters: &[Option<SentenceCluster>],
    ) -> Self {
        let extracted_sections = ranked
            .iter()
            .enumerate()
            .map(|(i, scored)| RankedSectionRecord {
                document: scored.section.document.clone(),
                section_title: scored.section.heading.clone(),
                importance_rank: i + 1,
                page: scored.section.page,
            })
            .collect();

        let sub_section_analysis = ranked
            .iter()
            .zip(clusters.iter())
            .map(|(scored, cluster)| SnippetRecord {
                document: scored.section.document.clone(),
                refined_text: cluster
                    .as_ref()
                    .map(|c| c.text())
                    .unwrap_or_else(|| scored.section.heading.clone()),
                page: scored.section.page,
            })
            .collect();

        Self {
            metadata: AnalysisMetadata {
                input_documents,
                persona: persona.to_string(),
                job_to_be_done: job.to_string(),
                processing_timestamp: Utc::now().to_rfc3339(),
            },
            extracted_sections,
            sub_section_analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, Section};

    fn scored(document: &str, heading: &str, page: u32) -> ScoredSection {
        ScoredSection {
            section: Section {
                document: document.to_string(),
                heading: heading.to_string(),
                level: HeadingLevel::H1,
                page,
                body: "Body text.".to_string(),
                start_order: 0,
                end_order: 2,
            },
            semantic: 0.8,
            lexical: 0.4,
            document_prior: 0.2,
            combined: 0.61,
        }
    }

    #[test]
    fn test_analysis_record_shape() {
        let ranked = vec![scored("a.pdf", "Setup", 2), scored("b.pdf", "Usage", 5)];
        let clusters = vec![
            Some(SentenceCluster {
                sentences: vec!["One.".to_string(), "Two.".to_string()],
                center_score: 0.9,
            }),
            None,
        ];

        let record = AnalysisRecord::build(
            vec!["a.pdf".to_string(), "b.pdf".to_string()],
            "HR professional",
            "create onboarding forms",
            &ranked,
            &clusters,
        );

        assert_eq!(record.extracted_sections.len(), 2);
        assert_eq!(record.extracted_sections[0].importance_rank, 1);
        assert_eq!(record.extracted_sections[1].importance_rank, 2);
        assert_eq!(record.sub_section_analysis[0].refined_text, "One. Two.");
        // Missing cluster falls back to the heading
        assert_eq!(record.sub_section_analysis[1].refined_text, "Usage");

        let json = to_json(&record, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"extracted_sections\""));
        assert!(json.contains("\"sub_section_analysis\""));
        assert!(json.contains("\"importance_rank\": 1"));
    }

    #[test]
    fn test_compact_json() {
        let record = AnalysisRecord::build(vec![], "p", "j", &[], &[]);
        let json = to_json(&record, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }
}
