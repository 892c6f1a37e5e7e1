//! # pdfsift
//!
//! Heuristic PDF intelligence in two stages:
//!
//! 1. **Outline extraction** — font clustering and content heuristics turn
//!    positioned text runs into a `title` + `H1/H2/H3` outline, without
//!    relying on embedded bookmarks.
//! 2. **Persona ranking** — documents are cut into sections at heading
//!    boundaries, ranked against a persona + job-to-be-done query with a
//!    hybrid lexical/semantic/filename-prior score, and the best sentence
//!    cluster is extracted from each top section.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::extract_outline;
//!
//! fn main() -> pdfsift::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{} ({} headings)", outline.title, outline.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Ranking
//!
//! ```no_run
//! use pdfsift::{rank_documents, FastEmbedder, ParseOptions, ScoreConfig};
//! use std::path::PathBuf;
//!
//! fn main() -> pdfsift::Result<()> {
//!     let embedder = FastEmbedder::load(None)?;
//!     let record = rank_documents(
//!         &[PathBuf::from("guide.pdf")],
//!         "HR professional",
//!         "create onboarding forms",
//!         &embedder,
//!         &ParseOptions::default(),
//!         &ScoreConfig::default(),
//!     )?;
//!     println!("{} ranked sections", record.extracted_sections.len());
//!     Ok(())
//! }
//! ```

pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod output;
pub mod parser;
pub mod rank;
pub mod script;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    Heading, HeadingLevel, Outline, ScoredSection, Section, SentenceCluster, TextLine, TextRun,
};
pub use outline::{ClassifierConfig, FontClusterAnalyzer, HeadingClassifier, OutlineAssembler};
pub use output::{to_json, AnalysisRecord, JsonFormat};
pub use parser::{ErrorMode, ParseOptions, RunCollector};
pub use rank::{
    load_descriptor, Descriptor, Embedder, FastEmbedder, KeywordSet, RelevanceScorer, ScoreConfig,
};
pub use script::Script;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use rank::{extract_cluster, rank_sections, segment_sections};

/// Extract the outline of one PDF file.
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    extract_outline_with_options(path, ParseOptions::default(), &OutlineAssembler::new())
}

/// Extract the outline of one PDF file with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
    assembler: &OutlineAssembler,
) -> Result<Outline> {
    let path = path.as_ref();
    let collector = RunCollector::open_with_options(path, options)?;
    let fallback = fallback_title(&collector, path);

    match collector.collect() {
        Ok(runs) => Ok(assembler.assemble(&runs, &fallback)),
        // A document with no extractable text still has a title
        Err(Error::EmptyDocument) => Ok(Outline::new(fallback)),
        Err(e) => Err(e),
    }
}

/// Extract outlines for a batch of PDF files.
///
/// Documents are independent, so the batch fans out across threads when
/// `options.parallel` is set. Per-document failures are returned in place;
/// they never abort the rest of the batch.
pub fn extract_outline_batch(
    paths: &[PathBuf],
    options: &ParseOptions,
    assembler: &OutlineAssembler,
) -> Vec<(PathBuf, Result<Outline>)> {
    let extract = |path: &PathBuf| {
        let result = extract_outline_with_options(path, options.clone(), assembler);
        if let Err(ref e) = result {
            log::warn!("skipping {}: {}", path.display(), e);
        }
        (path.clone(), result)
    };

    if options.parallel {
        paths.par_iter().map(extract).collect()
    } else {
        paths.iter().map(extract).collect()
    }
}

/// Rank sections across documents for a persona + job query and extract the
/// best sentence cluster from each of the top sections.
///
/// Unreadable or empty documents are logged and skipped; the run only fails
/// on query embedding errors. The embedding model behind `embedder` is the
/// single shared access point for the whole run.
pub fn rank_documents(
    paths: &[PathBuf],
    persona: &str,
    job: &str,
    embedder: &dyn Embedder,
    parse_options: &ParseOptions,
    score_config: &ScoreConfig,
) -> Result<AnalysisRecord> {
    let keywords = KeywordSet::generate(
        persona,
        job,
        score_config.persona_term_factor,
        score_config.job_term_factor,
    );
    let query_text = format!("{} who needs to {}", persona, job);
    let scorer = RelevanceScorer::new(embedder, &keywords, &query_text, score_config)?;

    // Per-document extraction is embarrassingly parallel; scoring stays
    // serial behind the embedder.
    let documents = collect_document_sections(paths, parse_options);

    let mut scored = Vec::new();
    for (name, sections) in &documents {
        let prior = scorer.document_prior(name);
        for section in sections {
            match scorer.score_section(section.clone(), prior) {
                Ok(s) => scored.push(s),
                Err(e) => log::warn!("scoring failed for a section of {}: {}", name, e),
            }
        }
    }

    let mut ranked = rank_sections(scored);
    ranked.truncate(score_config.top_k);

    let mut clusters = Vec::with_capacity(ranked.len());
    for scored in &ranked {
        let cluster = extract_cluster(&scorer, &scored.section)?;
        clusters.push(cluster);
    }

    let input_documents = paths
        .iter()
        .map(|p| file_name(p))
        .collect();

    Ok(AnalysisRecord::build(
        input_documents,
        persona,
        job,
        &ranked,
        &clusters,
    ))
}

/// Collect and segment every readable document in the batch.
fn collect_document_sections(
    paths: &[PathBuf],
    options: &ParseOptions,
) -> Vec<(String, Vec<Section>)> {
    let process = |path: &PathBuf| {
        let name = file_name(path);
        match document_sections(path, options.clone()) {
            Ok(sections) => Some((name, sections)),
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                None
            }
        }
    };

    if options.parallel {
        paths.par_iter().filter_map(process).collect()
    } else {
        paths.iter().filter_map(process).collect()
    }
}

/// Runs -> outline -> sections for one document.
fn document_sections(path: &Path, options: ParseOptions) -> Result<Vec<Section>> {
    let collector = RunCollector::open_with_options(path, options)?;
    let fallback = fallback_title(&collector, path);
    let runs = collector.collect()?;

    let assembler = OutlineAssembler::new();
    let (outline, placed) = assembler.assemble_placed(&runs, &fallback);

    Ok(segment_sections(
        &file_name(path),
        &outline.title,
        &runs,
        &placed,
    ))
}

/// Metadata title, or the file stem when the document has none.
fn fallback_title(collector: &RunCollector, path: &Path) -> String {
    collector
        .metadata_title()
        .unwrap_or_else(|| file_stem(path))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}
