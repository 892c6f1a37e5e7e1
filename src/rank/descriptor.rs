//! The ranking run descriptor: persona, job-to-be-done, document list.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Input descriptor for a ranking run.
///
/// `persona` and `job_to_be_done` are plain strings, though the nested
/// `{"role": ...}` / `{"task": ...}` shapes some collections use are accepted
/// too. An optional `documents` list restricts which PDFs are processed.
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    pub persona: QueryField,
    pub job_to_be_done: QueryField,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

impl Descriptor {
    /// The persona text.
    pub fn persona_text(&self) -> &str {
        self.persona.text()
    }

    /// The job-to-be-done text.
    pub fn job_text(&self) -> &str {
        self.job_to_be_done.text()
    }

    /// Filenames listed in the descriptor, empty when unrestricted.
    pub fn document_names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }

    /// Validate the descriptor fields.
    pub fn validate(&self) -> Result<()> {
        if self.persona_text().trim().is_empty() {
            return Err(Error::Config("persona must not be empty".to_string()));
        }
        if self.job_text().trim().is_empty() {
            return Err(Error::Config("job_to_be_done must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A persona or job field: a plain string or the nested object form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QueryField {
    Text(String),
    Role { role: String },
    Task { task: String },
}

impl QueryField {
    pub fn text(&self) -> &str {
        match self {
            QueryField::Text(s) => s,
            QueryField::Role { role } => role,
            QueryField::Task { task } => task,
        }
    }
}

/// A document entry in the descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Load and validate a descriptor file.
///
/// Any failure here is a configuration error: the run aborts before any
/// document is processed.
pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<Descriptor> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let descriptor: Descriptor = serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("malformed descriptor {}: {}", path.display(), e)))?;
    descriptor.validate()?;
    Ok(descriptor)
}
