//! Output records and JSON rendering.

mod json;

pub use json::{
    to_json, AnalysisMetadata, AnalysisRecord, JsonFormat, RankedSectionRecord, SnippetRecord,
};
