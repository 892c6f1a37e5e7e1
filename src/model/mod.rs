//! Data model for the extraction and ranking pipeline.
//!
//! These types bridge the stages: the collector produces [`TextRun`]s, the
//! outline stage turns them into an [`Outline`], the ranking stage cuts
//! [`Section`]s at heading boundaries and scores them.

mod outline;
mod run;
mod section;

pub use outline::{Heading, HeadingLevel, Outline};
pub use run::{group_runs_into_lines, TextLine, TextRun};
pub use section::{ScoredSection, Section, SentenceCluster};

pub(crate) use run::is_spaceless_script_char;
