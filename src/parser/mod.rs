//! PDF text run collection.

mod collector;
mod options;

pub use collector::RunCollector;
pub use options::{ErrorMode, ParseOptions};
