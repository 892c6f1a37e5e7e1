//! Outline extraction: font clustering, content classification, assembly.

mod assemble;
mod classify;
mod fonts;

pub use assemble::{OutlineAssembler, PlacedHeading};
pub use classify::{Assessment, ClassifierConfig, HeadingClassifier};
pub use fonts::{FontCluster, FontClusterAnalyzer, FontHierarchy};
