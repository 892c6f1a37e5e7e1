//! Outline types: heading levels, headings, and the per-document outline.

use serde::{Deserialize, Serialize};

/// Structural rank of a line of text.
///
/// `Title` is the one distinguished largest-and-earliest line; `None` marks
/// body text. Only `H1`..`H3` appear in serialized outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    #[serde(rename = "TITLE")]
    Title,
    H1,
    H2,
    H3,
    #[serde(rename = "NONE")]
    None,
}

impl HeadingLevel {
    /// Heading level for a font-cluster rank (0 = largest cluster).
    pub fn from_cluster_rank(rank: usize) -> HeadingLevel {
        match rank {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            2 => HeadingLevel::H3,
            _ => HeadingLevel::None,
        }
    }

    /// Structural depth: smaller is coarser. `Title` is 0, `None` is deepest.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::Title => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::None => u8::MAX,
        }
    }

    /// Whether this is one of the serializable outline levels.
    pub fn is_outline_level(self) -> bool {
        matches!(self, HeadingLevel::H1 | HeadingLevel::H2 | HeadingLevel::H3)
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HeadingLevel::Title => "TITLE",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::None => "NONE",
        };
        write!(f, "{}", label)
    }
}

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl Heading {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The assembled outline of one document.
///
/// Serializes directly to the output contract:
/// `{"title": ..., "outline": [{"level","text","page"}, ...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub outline: Vec<Heading>,
}

impl Outline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outline.len()
    }
}
