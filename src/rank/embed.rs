//! Embedding seam: the opaque text-to-vector capability.
//!
//! Ranking only needs one operation from the model, so it is behind a small
//! trait. The production implementation wraps fastembed's ONNX runtime with a
//! local model artifact; tests substitute a deterministic fake.

use std::path::Path;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::{Error, Result};

/// The text-to-vector capability.
///
/// Implementations must be deterministic for identical input and safe for
/// concurrent read-only calls.
pub trait Embedder: Send + Sync {
    /// Embed a text into a fixed-dimension vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// fastembed-backed embedder (all-MiniLM-L6-v2, 384 dimensions).
///
/// Loaded once at process start; the inner model is shared read-only for the
/// process lifetime. With a populated cache directory no network access
/// happens at run time.
pub struct FastEmbedder {
    model: TextEmbedding,
}

impl FastEmbedder {
    /// Load the model, optionally from a specific cache directory.
    ///
    /// A missing or unreadable model artifact is `Error::ModelLoad`, which is
    /// fatal for ranking runs.
    pub fn load(cache_dir: Option<&Path>) -> Result<Self> {
        let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
            .with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir.to_path_buf());
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|e| Error::ModelLoad(e.to_string()))?;

        Ok(Self { model })
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self
            .model
            .embed(vec![text], None)
            .map_err(|e| Error::Embedding(e.to_string()))?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("empty embedding result".to_string()))
    }
}

/// Cosine similarity of two vectors, 0 for mismatched or zero-norm input.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
