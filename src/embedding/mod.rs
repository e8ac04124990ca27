mod hashing;
mod model;
mod similarity;
#[cfg(test)]
pub(crate) mod testing;

pub use hashing::HashingLanguageModel;
pub use model::OnnxLanguageModel;
pub use similarity::{cosine_similarity, SimilarityEngine};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::{ModelBackend, ModelsConfig};
use crate::error::ModelError;
use crate::ner::{tokenize_words, Entity};

/// A document-level embedding and its L2 norm before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub norm: f32,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        Self { vector, norm }
    }

    /// Zero-norm embeddings carry no semantic signal.
    pub fn is_degenerate(&self) -> bool {
        self.norm == 0.0 || !self.norm.is_finite()
    }
}

/// The natural-language capability the extractor and similarity engine depend on.
///
/// Loaded once per process and shared read-only behind an `Arc`.
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    fn dimensions(&self) -> usize;

    fn tokenize(&self, text: &str) -> Result<Vec<String>, ModelError> {
        Ok(tokenize_words(text))
    }

    fn entities(&self, text: &str) -> Result<Vec<Entity>, ModelError>;

    fn embed(&self, text: &str) -> Result<Embedding, ModelError>;
}

/// Build the configured language model backend.
pub fn load_language_model(config: &ModelsConfig) -> Result<Arc<dyn LanguageModel>> {
    let model: Arc<dyn LanguageModel> = match config.backend {
        ModelBackend::Hash => Arc::new(HashingLanguageModel::new(config.dimensions)),
        ModelBackend::Onnx => Arc::new(
            OnnxLanguageModel::new(config).context("Failed to load ONNX embedding model")?,
        ),
    };

    info!(
        "Language model ready: {} (dim={})",
        model.name(),
        model.dimensions()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_norm() {
        let embedding = Embedding::new(vec![3.0, 4.0]);
        assert!((embedding.norm - 5.0).abs() < 1e-6);
        assert!(!embedding.is_degenerate());
        assert!(Embedding::new(vec![0.0; 8]).is_degenerate());
    }

    #[test]
    fn test_load_hash_backend() {
        let config = ModelsConfig {
            backend: ModelBackend::Hash,
            embedding_model: "unused".to_string(),
            models_dir: "/nonexistent".to_string(),
            dimensions: 128,
            intra_threads: 1,
        };
        let model = load_language_model(&config).unwrap();
        assert_eq!(model.dimensions(), 128);
        assert_eq!(model.name(), "hash");
    }

    #[test]
    fn test_load_onnx_backend_fails_without_model() {
        let config = ModelsConfig {
            backend: ModelBackend::Onnx,
            embedding_model: "nonexistent".to_string(),
            models_dir: "/nonexistent".to_string(),
            dimensions: 384,
            intra_threads: 1,
        };
        assert!(load_language_model(&config).is_err());
    }
}
