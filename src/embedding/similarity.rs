use std::sync::Arc;
use tracing::warn;

use super::LanguageModel;
use crate::error::ModelError;

/// Cosine similarity in [-1, 1]; 0.0 when either side is absent or zero-length.
pub fn cosine_similarity(a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };

    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Document vectors and their similarity, backed by the shared language model.
#[derive(Clone)]
pub struct SimilarityEngine {
    model: Arc<dyn LanguageModel>,
}

impl SimilarityEngine {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// One vector for the whole text, or `None` for empty text and
    /// degenerate (zero-norm) embeddings.
    pub fn document_vector(&self, text: &str) -> Result<Option<Vec<f32>>, ModelError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let embedding = self.model.embed(text)?;
        if embedding.is_degenerate() {
            return Ok(None);
        }
        Ok(Some(embedding.vector))
    }

    pub fn text_similarity(&self, a: &str, b: &str) -> Result<f64, ModelError> {
        let a = self.document_vector(a)?;
        let b = self.document_vector(b)?;
        Ok(cosine_similarity(a.as_deref(), b.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::StubModel;
    use crate::embedding::HashingLanguageModel;

    #[test]
    fn test_identical_vectors() {
        let a = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(Some(&a[..]), Some(&a[..])) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_and_opposite_vectors() {
        assert_eq!(cosine_similarity(Some(&[1.0, 0.0][..]), Some(&[0.0, 1.0][..])), 0.0);
        assert!((cosine_similarity(Some(&[1.0, 0.0][..]), Some(&[-2.0, 0.0][..])) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_absent_or_mismatched_vectors() {
        assert_eq!(cosine_similarity(None, Some(&[1.0][..])), 0.0);
        assert_eq!(cosine_similarity(Some(&[1.0][..]), None), 0.0);
        assert_eq!(cosine_similarity(Some(&[1.0, 0.0][..]), Some(&[1.0][..])), 0.0);
        assert_eq!(cosine_similarity(Some(&[0.0, 0.0][..]), Some(&[1.0, 0.0][..])), 0.0);
    }

    #[test]
    fn test_same_text_is_fully_similar() {
        let engine = SimilarityEngine::new(Arc::new(HashingLanguageModel::new(256)));
        let text = "Python developer with Django and PostgreSQL";
        assert!((engine.text_similarity(text, text).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_and_degenerate_texts_are_absent() {
        let engine = SimilarityEngine::new(Arc::new(StubModel::constant(vec![0.0, 0.0])));
        assert_eq!(engine.document_vector("").unwrap(), None);
        assert_eq!(engine.document_vector("anything").unwrap(), None);
        assert_eq!(engine.text_similarity("a", "b").unwrap(), 0.0);
    }

    #[test]
    fn test_model_failure_propagates() {
        let engine = SimilarityEngine::new(Arc::new(StubModel::failing()));
        assert!(engine.document_vector("text").is_err());
    }
}
