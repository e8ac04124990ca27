use anyhow::{Context, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Ix2};
use ort::{inputs, GraphOptimizationLevel, Session};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::{Embedding, LanguageModel};
use crate::config::ModelsConfig;
use crate::error::ModelError;
use crate::ner::{Entity, EntityRecognizer};

const MAX_LENGTH: usize = 512;

/// Sentence-transformer exported to ONNX, with its HuggingFace tokenizer.
pub struct OnnxLanguageModel {
    session: Session,
    tokenizer: Tokenizer,
    recognizer: EntityRecognizer,
    model_name: String,
    dim: usize,
}

impl OnnxLanguageModel {
    pub fn new(config: &ModelsConfig) -> Result<Self> {
        let model_path = config.model_path();

        info!("Loading embedding model from {:?}", model_path);

        // Load ONNX model
        let model_file = model_path.join("model.onnx");
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .commit_from_file(&model_file)
            .context("Failed to load ONNX model")?;

        // Load tokenizer
        let tokenizer_file = model_path.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_file)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        // Determine embedding dimensions from model output
        let dim = session
            .outputs
            .first()
            .and_then(|o| o.output_type.tensor_dimensions())
            .and_then(|dims| dims.last().copied())
            .filter(|d| *d > 0)
            .unwrap_or(config.dimensions as i64) as usize;

        info!(
            "Embedding model loaded: {} (dim={})",
            config.embedding_model, dim
        );

        Ok(Self {
            session,
            tokenizer,
            recognizer: EntityRecognizer::new(),
            model_name: config.embedding_model.clone(),
            dim,
        })
    }

    /// Mean-pooled, L2-normalised embeddings, one per input text.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!("Embedding batch of {} texts", texts.len());

        // Tokenize all texts
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let batch_size = encodings.len();

        // Find max length in batch
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .clamp(1, MAX_LENGTH);

        // Prepare input tensors
        let mut input_ids = Array2::<i64>::zeros((batch_size, max_len));
        let mut attention_mask = Array2::<i64>::zeros((batch_size, max_len));
        let mut token_type_ids = Array2::<i64>::zeros((batch_size, max_len));

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let type_ids = encoding.get_type_ids();

            for j in 0..ids.len().min(max_len) {
                input_ids[[i, j]] = ids[j] as i64;
                attention_mask[[i, j]] = mask[j] as i64;
                token_type_ids[[i, j]] = type_ids[j] as i64;
            }
        }

        // Run inference
        let outputs = self.session.run(inputs![
            "input_ids" => input_ids.view(),
            "attention_mask" => attention_mask.view(),
            "token_type_ids" => token_type_ids.view(),
        ]?)?;

        // Pooled sentence embeddings when the export has them, token states otherwise
        if let Some(pooled) = outputs.get("sentence_embedding") {
            let pooled = pooled.try_extract_tensor::<f32>()?;
            let pooled = pooled.view().into_dimensionality::<Ix2>()?;
            return Ok(pooled
                .outer_iter()
                .map(|row| normalize(row.to_owned()))
                .collect());
        }

        let hidden = outputs
            .get("last_hidden_state")
            .ok_or_else(|| anyhow::anyhow!("No embedding output found"))?
            .try_extract_tensor::<f32>()?;
        let hidden = hidden.view();

        let mut result = Vec::with_capacity(batch_size);
        for i in 0..batch_size {
            let tokens = hidden
                .index_axis(Axis(0), i)
                .into_dimensionality::<Ix2>()
                .context("Unexpected hidden state shape")?;
            let pooled = mean_pooling(tokens, attention_mask.row(i));
            result.push(normalize(pooled));
        }

        Ok(result)
    }
}

impl LanguageModel for OnnxLanguageModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dim
    }

    fn entities(&self, text: &str) -> Result<Vec<Entity>, ModelError> {
        Ok(self.recognizer.recognize(text))
    }

    fn embed(&self, text: &str) -> Result<Embedding, ModelError> {
        self.embed_batch(&[text.to_string()])
            .map_err(|e| ModelError::Embedding(format!("{:#}", e)))?
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Embedding("No embedding generated".to_string()))
    }
}

/// Average of the token embeddings the attention mask keeps.
fn mean_pooling(token_embeddings: ArrayView2<f32>, attention_mask: ArrayView1<i64>) -> Array1<f32> {
    let mask = attention_mask.mapv(|x| x as f32);
    let count = mask.sum().max(1.0);
    let rows = token_embeddings.nrows().min(mask.len());

    let weighted = &token_embeddings.slice(ndarray::s![..rows, ..])
        * &mask.slice(ndarray::s![..rows]).insert_axis(Axis(1));
    weighted.sum_axis(Axis(0)) / count
}

/// Normalize to unit length, keeping the pre-normalisation norm.
fn normalize(pooled: Array1<f32>) -> Embedding {
    let raw = Embedding::new(pooled.to_vec());
    if raw.is_degenerate() {
        return raw;
    }
    Embedding {
        vector: raw.vector.iter().map(|x| x / raw.norm).collect(),
        norm: raw.norm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelBackend;
    use ndarray::array;

    #[test]
    fn test_normalize() {
        let embedding = normalize(array![3.0, 4.0]);
        assert!((embedding.vector[0] - 0.6).abs() < 0.001);
        assert!((embedding.vector[1] - 0.8).abs() < 0.001);
        assert!((embedding.norm - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_vector_is_degenerate() {
        assert!(normalize(array![0.0, 0.0]).is_degenerate());
    }

    #[test]
    fn test_mean_pooling_respects_mask() {
        let tokens = array![[1.0, 2.0], [3.0, 4.0], [100.0, 100.0]];
        let mask = array![1i64, 1, 0];
        let pooled = mean_pooling(tokens.view(), mask.view());
        assert_eq!(pooled, array![2.0, 3.0]);
    }

    #[test]
    fn test_model_creation_fails_without_model() {
        let config = ModelsConfig {
            backend: ModelBackend::Onnx,
            embedding_model: "nonexistent".to_string(),
            models_dir: "/nonexistent".to_string(),
            dimensions: 384,
            intra_threads: 1,
        };
        assert!(OnnxLanguageModel::new(&config).is_err());
    }
}
