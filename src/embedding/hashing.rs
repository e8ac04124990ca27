use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};

use super::{Embedding, LanguageModel};
use crate::error::ModelError;
use crate::ner::{tokenize_words, Entity, EntityRecognizer};

// Changing either seed changes every embedding.
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Deterministic feature-hashing model. Needs no model files.
///
/// Lowercased word tokens are hashed into a fixed number of buckets with a
/// signed hash, then L2-normalised. Identical texts embed identically.
pub struct HashingLanguageModel {
    dim: usize,
    recognizer: EntityRecognizer,
}

impl HashingLanguageModel {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dim: dimensions.max(1),
            recognizer: EntityRecognizer::new(),
        }
    }

    fn hash(token: &str, salt: u8) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        salt.hash(&mut hasher);
        hasher.finish()
    }
}

impl LanguageModel for HashingLanguageModel {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimensions(&self) -> usize {
        self.dim
    }

    fn entities(&self, text: &str) -> Result<Vec<Entity>, ModelError> {
        Ok(self.recognizer.recognize(text))
    }

    fn embed(&self, text: &str) -> Result<Embedding, ModelError> {
        let mut vector = vec![0.0f32; self.dim];

        for token in tokenize_words(text) {
            let token = token.to_lowercase();
            let idx = (Self::hash(&token, 0) % self.dim as u64) as usize;
            let sign = if Self::hash(&token, 1) % 2 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let raw = Embedding::new(vector);
        if raw.is_degenerate() {
            return Ok(raw);
        }

        let vector = raw.vector.iter().map(|x| x / raw.norm).collect();
        Ok(Embedding {
            vector,
            norm: raw.norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_deterministic_and_normalized() {
        let model = HashingLanguageModel::new(64);
        let a = model.embed("Senior Rust engineer").unwrap();
        let b = model.embed("senior rust ENGINEER").unwrap();

        assert_eq!(a.vector, b.vector);
        let unit: f32 = a.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((unit - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_degenerate() {
        let model = HashingLanguageModel::new(64);
        assert!(model.embed("").unwrap().is_degenerate());
        assert!(model.embed("  ,;  ").unwrap().is_degenerate());
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        assert_eq!(HashingLanguageModel::new(0).dimensions(), 1);
    }
}
