use super::{Embedding, LanguageModel};
use crate::error::ModelError;
use crate::ner::{Entity, EntityRecognizer};

/// Test double: every text embeds to the same fixed vector, or calls fail.
pub(crate) struct StubModel {
    vector: Vec<f32>,
    fail: bool,
    fail_embed_on: Option<&'static str>,
}

impl StubModel {
    pub(crate) fn constant(vector: Vec<f32>) -> Self {
        Self {
            vector,
            fail: false,
            fail_embed_on: None,
        }
    }

    /// Embedding fails for any text containing `marker`; everything else works.
    pub(crate) fn failing_embed_on(vector: Vec<f32>, marker: &'static str) -> Self {
        Self {
            vector,
            fail: false,
            fail_embed_on: Some(marker),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            vector: vec![1.0],
            fail: true,
            fail_embed_on: None,
        }
    }
}

impl LanguageModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    fn dimensions(&self) -> usize {
        self.vector.len()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, ModelError> {
        if self.fail {
            return Err(ModelError::Tokenization("stub failure".to_string()));
        }
        Ok(crate::ner::tokenize_words(text))
    }

    fn entities(&self, text: &str) -> Result<Vec<Entity>, ModelError> {
        if self.fail {
            return Err(ModelError::EntityRecognition("stub failure".to_string()));
        }
        Ok(EntityRecognizer::new().recognize(text))
    }

    fn embed(&self, text: &str) -> Result<Embedding, ModelError> {
        if self.fail || self.fail_embed_on.is_some_and(|m| text.contains(m)) {
            return Err(ModelError::Embedding("stub failure".to_string()));
        }
        Ok(Embedding::new(self.vector.clone()))
    }
}
