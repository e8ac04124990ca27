use serde::Deserialize;
use std::path::Path;

use crate::scoring::ScoreWeights;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub models: ModelsConfig,
    pub vocabulary: VocabularyConfig,
    pub scoring: ScoringConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    Hash,
    Onnx,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub backend: ModelBackend,
    pub embedding_model: String,
    pub models_dir: String,
    pub dimensions: usize,
    pub intra_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyConfig {
    pub skills_path: String,
    pub qualifications_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub text_similarity_weight: f64,
    pub skill_weight: f64,
    pub experience_weight: f64,
    pub qualification_weight: f64,
    pub missing_skills_penalty: f64,
    pub missing_qualifications_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub allowed_extensions: Vec<String>,
}

impl Config {
    /// Defaults, then the optional config file, then `MATCHER__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        // Load .env file
        let _ = dotenvy::dotenv();

        Self::load_with(path, Self::environment())
    }

    /// `MATCHER__SECTION__KEY` variables; `upload.allowed_extensions` splits on commas.
    fn environment() -> config::Environment {
        config::Environment::default()
            .separator("__")
            .prefix("MATCHER")
            .list_separator(",")
            .with_list_parse_key("upload.allowed_extensions")
            .try_parsing(true)
    }

    fn load_with(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            // Set defaults
            .set_default("models.backend", "hash")?
            .set_default("models.embedding_model", "all-MiniLM-L6-v2")?
            .set_default("models.models_dir", "./models")?
            .set_default("models.dimensions", 384)?
            .set_default("models.intra_threads", 4)?
            .set_default("vocabulary.skills_path", "data/skills.json")?
            .set_default("vocabulary.qualifications_path", "data/qualifications.json")?
            .set_default("scoring.text_similarity_weight", 0.4)?
            .set_default("scoring.skill_weight", 0.3)?
            .set_default("scoring.experience_weight", 0.2)?
            .set_default("scoring.qualification_weight", 0.1)?
            .set_default("scoring.missing_skills_penalty", 0.5)?
            .set_default("scoring.missing_qualifications_score", 0.5)?
            .set_default("storage.data_dir", "./data/results")?
            .set_default("upload.allowed_extensions", vec!["txt", "pdf", "docx"])?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config: Config = builder
            // Load from environment
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let weights = self.scoring.weights();
        if (weights.sum() - 1.0).abs() > 1e-6 {
            return Err(config::ConfigError::Message(format!(
                "scoring weights must sum to 1.0, got {:.4}",
                weights.sum()
            )));
        }
        if self.models.backend == ModelBackend::Hash && self.models.dimensions == 0 {
            return Err(config::ConfigError::Message(
                "models.dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            text_similarity: self.text_similarity_weight,
            skills: self.skill_weight,
            experience: self.experience_weight,
            qualifications: self.qualification_weight,
            missing_skills_penalty: self.missing_skills_penalty,
            missing_qualifications_score: self.missing_qualifications_score,
        }
    }
}

impl ModelsConfig {
    pub fn model_path(&self) -> std::path::PathBuf {
        Path::new(&self.models_dir).join(&self.embedding_model)
    }
}
