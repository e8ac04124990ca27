use std::path::PathBuf;
use thiserror::Error;

/// Failures of the language-model capability (tokenize, entities, embed).
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    #[error("Entity recognition failed: {0}")]
    EntityRecognition(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),
}

/// Failures inside the lexical extractor.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Failures inside the scorer.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Match score is not finite: {0}")]
    NonFinite(f64),
}

/// Batch-level outcomes that reject a whole ranking request.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Could not extract text from job description.")]
    EmptyJobDescription,

    #[error("No skills identified in job description. Please include specific skills.")]
    NoJobSkills,

    #[error("No valid resumes processed.")]
    NoValidResumes,
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse vocabulary {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Vocabulary {path:?} has no entries")]
    Empty { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Candidate store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Candidate store serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
