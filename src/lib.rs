pub mod config;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod ner;
pub mod ranking;
pub mod scoring;
pub mod store;

pub use config::Config;
pub use error::{ExtractionError, ModelError, RankingError, ScoringError, StoreError, VocabularyError};
pub use ranking::{MatchResult, RankedBatch, RankingPipeline, ResumeDocument};
