mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::ranking::{MatchResult, RankedBatch};

/// A ranked batch as persisted, keyed by job id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBatch {
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_skills: Vec<String>,
    pub job_experience: u32,
    pub candidates: Vec<MatchResult>,
}

impl From<&RankedBatch> for StoredBatch {
    fn from(batch: &RankedBatch) -> Self {
        Self {
            job_id: batch.job_id,
            created_at: Utc::now(),
            job_skills: batch.job_skills.clone(),
            job_experience: batch.job_experience,
            candidates: batch.candidates.clone(),
        }
    }
}

/// Keyed record store holding candidate results per job.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn store_batch(&self, batch: &RankedBatch) -> Result<(), StoreError>;

    /// Stored candidates for `job_id`, empty when the job is unknown.
    async fn candidates_for_job(&self, job_id: &Uuid) -> Result<Vec<MatchResult>, StoreError>;
}
