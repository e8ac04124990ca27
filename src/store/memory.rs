use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use super::{CandidateStore, StoredBatch};
use crate::error::StoreError;
use crate::ranking::{MatchResult, RankedBatch};

/// Process-local store; contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    batches: DashMap<Uuid, StoredBatch>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn store_batch(&self, batch: &RankedBatch) -> Result<(), StoreError> {
        self.batches.insert(batch.job_id, StoredBatch::from(batch));
        info!(
            "Stored {} candidates for job_id: {}",
            batch.candidates.len(),
            batch.job_id
        );
        Ok(())
    }

    async fn candidates_for_job(&self, job_id: &Uuid) -> Result<Vec<MatchResult>, StoreError> {
        let candidates = self
            .batches
            .get(job_id)
            .map(|b| b.candidates.clone())
            .unwrap_or_default();
        info!(
            "Retrieved {} candidates for job_id: {}",
            candidates.len(),
            job_id
        );
        Ok(candidates)
    }
}
