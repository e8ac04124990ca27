use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use super::{CandidateStore, StoredBatch};
use crate::error::StoreError;
use crate::ranking::{MatchResult, RankedBatch};

/// One pretty-printed JSON document per job under `data_dir`.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn batch_path(&self, job_id: &Uuid) -> PathBuf {
        self.data_dir.join(format!("{}.json", job_id))
    }

    pub async fn load_batch(&self, job_id: &Uuid) -> Result<Option<StoredBatch>, StoreError> {
        let path = self.batch_path(job_id);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }
}

#[async_trait]
impl CandidateStore for JsonFileStore {
    async fn store_batch(&self, batch: &RankedBatch) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let stored = StoredBatch::from(batch);
        let json = serde_json::to_vec_pretty(&stored)?;

        // Write then rename so readers never see a partial file
        let path = self.batch_path(&batch.job_id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        info!(
            "Stored {} candidates for job_id: {} at {:?}",
            batch.candidates.len(),
            batch.job_id,
            path
        );
        Ok(())
    }

    async fn candidates_for_job(&self, job_id: &Uuid) -> Result<Vec<MatchResult>, StoreError> {
        let candidates = self
            .load_batch(job_id)
            .await?
            .map(|b| b.candidates)
            .unwrap_or_default();
        info!(
            "Retrieved {} candidates for job_id: {}",
            candidates.len(),
            job_id
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> RankedBatch {
        RankedBatch {
            job_id: Uuid::new_v4(),
            job_skills: vec!["python".to_string(), "rust".to_string()],
            job_experience: 5,
            job_qualifications: Vec::new(),
            candidates: vec![
                MatchResult {
                    name: "bob.pdf".to_string(),
                    skills: vec!["python".to_string(), "rust".to_string()],
                    experience: 6,
                    qualifications: vec!["Master in Computer Science".to_string()],
                    score: 0.9,
                    match_score: 90.0,
                },
                MatchResult {
                    name: "carol.txt".to_string(),
                    skills: vec![],
                    experience: 0,
                    qualifications: vec![],
                    score: 0.05,
                    match_score: 5.0,
                },
            ],
            skipped: vec!["empty.pdf".to_string()],
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("results"));
        let batch = batch();

        store.store_batch(&batch).await.unwrap();

        let reopened = JsonFileStore::new(dir.path().join("results"));
        let candidates = reopened.candidates_for_job(&batch.job_id).await.unwrap();
        assert_eq!(candidates, batch.candidates);

        let stored = reopened.load_batch(&batch.job_id).await.unwrap().unwrap();
        assert_eq!(stored.job_skills, batch.job_skills);
        assert_eq!(stored.job_experience, 5);
    }

    #[tokio::test]
    async fn test_unknown_job_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store
            .candidates_for_job(&Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let job_id = Uuid::new_v4();
        std::fs::write(dir.path().join(format!("{}.json", job_id)), "{").unwrap();

        assert!(matches!(
            store.candidates_for_job(&job_id).await,
            Err(StoreError::Serde(_))
        ));
    }
}
