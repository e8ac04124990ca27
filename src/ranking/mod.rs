use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::{LanguageModel, SimilarityEngine};
use crate::error::RankingError;
use crate::ner::{LexicalExtractor, QualificationVocabulary, SkillVocabulary};
use crate::scoring::{ScoreOutcome, ScoreWeights, Scorer};

/// A resume's display name (usually its file name) and extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub name: String,
    pub text: String,
}

impl ResumeDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub name: String,
    pub skills: Vec<String>,
    pub experience: u32,
    pub qualifications: Vec<String>,
    /// Raw weighted score, nominally in [0, 1].
    pub score: f64,
    /// `score` × 100, rounded to 2 decimals.
    pub match_score: f64,
}

impl MatchResult {
    fn from_outcome(name: &str, outcome: ScoreOutcome) -> Self {
        Self {
            name: name.to_string(),
            skills: outcome.skills.into_iter().collect(),
            experience: outcome.experience,
            qualifications: outcome.qualifications,
            score: outcome.score,
            match_score: display_score(outcome.score),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedBatch {
    pub job_id: Uuid,
    pub job_skills: Vec<String>,
    pub job_experience: u32,
    pub job_qualifications: Vec<String>,
    /// Sorted by `match_score`, descending; ties keep input order.
    pub candidates: Vec<MatchResult>,
    /// Resumes dropped because no text could be extracted.
    pub skipped: Vec<String>,
}

pub fn display_score(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

/// Extract the job profile once, score every resume against it, sort.
pub struct RankingPipeline {
    scorer: Scorer,
}

impl RankingPipeline {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    /// Wire extractor, similarity engine and scorer around one shared model.
    pub fn with_model(
        model: Arc<dyn LanguageModel>,
        skills: Arc<SkillVocabulary>,
        qualifications: Arc<QualificationVocabulary>,
        weights: ScoreWeights,
    ) -> Self {
        let extractor = LexicalExtractor::new(model.clone(), skills, qualifications);
        let similarity = SimilarityEngine::new(model);
        Self::new(Scorer::new(Arc::new(extractor), similarity, weights))
    }

    pub fn rank(
        &self,
        job_text: &str,
        resumes: &[ResumeDocument],
    ) -> Result<RankedBatch, RankingError> {
        if job_text.trim().is_empty() {
            return Err(RankingError::EmptyJobDescription);
        }

        let job = self.scorer.job_requirement(job_text);
        if job.skills.is_empty() {
            warn!("Rejecting batch: no skills identified in job description");
            return Err(RankingError::NoJobSkills);
        }
        info!(
            "Job requires {} skills and {} years experience; ranking {} resumes",
            job.skills.len(),
            job.experience,
            resumes.len()
        );

        let mut candidates = Vec::with_capacity(resumes.len());
        let mut skipped = Vec::new();

        for resume in resumes {
            if resume.text.trim().is_empty() {
                warn!("Could not extract text from {}. Skipping.", resume.name);
                skipped.push(resume.name.clone());
                continue;
            }

            let outcome = self.scorer.score(&job, &resume.text);
            candidates.push(MatchResult::from_outcome(&resume.name, outcome));
        }

        if candidates.is_empty() {
            return Err(RankingError::NoValidResumes);
        }

        // Stable: equal scores keep input order.
        candidates.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

        info!(
            "Ranked {} candidates ({} skipped)",
            candidates.len(),
            skipped.len()
        );

        Ok(RankedBatch {
            job_id: Uuid::new_v4(),
            job_skills: job.skills.into_iter().collect(),
            job_experience: job.experience,
            job_qualifications: job.qualifications,
            candidates,
            skipped,
        })
    }
}
