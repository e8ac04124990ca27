mod weights;

pub use weights::{ScoreWeights, DEFAULT_WEIGHTS};

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::embedding::{cosine_similarity, SimilarityEngine};
use crate::error::ScoringError;
use crate::ner::{LexicalExtractor, SkillSet};

/// Structured profile of the job description, extracted once per batch.
#[derive(Debug, Clone)]
pub struct JobRequirement {
    pub skills: SkillSet,
    pub experience: u32,
    /// Reported with the ranked batch; scoring reads only the resume's qualifications.
    pub qualifications: Vec<String>,
    pub semantic_vector: Option<Vec<f32>>,
}

/// Per-signal sub-scores, each nominally in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub text_similarity: f64,
    pub skill_overlap: f64,
    pub experience: f64,
    pub qualifications: f64,
}

/// Raw score and the resume's own extracted signals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreOutcome {
    pub score: f64,
    pub skills: SkillSet,
    pub experience: u32,
    pub qualifications: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Weighted combination of semantic similarity, skill overlap,
/// experience proximity and qualification presence.
pub struct Scorer {
    extractor: Arc<LexicalExtractor>,
    similarity: SimilarityEngine,
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(
        extractor: Arc<LexicalExtractor>,
        similarity: SimilarityEngine,
        weights: ScoreWeights,
    ) -> Self {
        Self {
            extractor,
            similarity,
            weights,
        }
    }

    pub fn extractor(&self) -> &LexicalExtractor {
        &self.extractor
    }

    /// Extract the job profile. Degenerate or failed embeddings leave the vector absent.
    pub fn job_requirement(&self, job_text: &str) -> JobRequirement {
        let (skills, experience) = self.extractor.extract_skills_experience(job_text);
        let qualifications = self.extractor.extract_qualifications(job_text);
        let semantic_vector = self
            .similarity
            .document_vector(job_text)
            .unwrap_or_else(|e| {
                error!("Error embedding job description: {}", e);
                None
            });

        JobRequirement {
            skills,
            experience,
            qualifications,
            semantic_vector,
        }
    }

    /// Score a resume against job text and previously extracted job skills/experience.
    pub fn calculate_match_score(
        &self,
        job_text: &str,
        resume_text: &str,
        job_skills: &SkillSet,
        job_experience: u32,
    ) -> ScoreOutcome {
        let outcome = self
            .similarity
            .document_vector(job_text)
            .map_err(ScoringError::from)
            .and_then(|semantic_vector| {
                let job = JobRequirement {
                    skills: job_skills.clone(),
                    experience: job_experience,
                    qualifications: Vec::new(),
                    semantic_vector,
                };
                self.try_score(&job, resume_text)
            });
        self.or_zero(outcome)
    }

    /// Fallback form of [`Self::try_score`]: `(0.0, {}, 0, [])` on error.
    pub fn score(&self, job: &JobRequirement, resume_text: &str) -> ScoreOutcome {
        self.or_zero(self.try_score(job, resume_text))
    }

    pub fn try_score(
        &self,
        job: &JobRequirement,
        resume_text: &str,
    ) -> Result<ScoreOutcome, ScoringError> {
        let (skills, experience) = self.extractor.extract_skills_experience(resume_text);
        let qualifications = self.extractor.extract_qualifications(resume_text);

        let resume_vector = self.similarity.document_vector(resume_text)?;
        let breakdown = ScoreBreakdown {
            text_similarity: cosine_similarity(
                job.semantic_vector.as_deref(),
                resume_vector.as_deref(),
            ),
            skill_overlap: self.skill_overlap(&job.skills, &skills),
            experience: experience_score(job.experience, experience),
            qualifications: self.qualification_score(&qualifications),
        };
        debug!("Score breakdown: {:?}", breakdown);

        let score = self.weights.combine(&breakdown);
        if !score.is_finite() {
            return Err(ScoringError::NonFinite(score));
        }

        info!("Calculated match score: {:.4}", score);
        Ok(ScoreOutcome {
            score,
            skills,
            experience,
            qualifications,
            breakdown,
        })
    }

    /// `|job ∩ resume| / max(|job|, 1)`, halved when the resume yields no skills at all.
    fn skill_overlap(&self, job_skills: &SkillSet, resume_skills: &SkillSet) -> f64 {
        let shared = job_skills.intersection(resume_skills).count();
        let overlap = shared as f64 / job_skills.len().max(1) as f64;
        if resume_skills.is_empty() {
            overlap * self.weights.missing_skills_penalty
        } else {
            overlap
        }
    }

    fn qualification_score(&self, qualifications: &[String]) -> f64 {
        if qualifications.is_empty() {
            self.weights.missing_qualifications_score
        } else {
            1.0
        }
    }

    fn or_zero(&self, outcome: Result<ScoreOutcome, ScoringError>) -> ScoreOutcome {
        outcome.unwrap_or_else(|e| {
            error!("Error calculating match score: {}", e);
            ScoreOutcome::default()
        })
    }
}

/// `max(0, 1 - |job - resume| / max(job, 1))`.
///
/// A job that states no experience (0) still penalises any stated resume
/// experience, since the difference is divided by 1.
pub fn experience_score(job_experience: u32, resume_experience: u32) -> f64 {
    let diff = job_experience.abs_diff(resume_experience) as f64;
    (1.0 - diff / job_experience.max(1) as f64).max(0.0)
}
