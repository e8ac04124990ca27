use super::ScoreBreakdown;

/// Default weighting: semantic similarity dominates, qualifications only nudge.
pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
    text_similarity: 0.4,
    skills: 0.3,
    experience: 0.2,
    qualifications: 0.1,
    missing_skills_penalty: 0.5,
    missing_qualifications_score: 0.5,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub text_similarity: f64,
    pub skills: f64,
    pub experience: f64,
    pub qualifications: f64,
    /// Multiplier on skill overlap when the resume yields no skills.
    pub missing_skills_penalty: f64,
    /// Qualification sub-score when the resume yields no qualifications.
    pub missing_qualifications_score: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.text_similarity + self.skills + self.experience + self.qualifications
    }

    /// Weighted sum of the sub-scores. Not clamped.
    pub fn combine(&self, breakdown: &ScoreBreakdown) -> f64 {
        self.text_similarity * breakdown.text_similarity
            + self.skills * breakdown.skill_overlap
            + self.experience * breakdown.experience
            + self.qualifications * breakdown.qualifications
    }
}
