use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info, warn};

use super::{LexicalExtractor, SkillSet};
use crate::error::ExtractionError;

/// `<digits> year(s) [of] [experience]`, case-insensitive, ASCII digits only.
static EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(?:year|years)\s*(?:of\s*)?(?:experience)?").unwrap()
});

impl LexicalExtractor {
    /// Extract skills and years of experience from text.
    pub fn try_extract_skills_experience(
        &self,
        text: &str,
    ) -> Result<(SkillSet, u32), ExtractionError> {
        debug!("Extracting skills from text ({} chars)", text.len());

        let tokens = self.model.tokenize(text)?;
        let skills = self.match_skills(&tokens);
        let experience = extract_experience(text);

        info!(
            "Extracted {} skills and {} years experience",
            skills.len(),
            experience
        );
        Ok((skills, experience))
    }

    /// Fallback form of [`Self::try_extract_skills_experience`]: `({}, 0)` on error.
    pub fn extract_skills_experience(&self, text: &str) -> (SkillSet, u32) {
        self.try_extract_skills_experience(text)
            .unwrap_or_else(|e| {
                error!("Error extracting skills/experience: {}", e);
                (SkillSet::new(), 0)
            })
    }

    /// Whole-token, case-insensitive vocabulary lookup.
    ///
    /// Slash or hyphen compounds are tried joined (`ci/cd`, `scikit-learn`)
    /// and as their separate words (`Python/Django`, `Docker-based`).
    fn match_skills(&self, tokens: &[String]) -> SkillSet {
        tokens
            .iter()
            .map(|t| t.to_lowercase())
            .flat_map(|token| {
                let mut candidates = vec![token.clone()];
                if token.contains(is_compound_separator) {
                    candidates.extend(
                        token
                            .split(is_compound_separator)
                            .filter(|part| !part.is_empty())
                            .map(str::to_string),
                    );
                }
                candidates
            })
            .filter(|t| self.skills.contains(t))
            .collect()
    }
}

fn is_compound_separator(c: char) -> bool {
    c == '/' || c == '-'
}

/// Largest number in any "N years (of) experience" phrase, or 0.
pub fn extract_experience(text: &str) -> u32 {
    EXPERIENCE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let digits = caps.get(1)?.as_str();
            match digits.parse::<u32>() {
                Ok(years) => Some(years),
                Err(_) => {
                    warn!("Ignoring experience figure too large for u32: {}", digits);
                    None
                }
            }
        })
        .max()
        .unwrap_or(0)
}
