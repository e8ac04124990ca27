mod entities;
mod qualifications;
mod skills;
mod vocabulary;

pub use entities::{Entity, EntityLabel, EntityRecognizer};
pub use skills::extract_experience;
pub use vocabulary::{QualificationVocabulary, SkillVocabulary};

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::embedding::LanguageModel;

/// Lowercase skill keywords found in a text, drawn from the skill vocabulary.
pub type SkillSet = BTreeSet<String>;

/// Split text into word-like tokens, keeping `c++`, `c#`, `node.js` and `ci/cd` whole.
pub fn tokenize_words(text: &str) -> Vec<String> {
    static WORD_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[\w#+]+(?:[./\-][\w#+]+)*").unwrap());

    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Pulls skills, years of experience and qualifications out of free text.
///
/// Each extraction has a `try_*` form that reports failures and a plain form
/// that applies the fallback policy: log the error and return an empty result,
/// so a single bad document never aborts a batch.
pub struct LexicalExtractor {
    model: Arc<dyn LanguageModel>,
    skills: Arc<SkillVocabulary>,
    qualifications: Arc<QualificationVocabulary>,
}

impl LexicalExtractor {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        skills: Arc<SkillVocabulary>,
        qualifications: Arc<QualificationVocabulary>,
    ) -> Self {
        Self {
            model,
            skills,
            qualifications,
        }
    }

    pub fn skill_vocabulary(&self) -> &SkillVocabulary {
        &self.skills
    }
}
