use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::VocabularyError;

#[derive(Deserialize)]
struct SkillsFile {
    skills: Vec<String>,
}

#[derive(Deserialize)]
struct QualificationsFile {
    qualifications: Vec<String>,
}

/// Recognised skill keywords, always lowercase.
#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    skills: HashSet<String>,
}

/// Lowercase substrings that mark a named entity as a qualification.
#[derive(Debug, Clone, Default)]
pub struct QualificationVocabulary {
    keywords: Vec<String>,
}

fn normalize_entries<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, VocabularyError> {
    let raw = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| VocabularyError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl SkillVocabulary {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            skills: normalize_entries(skills).into_iter().collect(),
        }
    }

    /// Load `{"skills": [...]}` from disk.
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let file: SkillsFile = read_json(path)?;
        let vocabulary = Self::new(file.skills);
        if vocabulary.is_empty() {
            return Err(VocabularyError::Empty {
                path: path.to_path_buf(),
            });
        }
        info!("Loaded {} skills from {:?}", vocabulary.len(), path);
        Ok(vocabulary)
    }

    /// `token` must already be lowercase.
    pub fn contains(&self, token: &str) -> bool {
        self.skills.contains(token)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl QualificationVocabulary {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: normalize_entries(keywords),
        }
    }

    /// Load `{"qualifications": [...]}` from disk.
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let file: QualificationsFile = read_json(path)?;
        let vocabulary = Self::new(file.qualifications);
        if vocabulary.is_empty() {
            return Err(VocabularyError::Empty {
                path: path.to_path_buf(),
            });
        }
        info!(
            "Loaded {} qualification keywords from {:?}",
            vocabulary.len(),
            path
        );
        Ok(vocabulary)
    }

    /// Case-insensitive substring test against every keyword.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_entries_are_normalized() {
        let vocab = SkillVocabulary::new(["Python", " rust ", "", "PYTHON"]);
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("python"));
        assert!(vocab.contains("rust"));
        assert!(!vocab.contains("Python"));
    }

    #[test]
    fn test_qualification_matches_substring_case_insensitively() {
        let vocab = QualificationVocabulary::new(["University", "certified"]);
        assert!(vocab.matches("Stanford UNIVERSITY"));
        assert!(vocab.matches("AWS Certified Solutions Architect"));
        assert!(!vocab.matches("Acme Corp"));
    }

    #[test]
    fn test_load_skills_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.json");
        std::fs::write(&path, r#"{"skills": ["Python", "Docker"]}"#).unwrap();

        let vocab = SkillVocabulary::load(&path).unwrap();
        assert!(vocab.contains("python"));
        assert!(vocab.contains("docker"));
    }

    #[test]
    fn test_shipped_vocabularies_load() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let skills = SkillVocabulary::load(&data.join("skills.json")).unwrap();
        assert!(skills.contains("python"));
        assert!(skills.contains("c++"));

        let quals = QualificationVocabulary::load(&data.join("qualifications.json")).unwrap();
        assert!(quals.matches("Stanford University"));
    }

    #[test]
    fn test_load_rejects_empty_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, r#"{"qualifications": ["  "]}"#).unwrap();
        assert!(matches!(
            QualificationVocabulary::load(&empty),
            Err(VocabularyError::Empty { .. })
        ));

        let malformed = dir.path().join("bad.json");
        std::fs::write(&malformed, "{not json").unwrap();
        assert!(matches!(
            SkillVocabulary::load(&malformed),
            Err(VocabularyError::Parse { .. })
        ));

        assert!(matches!(
            SkillVocabulary::load(&dir.path().join("missing.json")),
            Err(VocabularyError::Io { .. })
        ));
    }
}
