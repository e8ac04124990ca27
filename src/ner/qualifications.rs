use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info};

use super::{EntityLabel, LexicalExtractor};
use crate::error::ExtractionError;

/// Degree abbreviations and words, optionally followed by `in <field words>`.
static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:B\.Sc\.?|M\.Sc\.?|Ph\.D\.?|MBA|Bachelor|Master|Doctorate)\s*(?:in\s*[\w\s]+)?",
    )
    .unwrap()
});

impl LexicalExtractor {
    /// Extract qualifications from entity recognition and degree patterns.
    ///
    /// Entity hits come first, then pattern hits, each kept only if its exact
    /// text is not already present. "PhD" and "Ph.D." stay distinct.
    pub fn try_extract_qualifications(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
        let mut qualifications: Vec<String> = Vec::new();
        let mut push = |candidate: &str, source: &str| {
            if !qualifications.iter().any(|q| q == candidate) {
                info!("{} qualification extracted: {}", source, candidate);
                qualifications.push(candidate.to_string());
            }
        };

        let entities = self.model.entities(text)?;
        debug!(
            "Entities found: {:?}",
            entities
                .iter()
                .map(|e| (e.text.as_str(), e.label.to_string()))
                .collect::<Vec<_>>()
        );

        for entity in &entities {
            if matches!(entity.label, EntityLabel::Organization | EntityLabel::Product)
                && self.qualifications.matches(&entity.text)
            {
                push(&entity.text, "NER");
            }
        }

        for m in DEGREE_RE.find_iter(text) {
            let candidate = m.as_str().trim();
            if !candidate.is_empty() {
                push(candidate, "Token-based");
            }
        }

        if qualifications.is_empty() {
            info!("No qualifications extracted");
        }
        Ok(qualifications)
    }

    /// Fallback form of [`Self::try_extract_qualifications`]: `[]` on error.
    pub fn extract_qualifications(&self, text: &str) -> Vec<String> {
        self.try_extract_qualifications(text).unwrap_or_else(|e| {
            error!("Error extracting qualifications: {}", e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::StubModel;
    use crate::embedding::HashingLanguageModel;
    use crate::ner::{QualificationVocabulary, SkillVocabulary};
    use std::sync::Arc;

    fn extractor() -> LexicalExtractor {
        LexicalExtractor::new(
            Arc::new(HashingLanguageModel::new(64)),
            Arc::new(SkillVocabulary::new(["python"])),
            Arc::new(QualificationVocabulary::new([
                "university",
                "institute",
                "certified",
            ])),
        )
    }

    #[test]
    fn test_degree_patterns() {
        let quals = extractor().extract_qualifications("Holds an MBA. Ph.D. pending.");
        assert_eq!(quals, vec!["MBA", "Ph.D."]);
    }

    #[test]
    fn test_degree_with_field() {
        let quals = extractor().extract_qualifications("Bachelor in Computer Science, 2012");
        assert_eq!(quals, vec!["Bachelor in Computer Science"]);
    }

    #[test]
    fn test_entity_pass_precedes_pattern_pass() {
        let text = "B.Sc. from Stanford University; AWS Certified Solutions Architect";
        let quals = extractor().extract_qualifications(text);
        assert_eq!(
            quals,
            vec![
                "Stanford University",
                "AWS Certified Solutions Architect",
                "B.Sc.",
            ]
        );
    }

    #[test]
    fn test_exact_duplicates_collapse_but_variants_do_not() {
        let text = "Master. Master. Master in Data Science";
        let quals = extractor().extract_qualifications(text);
        assert_eq!(quals, vec!["Master", "Master in Data Science"]);
    }

    #[test]
    fn test_entities_without_keywords_are_ignored() {
        let quals = extractor().extract_qualifications("Worked at Acme Corp and Globex Inc");
        assert!(quals.is_empty());
    }

    #[test]
    fn test_entity_failure_falls_back_to_empty() {
        let extractor = LexicalExtractor::new(
            Arc::new(StubModel::failing()),
            Arc::new(SkillVocabulary::new(["python"])),
            Arc::new(QualificationVocabulary::new(["university"])),
        );

        assert!(extractor.try_extract_qualifications("MBA").is_err());
        assert!(extractor.extract_qualifications("MBA").is_empty());
    }
}
