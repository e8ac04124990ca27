use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Entity label, mirroring the coarse NER tag set the qualification pass filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityLabel {
    Organization,
    Product,
    Other,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Organization => write!(f, "ORG"),
            EntityLabel::Product => write!(f, "PRODUCT"),
            EntityLabel::Other => write!(f, "MISC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

const CONNECTORS: &[&str] = &["of", "in", "and", "for", "&"];

const ORG_MARKERS: &[&str] = &[
    "university", "college", "institute", "school", "academy", "polytechnic",
    "faculty", "board", "council", "association", "society", "foundation",
    "inc", "corp", "corporation", "ltd", "llc", "gmbh", "company", "group",
];

/// Rule-based recognizer: maximal runs of capitalised words on one line.
///
/// Runs may contain the lowercase connectors `of`, `in`, `and`, `for` and `&`
/// but never end with one.
#[derive(Debug, Clone, Default)]
pub struct EntityRecognizer;

struct Word<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

impl EntityRecognizer {
    pub fn new() -> Self {
        Self
    }

    pub fn recognize(&self, text: &str) -> Vec<Entity> {
        static WORD_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"[A-Za-z0-9&][A-Za-z0-9&.'\-]*").unwrap());

        let words: Vec<Word<'_>> = WORD_RE
            .find_iter(text)
            .map(|m| {
                let trimmed = m.as_str().trim_end_matches(['.', '\'', '-']);
                Word {
                    start: m.start(),
                    end: m.start() + trimmed.len(),
                    text: trimmed,
                }
            })
            .filter(|w| !w.text.is_empty())
            .collect();

        let mut entities = Vec::new();
        let mut span: Vec<&Word<'_>> = Vec::new();

        for word in &words {
            if let Some(last) = span.last() {
                if !joined_by_spaces(&text[last.end..word.start]) {
                    flush(text, &mut span, &mut entities);
                }
            }

            if is_capitalized(word.text) {
                span.push(word);
            } else if !span.is_empty() && CONNECTORS.contains(&word.text) {
                span.push(word);
            } else {
                flush(text, &mut span, &mut entities);
            }
        }
        flush(text, &mut span, &mut entities);

        entities
    }
}

fn joined_by_spaces(gap: &str) -> bool {
    !gap.is_empty() && gap.chars().all(|c| c == ' ' || c == '\t')
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn is_acronym(word: &str) -> bool {
    word.chars().filter(|c| c.is_ascii_uppercase()).count() >= 2
        && !word.chars().any(|c| c.is_ascii_lowercase())
}

fn flush(text: &str, span: &mut Vec<&Word<'_>>, entities: &mut Vec<Entity>) {
    while span.last().is_some_and(|w| CONNECTORS.contains(&w.text)) {
        span.pop();
    }

    if let (Some(first), Some(last)) = (span.first(), span.last()) {
        let label = label_for(span);
        entities.push(Entity {
            text: text[first.start..last.end].to_string(),
            label,
        });
    }
    span.clear();
}

fn label_for(span: &[&Word<'_>]) -> EntityLabel {
    let is_org = span
        .iter()
        .any(|w| ORG_MARKERS.contains(&w.text.to_lowercase().trim_end_matches('.')));
    if is_org {
        return EntityLabel::Organization;
    }

    let is_product = span
        .iter()
        .any(|w| is_acronym(w.text) || w.text.chars().any(|c| c.is_ascii_digit()));
    if is_product {
        EntityLabel::Product
    } else {
        EntityLabel::Other
    }
}
