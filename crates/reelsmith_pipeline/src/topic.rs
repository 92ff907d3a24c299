//! Main-topic detection for image queries.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static PHRASE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)facts about the ([\w\s]+)!",
        r"(?i)about the ([\w\s]+)!",
        r"(?im)^--- ([\w\s]+)!",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Valid topic phrase regex"))
    .collect()
});

static CAPITALISED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("Valid capitalised word regex"));

const STOP_WORDS: &[&str] = &["the", "and", "that", "this", "with", "from"];

/// Maps keywords found in the narration to a canonical topic.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::TopicRule;
///
/// let rule = TopicRule::new(["hyundai", "genesis"], "Hyundai Genesis");
/// assert!(rule.matches("the new genesis g80"));
/// assert!(!rule.matches("a sports car"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TopicRule {
    /// Lower-case keywords, any of which selects the topic
    keywords: Vec<String>,
    /// Topic reported when a keyword matches
    topic: String,
}

impl TopicRule {
    /// Create a rule.
    pub fn new<I, S>(keywords: I, topic: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
            topic: topic.into(),
        }
    }

    /// True when any keyword occurs in `text` (case-insensitive).
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Guess what a narration is about.
///
/// Tries the keyword table, then phrases like "facts about the X!", then the
/// most frequent capitalised word (first seen wins ties).
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::detect_main_topic;
///
/// let text = "Here are five facts about the snow leopard! They live high up.";
/// assert_eq!(detect_main_topic(text, &[]), Some("snow leopard".to_string()));
///
/// let text = "Octopus arms think. Octopus hearts number three. The end.";
/// assert_eq!(detect_main_topic(text, &[]), Some("octopus".to_string()));
///
/// assert_eq!(detect_main_topic("nothing capitalised here", &[]), None);
/// ```
pub fn detect_main_topic(text: &str, rules: &[TopicRule]) -> Option<String> {
    if let Some(rule) = rules.iter().find(|rule| rule.matches(text)) {
        return Some(rule.topic.clone());
    }

    for pattern in PHRASE_PATTERNS.iter() {
        if let Some(topic) = pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_lowercase())
            .filter(|t| !t.is_empty())
        {
            return Some(topic);
        }
    }

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, m) in CAPITALISED_WORD.find_iter(text).enumerate() {
        let word = m.as_str();
        if STOP_WORDS.contains(&word.to_lowercase().as_str()) {
            continue;
        }
        counts.entry(word).or_insert((0, order)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(word, _)| word.to_lowercase())
}

/// True when any word of `query` is in the generic list.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::is_generic_query;
///
/// let generic = vec!["car".to_string(), "warranty".to_string()];
/// assert!(is_generic_query("Warranty", &generic));
/// assert!(!is_generic_query("grille", &generic));
/// ```
pub fn is_generic_query(query: &str, generic_terms: &[String]) -> bool {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .any(|word| generic_terms.iter().any(|g| g.eq_ignore_ascii_case(&word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table_wins() {
        let rules = vec![TopicRule::new(["hyundai", "genesis"], "Hyundai Genesis")];
        let text = "Five facts about the Genesis G80! It is fast.";
        assert_eq!(
            detect_main_topic(text, &rules),
            Some("Hyundai Genesis".to_string())
        );
    }

    #[test]
    fn test_stop_words_ignored() {
        let text = "The The The Moon orbits. The Moon glows.";
        assert_eq!(detect_main_topic(text, &[]), Some("moon".to_string()));
    }

    #[test]
    fn test_frequency_ties_go_to_first_seen() {
        let text = "Mars is red. Venus is hot.";
        assert_eq!(detect_main_topic(text, &[]), Some("mars".to_string()));
    }
}
