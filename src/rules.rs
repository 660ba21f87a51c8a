//! Scoring rules for lexical retrieval.
//!
//! All weights used by [`LexicalRetriever`](crate::searchers::LexicalRetriever)
//! live here so they can be tuned from configuration.

use serde::{Deserialize, Serialize};

/// Weights and thresholds applied when scoring a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Whole cleaned query found in the name.
    pub name_phrase: i64,
    /// Whole cleaned query found in the category.
    pub category_phrase: i64,
    /// Whole cleaned query found in the description.
    pub description_phrase: i64,
    /// Token found anywhere in the category.
    pub category_substring: i64,
    /// A category word equals or starts with the token.
    pub category_word: i64,
    /// Token found anywhere in the name.
    pub name_substring: i64,
    /// A name word equals or starts with the token.
    pub name_word: i64,
    /// Token found anywhere in the description.
    pub description_substring: i64,
    /// Flat bonus when every query token matched somewhere.
    pub all_tokens_bonus: i64,
    /// Subtracted from items whose image is a placeholder.
    pub missing_image_penalty: i64,
    /// Tokens shorter than this many characters are ignored for per-token scoring.
    pub min_token_len: usize,
    /// Image reference markers for missing imagery.
    pub missing_image: ImageSentinel,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            name_phrase: 200,
            category_phrase: 150,
            description_phrase: 100,
            category_substring: 80,
            category_word: 40,
            name_substring: 20,
            name_word: 10,
            description_substring: 5,
            all_tokens_bonus: 50,
            missing_image_penalty: 1000,
            min_token_len: 2,
            missing_image: ImageSentinel::default(),
        }
    }
}

impl ScoringRules {
    /// Create a new rules builder seeded with the default weights.
    pub fn builder() -> ScoringRulesBuilder {
        ScoringRulesBuilder::default()
    }

    /// Whether `image_ref` marks a missing image under these rules.
    pub fn is_missing_image(&self, image_ref: &str) -> bool {
        self.missing_image.matches(image_ref)
    }
}

/// Builder for scoring rules.
#[derive(Debug, Default)]
pub struct ScoringRulesBuilder {
    rules: ScoringRules,
}

impl ScoringRulesBuilder {
    /// Set the whole-query weights for name, category and description.
    pub fn phrase(mut self, name: i64, category: i64, description: i64) -> Self {
        self.rules.name_phrase = name;
        self.rules.category_phrase = category;
        self.rules.description_phrase = description;
        self
    }

    /// Set the per-token category weights.
    pub fn category(mut self, substring: i64, word: i64) -> Self {
        self.rules.category_substring = substring;
        self.rules.category_word = word;
        self
    }

    /// Set the per-token name weights.
    pub fn name(mut self, substring: i64, word: i64) -> Self {
        self.rules.name_substring = substring;
        self.rules.name_word = word;
        self
    }

    /// Set the per-token description weight.
    pub fn description(mut self, substring: i64) -> Self {
        self.rules.description_substring = substring;
        self
    }

    pub fn all_tokens_bonus(mut self, bonus: i64) -> Self {
        self.rules.all_tokens_bonus = bonus;
        self
    }

    pub fn missing_image_penalty(mut self, penalty: i64) -> Self {
        self.rules.missing_image_penalty = penalty;
        self
    }

    pub fn min_token_len(mut self, len: usize) -> Self {
        self.rules.min_token_len = len;
        self
    }

    /// Replace the missing-image markers.
    pub fn missing_image(mut self, sentinel: ImageSentinel) -> Self {
        self.rules.missing_image = sentinel;
        self
    }

    /// Build the scoring rules.
    pub fn build(self) -> ScoringRules {
        self.rules
    }
}

/// Recognises image references that point at a placeholder rather than a
/// real product photo.
///
/// A pattern matches case-insensitively where it starts a word of the
/// reference: at the very start, or right after a character that is not
/// alphanumeric. `missing_b.jpg`, `IMG_Missing.png` and `placehold.co/...`
/// match; `dismissing-blazer.jpg` does not.
///
/// Serializes as a plain list of patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ImageSentinel {
    patterns: Vec<String>,
}

impl Default for ImageSentinel {
    fn default() -> Self {
        Self::new(["placehold", "missing"])
    }
}

impl ImageSentinel {
    /// Create a sentinel from a set of markers.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Whether any marker starts a word of `image_ref`.
    pub fn matches(&self, image_ref: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let image_ref = image_ref.to_lowercase();
        self.patterns.iter().any(|p| starts_word(&image_ref, p))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn starts_word(text: &str, pattern: &str) -> bool {
    text.match_indices(pattern).any(|(at, _)| {
        text[..at]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

impl From<Vec<String>> for ImageSentinel {
    fn from(patterns: Vec<String>) -> Self {
        Self::new(patterns)
    }
}

impl From<ImageSentinel> for Vec<String> {
    fn from(sentinel: ImageSentinel) -> Self {
        sentinel.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_matches_placeholder_urls() {
        let sentinel = ImageSentinel::default();
        assert!(sentinel.matches("https://placehold.co/400x500?text=Missing+42"));
        assert!(sentinel.matches("missing_b.jpg"));
        assert!(sentinel.matches("IMG_Missing.png"));
        assert!(!sentinel.matches("https://cdn.example.com/items/42.jpg"));
        assert!(!sentinel.matches(""));
    }

    #[test]
    fn test_sentinel_ignores_markers_inside_words() {
        let sentinel = ImageSentinel::default();
        assert!(!sentinel.matches("img/dismissing-blazer.jpg"));
        assert!(!sentinel.matches("cdn/unplaceholder.png"));
        assert!(sentinel.matches("img/dismissing-missing.jpg"));
        assert!(sentinel.matches("MISSING"));
    }

    #[test]
    fn test_empty_patterns_never_match() {
        let sentinel = ImageSentinel::new(["", ""]);
        assert!(sentinel.patterns().is_empty());
        assert!(!sentinel.matches("missing.jpg"));
    }

    #[test]
    fn test_builder_overrides_only_named_weights() {
        let rules = ScoringRules::builder().category(100, 0).min_token_len(3).build();
        assert_eq!(rules.category_substring, 100);
        assert_eq!(rules.category_word, 0);
        assert_eq!(rules.min_token_len, 3);
        assert_eq!(rules.name_phrase, ScoringRules::default().name_phrase);
    }

    #[test]
    fn test_partial_rules_deserialize_over_defaults() {
        let rules: ScoringRules =
            serde_json::from_str(r#"{"name_word": 12, "missing_image": ["NoImage"]}"#).unwrap();
        assert_eq!(rules.name_word, 12);
        assert_eq!(rules.category_substring, 80);
        assert!(rules.is_missing_image("/img/NoImage.png"));
        assert!(!rules.is_missing_image("missing.png"));
    }
}
