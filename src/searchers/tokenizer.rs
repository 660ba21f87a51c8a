//! Query normalization and tokenization.

/// A query after cleaning, split into the forms the scorer checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
  /// The whole cleaned query, used for phrase matches.
  ///
  /// Trimmed, and empty when the query held only punctuation. An empty
  /// phrase earns no phrase bonus, so such a query falls back to sampling
  /// rather than matching every item.
  pub phrase: String,
  /// Tokens long enough to take part in per-token scoring.
  pub tokens: Vec<String>,
}

impl QueryTerms {
  /// Clean and tokenize `query`, keeping tokens of at least `min_token_len` characters.
  pub fn parse(query: &str, min_token_len: usize) -> Self {
    let cleaned = clean(query);
    let tokens = cleaned
      .split_whitespace()
      .filter(|token| token.chars().count() >= min_token_len)
      .map(str::to_string)
      .collect();

    Self {
      phrase: cleaned.trim().to_string(),
      tokens,
    }
  }

  /// True when the query carries no usable text at all.
  pub fn is_blank(&self) -> bool {
    self.phrase.is_empty()
  }
}

/// Lowercase `text` and drop every character that is neither a word
/// character (alphanumeric or `_`) nor whitespace.
pub fn clean(text: &str) -> String {
  text
    .to_lowercase()
    .chars()
    .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
    .collect()
}

/// True when any whitespace-separated word of `text` starts with `token`.
///
/// A word equal to the token counts, since every string starts with itself.
pub fn has_word_prefix(text: &str, token: &str) -> bool {
  text.split_whitespace().any(|word| word.starts_with(token))
}
