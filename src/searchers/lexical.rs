//! Weighted substring retrieval over name, category and description.

use crate::prelude::*;
use crate::sampler::{FallbackSampler, ThreadRngSampler};
use crate::searchers::tokenizer::{has_word_prefix, QueryTerms};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of top candidates echoed to the debug log.
const LOGGED_TOP_CANDIDATES: usize = 5;

/// A retriever that scores every catalog item with weighted substring and
/// word-prefix matches.
///
/// Scoring favours category hits over description hits, so a query naming an
/// item type ("shoes") surfaces that type even when descriptions are noisy.
/// Items with placeholder imagery receive a penalty large enough to push them
/// below zero. When nothing scores above zero a random sample of items with
/// real imagery is returned instead, so the rerank stage always has
/// something to work with.
///
/// # Examples
///
/// ```rust
/// use stylyst::prelude::*;
///
/// let catalog = vec![
///     CatalogItem::new("a", "Red Jacket", "Outerwear", "warm coat", "ok.jpg"),
///     CatalogItem::new("b", "Blue Jacket", "Outerwear", "light coat", "missing_b.jpg"),
/// ];
///
/// let retriever = LexicalRetriever::new(ScoringRules::default());
/// let ids: Vec<&str> = retriever
///     .retrieve_items("jacket", &catalog, 10)
///     .iter()
///     .map(|item| item.id.as_str())
///     .collect();
/// assert_eq!(ids, vec!["a"]);
/// ```
pub struct LexicalRetriever {
  rules: ScoringRules,
  fallback_sample_size: usize,
  sampler: Box<dyn FallbackSampler>,
}

impl Default for LexicalRetriever {
  fn default() -> Self {
    Self::new(ScoringRules::default())
  }
}

impl LexicalRetriever {
  /// Creates a retriever with the given rules, the default fallback size and
  /// a thread-local random sampler.
  pub fn new(rules: ScoringRules) -> Self {
    Self {
      rules,
      fallback_sample_size: RetrievalOptions::default().fallback_sample_size,
      sampler: Box::new(ThreadRngSampler),
    }
  }

  /// Replaces the fallback sampler.
  pub fn with_sampler(mut self, sampler: impl FallbackSampler + 'static) -> Self {
    self.sampler = Box::new(sampler);
    self
  }

  /// Sets the maximum number of items the fallback returns.
  pub fn with_fallback_sample_size(mut self, size: usize) -> Self {
    self.fallback_sample_size = size;
    self
  }

  pub fn rules(&self) -> &ScoringRules {
    &self.rules
  }

  /// Scores a single item against already-parsed query terms.
  pub fn score_item<'a>(&self, terms: &QueryTerms, item: &'a CatalogItem) -> ScoredCandidate<'a> {
    let rules = &self.rules;
    let name = item.name.to_lowercase();
    let description = item.description.to_lowercase();
    let category = item.category.to_lowercase();

    let mut candidate = ScoredCandidate::new(item);

    // An empty phrase would be a substring of everything.
    if !terms.is_blank() {
      let phrase = terms.phrase.as_str();
      if name.contains(phrase) {
        candidate.score += rules.name_phrase;
      }
      if category.contains(phrase) {
        candidate.score += rules.category_phrase;
      }
      if description.contains(phrase) {
        candidate.score += rules.description_phrase;
      }
    }

    for token in &terms.tokens {
      let token = token.as_str();
      let mut matched = false;

      if category.contains(token) {
        candidate.score += rules.category_substring;
        matched = true;
      }
      if has_word_prefix(&category, token) {
        candidate.score += rules.category_word;
        matched = true;
      }
      if name.contains(token) {
        candidate.score += rules.name_substring;
        matched = true;
      }
      if has_word_prefix(&name, token) {
        candidate.score += rules.name_word;
        matched = true;
      }
      if description.contains(token) {
        candidate.score += rules.description_substring;
        matched = true;
      }

      if matched {
        candidate.matched_tokens += 1;
      }
    }

    if !terms.tokens.is_empty() && candidate.matched_tokens == terms.tokens.len() {
      candidate.score += rules.all_tokens_bonus;
    }

    if rules.is_missing_image(&item.image_ref) {
      candidate.score -= rules.missing_image_penalty;
    }

    candidate
  }

  /// Scores the whole catalog and returns every positive candidate, best first.
  ///
  /// The sort is stable: candidates with equal score and matched-token count
  /// keep their catalog order.
  pub fn rank<'a>(&self, query: &str, catalog: &'a [CatalogItem]) -> Vec<ScoredCandidate<'a>> {
    let terms = QueryTerms::parse(query, self.rules.min_token_len);
    self.rank_terms(&terms, catalog)
  }

  fn rank_terms<'a>(&self, terms: &QueryTerms, catalog: &'a [CatalogItem]) -> Vec<ScoredCandidate<'a>> {
    #[cfg(feature = "parallel")]
    let scored = catalog.par_iter().map(|item| self.score_item(terms, item));
    #[cfg(not(feature = "parallel"))]
    let scored = catalog.iter().map(|item| self.score_item(terms, item));

    let mut candidates: Vec<ScoredCandidate<'a>> = scored.filter(|c| c.is_positive()).collect();

    candidates.sort_by(|a, b| {
      b.score
        .cmp(&a.score)
        .then_with(|| b.matched_tokens.cmp(&a.matched_tokens))
    });

    candidates
  }

  /// Retrieves candidates and reports which strategy produced them.
  pub fn retrieve_with_strategy<'a>(
    &self,
    query: &str,
    catalog: &'a [CatalogItem],
    limit: usize,
  ) -> Retrieval<'a> {
    if catalog.is_empty() {
      return Retrieval {
        candidates: Vec::new(),
        strategy: RetrievalStrategy::EmptyCatalog,
      };
    }

    let terms = QueryTerms::parse(query, self.rules.min_token_len);
    debug!(
      query,
      tokens = ?terms.tokens,
      catalog_size = catalog.len(),
      "scoring catalog"
    );

    let ranked = self.rank_terms(&terms, catalog);

    if ranked.is_empty() {
      warn!(query, "no lexical candidates, falling back to a random sample");
      let pool: Vec<&'a CatalogItem> = catalog
        .iter()
        .filter(|item| !self.rules.is_missing_image(&item.image_ref))
        .collect();
      let mut candidates = self.sampler.sample(pool, self.fallback_sample_size);
      candidates.truncate(limit);
      return Retrieval {
        candidates,
        strategy: RetrievalStrategy::Fallback,
      };
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
      let top: Vec<_> = ranked
        .iter()
        .take(LOGGED_TOP_CANDIDATES)
        .map(|c| (c.item.name.as_str(), c.item.category.as_str(), c.score, c.matched_tokens))
        .collect();
      debug!(found = ranked.len(), ?top, "lexical candidates");
    }

    Retrieval {
      candidates: ranked.into_iter().take(limit).map(|c| c.item).collect(),
      strategy: RetrievalStrategy::Lexical,
    }
  }

  /// Retrieves at most `limit` candidates for `query`.
  pub fn retrieve_items<'a>(
    &self,
    query: &str,
    catalog: &'a [CatalogItem],
    limit: usize,
  ) -> Vec<&'a CatalogItem> {
    self.retrieve_with_strategy(query, catalog, limit).candidates
  }
}

impl Retriever for LexicalRetriever {
  fn retrieve<'a>(&self, query: &str, catalog: &'a [CatalogItem], limit: usize) -> Retrieval<'a> {
    self.retrieve_with_strategy(query, catalog, limit)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(id: &str, name: &str, category: &str, description: &str) -> CatalogItem {
    CatalogItem::new(id, name, category, description, format!("{id}.jpg"))
  }

  fn score<'a>(query: &str, item: &'a CatalogItem) -> ScoredCandidate<'a> {
    let retriever = LexicalRetriever::default();
    let terms = QueryTerms::parse(query, retriever.rules().min_token_len);
    retriever.score_item(&terms, item)
  }

  #[test]
  fn test_category_hit_scores_all_rules() {
    // phrase in category 150, token in category 80, category word 40, all tokens 50
    let shoe = item("s", "Runner", "Shoes", "comfortable");
    let scored = score("shoes", &shoe);
    assert_eq!(scored.score, 320);
    assert_eq!(scored.matched_tokens, 1);
  }

  #[test]
  fn test_description_only_hit() {
    // phrase in description 100, token in description 5, all tokens 50
    let tote = item("t", "Tote", "Bags", "fits two pairs of shoes");
    let scored = score("shoes", &tote);
    assert_eq!(scored.score, 155);
  }

  #[test]
  fn test_word_prefix_on_composite_category() {
    let sneaker = item("k", "Court Classic", "Casual Shoes (Footwear)", "");
    // "foot": substring in category only, "(footwear)" does not start with it
    let scored = score("foot", &sneaker);
    assert_eq!(scored.score, 150 + 80 + 50);
  }

  #[test]
  fn test_matched_tokens_counts_tokens_not_checks() {
    let jacket = item("j", "Red Leather Jacket", "Outerwear", "red leather");
    let scored = score("red jacket boots", &jacket);
    assert_eq!(scored.matched_tokens, 2);
    // red: name 20 + word 10 + desc 5; jacket: name 20 + word 10; no bonus
    assert_eq!(scored.score, 65);
  }

  #[test]
  fn test_missing_image_penalty() {
    let missing = CatalogItem::new("m", "Red Jacket", "Outerwear", "", "https://placehold.co/400x500?text=Missing");
    let scored = score("jacket", &missing);
    assert_eq!(scored.score, 200 + 20 + 10 + 50 - 1000);
    assert!(!scored.is_positive());
  }

  #[test]
  fn test_blank_query_gets_no_phrase_bonus() {
    let jacket = item("j", "Red Jacket", "Outerwear", "warm");
    assert_eq!(score("!!!", &jacket).score, 0);
  }

  #[test]
  fn test_short_tokens_only_count_in_phrase() {
    let tee = item("t", "X Tee", "Tops", "");
    let scored = score("x", &tee);
    assert_eq!(scored.score, 200);
    assert_eq!(scored.matched_tokens, 0);
  }

  #[test]
  fn test_rank_orders_by_score_then_matched_tokens() {
    let rules = ScoringRules::builder()
      .phrase(0, 0, 0)
      .category(0, 0)
      .name(10, 0)
      .description(20)
      .all_tokens_bonus(0)
      .build();
    let retriever = LexicalRetriever::new(rules);
    let catalog = vec![
      item("one_token", "", "", "red"),
      item("two_tokens", "red wool", "", ""),
      item("best", "", "", "red wool"),
    ];
    let ranked = retriever.rank("red wool", &catalog);
    let ids: Vec<&str> = ranked.iter().map(|c| c.item.id.as_str()).collect();
    // best = 40; one_token and two_tokens tie at 20, two_tokens matched more
    assert_eq!(ids, vec!["best", "two_tokens", "one_token"]);
  }

  #[test]
  fn test_strategy_reporting() {
    let retriever = LexicalRetriever::default();
    let catalog = vec![item("a", "Red Jacket", "Outerwear", "")];

    assert_eq!(
      retriever.retrieve_with_strategy("jacket", &[], 5).strategy,
      RetrievalStrategy::EmptyCatalog
    );
    assert_eq!(
      retriever.retrieve_with_strategy("jacket", &catalog, 5).strategy,
      RetrievalStrategy::Lexical
    );
    assert_eq!(
      retriever.retrieve_with_strategy("zzz", &catalog, 5).strategy,
      RetrievalStrategy::Fallback
    );
  }

  #[test]
  fn test_fallback_respects_limit_and_sample_size() {
    let catalog: Vec<CatalogItem> = (0..40).map(|i| item(&format!("i{i}"), "Plain", "Tops", "")).collect();
    let retriever = LexicalRetriever::default().with_fallback_sample_size(8);
    assert_eq!(retriever.retrieve_items("velvet", &catalog, 60).len(), 8);
    assert_eq!(retriever.retrieve_items("velvet", &catalog, 3).len(), 3);
  }
}
