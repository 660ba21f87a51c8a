//! Core data types for catalog retrieval.

use serde::{Deserialize, Serialize};

/// Type alias for catalog item identifiers.
pub type ItemId = String;

/// A single product in the catalog.
///
/// Every text field defaults to an empty string when absent from the source
/// record, so scoring always sees the same four fields regardless of how the
/// catalog was loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
  /// Opaque identifier, unique within a catalog snapshot.
  pub id: ItemId,
  /// Short display title.
  #[serde(default)]
  pub name: String,
  /// Free-text description of the item.
  #[serde(default)]
  pub description: String,
  /// Free-text classification. May be composite, e.g. "Casual Shoes (Footwear)".
  #[serde(default)]
  pub category: String,
  /// Reference to the item's image. Placeholder references are recognised by
  /// [`ImageSentinel`](crate::rules::ImageSentinel).
  #[serde(default, alias = "image")]
  pub image_ref: String,
  /// Display price. Carried through for callers, never scored.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price: Option<String>,
}

impl CatalogItem {
  /// Creates an item from its text fields.
  pub fn new(
    id: impl Into<ItemId>,
    name: impl Into<String>,
    category: impl Into<String>,
    description: impl Into<String>,
    image_ref: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      description: description.into(),
      category: category.into(),
      image_ref: image_ref.into(),
      price: None,
    }
  }

  /// Sets the display price.
  pub fn with_price(mut self, price: impl Into<String>) -> Self {
    self.price = Some(price.into());
    self
  }
}

/// A catalog item together with its lexical score.
///
/// Candidates borrow the item they score; they live only for the duration of
/// one retrieval call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate<'a> {
  /// The scored item.
  pub item: &'a CatalogItem,
  /// Accumulated score. Negative when the missing-image penalty applies.
  pub score: i64,
  /// Number of query tokens that matched this item somewhere.
  pub matched_tokens: usize,
}

impl<'a> ScoredCandidate<'a> {
  /// Creates a zero-scored candidate for `item`.
  pub fn new(item: &'a CatalogItem) -> Self {
    Self {
      item,
      score: 0,
      matched_tokens: 0,
    }
  }

  /// Whether this candidate survives the positive-score filter.
  pub fn is_positive(&self) -> bool {
    self.score > 0
  }
}

/// How a set of candidates was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStrategy {
  /// The catalog was empty; nothing was scored.
  EmptyCatalog,
  /// At least one item scored above zero.
  Lexical,
  /// Nothing scored above zero and a random sample of items with real
  /// imagery was returned instead.
  Fallback,
}

/// The outcome of one retrieval call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieval<'a> {
  /// Ordered candidates, at most `limit` long.
  pub candidates: Vec<&'a CatalogItem>,
  /// Which path produced `candidates`.
  pub strategy: RetrievalStrategy,
}

impl<'a> Retrieval<'a> {
  /// Returns the candidate ids in order.
  pub fn ids(&self) -> Vec<&'a str> {
    self.candidates.iter().map(|item| item.id.as_str()).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.candidates.is_empty()
  }

  pub fn len(&self) -> usize {
    self.candidates.len()
  }
}

/// Options controlling the size of a retrieval result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalOptions {
  /// Maximum number of candidates handed to the rerank stage.
  #[serde(default = "default_limit")]
  pub limit: usize,
  /// Maximum number of items drawn by the random fallback.
  #[serde(default = "default_fallback_sample_size")]
  pub fallback_sample_size: usize,
}

fn default_limit() -> usize {
  60
}

fn default_fallback_sample_size() -> usize {
  20
}

impl Default for RetrievalOptions {
  fn default() -> Self {
    Self {
      limit: default_limit(),
      fallback_sample_size: default_fallback_sample_size(),
    }
  }
}

impl RetrievalOptions {
  /// Sets the `limit` value for the maximum number of candidates.
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = limit;
    self
  }

  /// Sets the maximum size of the fallback sample.
  pub fn fallback_sample_size(mut self, size: usize) -> Self {
    self.fallback_sample_size = size;
    self
  }
}
