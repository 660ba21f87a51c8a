//! The recommendation workflow: retrieve, rerank, validate.

use crate::config::StylistConfig;
use crate::error::Result;
use crate::prompt::{build_prompt, STYLIST_SYSTEM_PROMPT};
use crate::rerank::{RecommendationResponse, RerankRequest, Reranker};
use crate::searcher::Retriever;
use crate::searchers::LexicalRetriever;
use crate::types::{CatalogItem, RetrievalStrategy};
use tracing::{error, info, warn};

/// Runs the two-stage recommendation pipeline over a catalog snapshot.
///
/// 1. **Retrieval**: the configured [`Retriever`] narrows the catalog to at
///    most `candidate_limit` candidates.
/// 2. **Rerank**: the candidates are formatted into a prompt and sent through
///    the [`Reranker`].
/// 3. **Validation**: the response is parsed, picks that do not name a
///    candidate are dropped, and the rest are ordered by rank and capped at
///    `pick_count`.
///
/// When retrieval finds nothing the engine answers with an explanatory
/// summary and never calls the reranker.
///
/// Create a `StylistEngine` using the [`StylistEngineBuilder`].
///
/// # Examples
///
/// ```rust
/// use stylyst::prelude::*;
///
/// struct CannedReranker;
///
/// impl Reranker for CannedReranker {
///     fn rerank(&self, _request: &RerankRequest<'_>) -> stylyst::Result<String> {
///         Ok(r#"{"user_query": "jacket", "stylist_summary": "One clear pick.",
///                "recommendations": [{"rank": 1, "item_id": "a",
///                "description": "red jacket", "explanation": "it is a jacket"}]}"#.into())
///     }
/// }
///
/// let catalog = Catalog::from_items(vec![
///     CatalogItem::new("a", "Red Jacket", "Outerwear", "warm coat", "a.jpg"),
/// ]);
///
/// let engine = StylistEngine::builder(Box::new(CannedReranker)).build();
/// let response = engine.recommend("jacket", &catalog).unwrap();
/// assert_eq!(response.recommendations[0].item_id, "a");
/// ```
pub struct StylistEngine {
  retriever: Box<dyn Retriever>,
  reranker: Box<dyn Reranker>,
  model: String,
  system_instruction: String,
  candidate_limit: usize,
  pick_count: usize,
}

impl StylistEngine {
  /// Creates a builder with default settings around `reranker`.
  pub fn builder(reranker: Box<dyn Reranker>) -> StylistEngineBuilder {
    StylistEngineBuilder::new(reranker)
  }

  /// Builds an engine whose retriever, limits and model come from `config`.
  pub fn from_config(config: &StylistConfig, reranker: Box<dyn Reranker>) -> Self {
    let retriever = LexicalRetriever::new(config.scoring.clone())
      .with_fallback_sample_size(config.retrieval.fallback_sample_size);
    Self::builder(reranker)
      .retriever(Box::new(retriever))
      .model(config.rerank.model.clone())
      .candidate_limit(config.retrieval.limit)
      .pick_count(config.rerank.pick_count)
      .build()
  }

  /// Recommends up to `pick_count` items from `catalog` for `query`.
  ///
  /// # Errors
  ///
  /// Propagates the reranker's error (usually `RemoteCallFailed` or
  /// `ConfigurationMissing`) and returns `ResponseMalformed` when the
  /// response cannot be parsed.
  pub fn recommend(&self, query: &str, catalog: &[CatalogItem]) -> Result<RecommendationResponse> {
    let retrieval = self.retriever.retrieve(query, catalog, self.candidate_limit);

    if retrieval.is_empty() {
      info!(query, strategy = ?retrieval.strategy, "no candidates to rerank");
      return Ok(RecommendationResponse::empty_inventory(query));
    }
    if retrieval.strategy == RetrievalStrategy::Fallback {
      info!(query, candidates = retrieval.len(), "reranking a random sample");
    }

    let request = RerankRequest {
      model: &self.model,
      system_instruction: &self.system_instruction,
      prompt: build_prompt(query, &retrieval.candidates, self.pick_count),
      pick_count: self.pick_count,
    };

    let raw = self.reranker.rerank(&request).map_err(|e| {
      error!(query, error = %e, "rerank call failed");
      e
    })?;

    let mut response = RecommendationResponse::parse(&raw)?;
    let dropped = response.retain_known(retrieval.ids(), self.pick_count);
    if !dropped.is_empty() {
      warn!(query, ?dropped, "rerank returned picks outside the candidate set");
    }
    if response.user_query.is_empty() {
      response.user_query = query.to_string();
    }

    info!(
      query,
      candidates = retrieval.len(),
      picks = response.recommendations.len(),
      "recommendations ready"
    );
    Ok(response)
  }
}

/// A builder for creating `StylistEngine` instances.
pub struct StylistEngineBuilder {
  retriever: Option<Box<dyn Retriever>>,
  reranker: Box<dyn Reranker>,
  model: Option<String>,
  system_instruction: Option<String>,
  candidate_limit: Option<usize>,
  pick_count: Option<usize>,
}

impl StylistEngineBuilder {
  pub fn new(reranker: Box<dyn Reranker>) -> Self {
    Self {
      retriever: None,
      reranker,
      model: None,
      system_instruction: None,
      candidate_limit: None,
      pick_count: None,
    }
  }

  /// Replaces the default [`LexicalRetriever`].
  pub fn retriever(mut self, retriever: Box<dyn Retriever>) -> Self {
    self.retriever = Some(retriever);
    self
  }

  pub fn model(mut self, model: impl Into<String>) -> Self {
    self.model = Some(model.into());
    self
  }

  /// Replaces [`STYLIST_SYSTEM_PROMPT`].
  pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
    self.system_instruction = Some(instruction.into());
    self
  }

  pub fn candidate_limit(mut self, limit: usize) -> Self {
    self.candidate_limit = Some(limit);
    self
  }

  pub fn pick_count(mut self, count: usize) -> Self {
    self.pick_count = Some(count);
    self
  }

  pub fn build(self) -> StylistEngine {
    let defaults = StylistConfig::default();
    StylistEngine {
      retriever: self
        .retriever
        .unwrap_or_else(|| Box::new(LexicalRetriever::default())),
      reranker: self.reranker,
      model: self.model.unwrap_or(defaults.rerank.model),
      system_instruction: self
        .system_instruction
        .unwrap_or_else(|| STYLIST_SYSTEM_PROMPT.to_string()),
      candidate_limit: self.candidate_limit.unwrap_or(defaults.retrieval.limit),
      pick_count: self.pick_count.unwrap_or(defaults.rerank.pick_count),
    }
  }
}
