//! The `Retriever` trait, the seam between candidate retrieval and reranking.

use crate::types::{CatalogItem, Retrieval};

/// First-stage candidate retrieval.
///
/// A `Retriever` narrows a catalog snapshot down to a bounded, ordered list of
/// candidates for the rerank stage. [`StylistEngine`](crate::engine::StylistEngine)
/// holds one behind a box, so a different first stage (for example a vector
/// index) can be swapped in without touching the workflow.
///
/// The `Send` and `Sync` bounds let an engine be shared across threads.
pub trait Retriever: Send + Sync {
  /// Select at most `limit` candidates for `query` from `catalog`.
  ///
  /// # Arguments
  ///
  /// * `query` - The raw user query.
  /// * `catalog` - A frozen view of the catalog. Implementations must not
  ///   retain it beyond the call.
  /// * `limit` - Maximum number of candidates to return.
  fn retrieve<'a>(&self, query: &str, catalog: &'a [CatalogItem], limit: usize) -> Retrieval<'a>;
}
