//! Error type for the recommendation workflow.
//!
//! Retrieval itself never fails; these errors come from the layers around it
//! (configuration, the remote rerank call, and catalog loading).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// A setting the workflow cannot run without (usually the API key) is absent.
  #[error("Configuration missing: {0}")]
  ConfigurationMissing(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  /// The reranker transport failed before producing a response.
  #[error("Remote call failed: {0}")]
  RemoteCallFailed(String),

  /// The reranker answered, but not with the expected recommendation shape.
  #[error("Response malformed: {0}")]
  ResponseMalformed(String),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}
