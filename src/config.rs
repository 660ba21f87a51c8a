//! Layered configuration.
//!
//! Uses Figment to merge built-in defaults, `stylyst.toml` and `STYLYST_*`
//! environment variables (later layers win). Nested keys use a double
//! underscore in the environment, e.g. `STYLYST_RERANK__PICK_COUNT=4`.

use crate::error::{Error, Result};
use crate::rules::ScoringRules;
use crate::types::RetrievalOptions;
use figment::{
  providers::{Env, Format, Serialized, Toml},
  Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "stylyst.toml";
pub const ENV_PREFIX: &str = "STYLYST_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylistConfig {
  pub retrieval: RetrievalOptions,
  pub scoring: ScoringRules,
  pub rerank: RerankConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
  /// Model identifier handed to the reranker transport.
  pub model: String,
  /// Picks requested from, and kept after, the rerank call.
  pub pick_count: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key: Option<String>,
}

impl Default for RerankConfig {
  fn default() -> Self {
    Self {
      model: "gemini-2.5-flash".to_string(),
      pick_count: 6,
      api_key: None,
    }
  }
}

impl StylistConfig {
  /// Loads `stylyst.toml` from the working directory plus the environment.
  pub fn load() -> Result<Self> {
    Self::load_from(DEFAULT_CONFIG_FILE)
  }

  /// Loads the given TOML file plus the environment. A missing file is not an error.
  pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
    Self::extract(Self::figment(path))
  }

  /// The provider stack used by [`load_from`](Self::load_from).
  pub fn figment(path: impl AsRef<Path>) -> Figment {
    Figment::from(Serialized::defaults(StylistConfig::default()))
      .merge(Toml::file(path.as_ref()))
      .merge(Env::prefixed(ENV_PREFIX).split("__"))
  }

  /// Extracts and validates a config from any figment.
  pub fn extract(figment: Figment) -> Result<Self> {
    let config: Self = figment
      .extract()
      .map_err(|e| Error::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.retrieval.limit == 0 {
      return Err(Error::InvalidConfig("retrieval.limit must be at least 1".into()));
    }
    if self.rerank.pick_count == 0 {
      return Err(Error::InvalidConfig("rerank.pick_count must be at least 1".into()));
    }
    if self.retrieval.fallback_sample_size == 0 {
      return Err(Error::InvalidConfig(
        "retrieval.fallback_sample_size must be at least 1".into(),
      ));
    }
    if self.scoring.missing_image_penalty < 0 {
      return Err(Error::InvalidConfig(
        "scoring.missing_image_penalty must not be negative".into(),
      ));
    }
    Ok(())
  }

  /// The API key for the rerank transport.
  pub fn api_key(&self) -> Result<&str> {
    self
      .rerank
      .api_key
      .as_deref()
      .map(str::trim)
      .filter(|key| !key.is_empty())
      .ok_or_else(|| {
        Error::ConfigurationMissing(format!(
          "rerank.api_key is not set (add it to {DEFAULT_CONFIG_FILE} or set {ENV_PREFIX}RERANK__API_KEY)"
        ))
      })
  }
}
