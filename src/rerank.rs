//! The contract with the remote rerank-and-explain model.
//!
//! The crate never talks to the model provider itself. Callers implement
//! [`Reranker`] over whatever transport they use; this module defines what
//! goes in ([`RerankRequest`]) and validates what comes back
//! ([`RecommendationResponse`]).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything the remote model needs for one rerank call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RerankRequest<'a> {
  /// Model identifier, passed through to the transport.
  pub model: &'a str,
  /// Fixed role instruction for the stylist.
  pub system_instruction: &'a str,
  /// Task prompt containing the query and the candidate block.
  pub prompt: String,
  /// Number of picks the model is asked for.
  pub pick_count: usize,
}

/// A remote model that reranks candidates and explains its picks.
///
/// `rerank` returns the raw response text, expected to be JSON in the
/// [`RecommendationResponse`] shape. Transport failures should be reported
/// as [`Error::RemoteCallFailed`]; a missing credential as
/// [`Error::ConfigurationMissing`].
pub trait Reranker: Send + Sync {
  fn rerank(&self, request: &RerankRequest<'_>) -> Result<String>;
}

impl<R: Reranker + ?Sized> Reranker for std::sync::Arc<R> {
  fn rerank(&self, request: &RerankRequest<'_>) -> Result<String> {
    (**self).rerank(request)
  }
}

/// One ranked pick returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationItem {
  pub rank: u32,
  pub item_id: String,
  /// Short description of the item as the model sees it.
  pub description: String,
  /// Why the item fits the query.
  pub explanation: String,
}

/// The model's structured answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResponse {
  #[serde(default)]
  pub user_query: String,
  #[serde(default)]
  pub stylist_summary: String,
  #[serde(default)]
  pub recommendations: Vec<RecommendationItem>,
}

impl RecommendationResponse {
  /// The answer given when retrieval found nothing to rerank.
  pub fn empty_inventory(query: &str) -> Self {
    Self {
      user_query: query.to_string(),
      stylist_summary: format!(
        "I searched your entire inventory for '{query}', but I couldn't find any items. \
         Please ensure your inventory is uploaded correctly."
      ),
      recommendations: Vec::new(),
    }
  }

  /// Parses the raw model output.
  ///
  /// Blank text and anything that does not deserialize into the expected
  /// shape are reported as [`Error::ResponseMalformed`].
  pub fn parse(raw: &str) -> Result<Self> {
    let raw = strip_code_fence(raw.trim());
    if raw.is_empty() {
      return Err(Error::ResponseMalformed("empty response from stylist".to_string()));
    }
    serde_json::from_str(raw).map_err(|e| Error::ResponseMalformed(e.to_string()))
  }

  /// Drops picks whose id is not in `allowed`, orders the rest by rank and
  /// keeps at most `max` of them. Returns the ids that were dropped.
  pub fn retain_known<'a, I>(&mut self, allowed: I, max: usize) -> Vec<String>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let allowed: HashSet<&str> = allowed.into_iter().collect();
    let mut dropped = Vec::new();
    let mut seen = HashSet::new();

    self.recommendations.retain(|pick| {
      let keep = allowed.contains(pick.item_id.as_str()) && seen.insert(pick.item_id.clone());
      if !keep {
        dropped.push(pick.item_id.clone());
      }
      keep
    });
    self.recommendations.sort_by_key(|pick| pick.rank);
    self.recommendations.truncate(max);

    dropped
  }
}

/// Models sometimes wrap JSON in a Markdown code fence.
fn strip_code_fence(raw: &str) -> &str {
  let Some(body) = raw.strip_prefix("```") else {
    return raw;
  };
  let body = body.strip_prefix("json").unwrap_or(body);
  body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
  use super::*;

  const RESPONSE: &str = r#"{
    "user_query": "grunge night out",
    "stylist_summary": "Edgy layers.",
    "recommendations": [
      {"rank": 2, "item_id": "b", "description": "slip dress", "explanation": "contrast"},
      {"rank": 1, "item_id": "a", "description": "leather jacket", "explanation": "90s grunge"},
      {"rank": 3, "item_id": "ghost", "description": "?", "explanation": "?"}
    ]
  }"#;

  #[test]
  fn test_parse_valid_response() {
    let response = RecommendationResponse::parse(RESPONSE).unwrap();
    assert_eq!(response.user_query, "grunge night out");
    assert_eq!(response.recommendations.len(), 3);
  }

  #[test]
  fn test_parse_fenced_response() {
    let fenced = format!("```json\n{RESPONSE}\n```");
    assert!(RecommendationResponse::parse(&fenced).is_ok());
  }

  #[test]
  fn test_parse_rejects_blank_and_garbage() {
    assert!(matches!(
      RecommendationResponse::parse("   "),
      Err(Error::ResponseMalformed(_))
    ));
    assert!(matches!(
      RecommendationResponse::parse("Sorry, I can't help with that."),
      Err(Error::ResponseMalformed(_))
    ));
    assert!(matches!(
      RecommendationResponse::parse(r#"{"recommendations": [{"rank": "first"}]}"#),
      Err(Error::ResponseMalformed(_))
    ));
  }

  #[test]
  fn test_retain_known_orders_and_caps() {
    let mut response = RecommendationResponse::parse(RESPONSE).unwrap();
    let dropped = response.retain_known(["a", "b"], 6);
    assert_eq!(dropped, vec!["ghost"]);
    let ids: Vec<&str> = response.recommendations.iter().map(|p| p.item_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    response.retain_known(["a", "b"], 1);
    assert_eq!(response.recommendations.len(), 1);
    assert_eq!(response.recommendations[0].item_id, "a");
  }

  #[test]
  fn test_retain_known_drops_duplicate_picks() {
    let mut response = RecommendationResponse {
      recommendations: vec![
        RecommendationItem {
          rank: 1,
          item_id: "a".into(),
          description: String::new(),
          explanation: String::new(),
        },
        RecommendationItem {
          rank: 2,
          item_id: "a".into(),
          description: String::new(),
          explanation: String::new(),
        },
      ],
      ..Default::default()
    };
    let dropped = response.retain_known(["a"], 6);
    assert_eq!(dropped, vec!["a"]);
    assert_eq!(response.recommendations.len(), 1);
  }
}
