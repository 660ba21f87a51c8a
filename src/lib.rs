//! Stylyst - vibe-based fashion recommendations over a product catalog.
//!
//! Stylyst is a two-stage retrieve-then-rerank pipeline. A lexical retriever
//! scores every catalog item against a free-text query and hands a bounded
//! candidate list to a remote model, which reranks and explains its picks.
//! The remote call sits behind the [`Reranker`](rerank::Reranker) trait; the
//! crate does no network I/O of its own.

pub mod types;
pub mod searcher;
pub mod engine;
pub mod rules;
pub mod searchers;
pub mod sampler;
pub mod catalog;
pub mod rerank;
pub mod prompt;
pub mod config;
pub mod stats;
pub mod error;

pub use error::{Error, Result};

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::types::*;
    pub use crate::searcher::*;
    pub use crate::engine::*;
    pub use crate::rules::*;
    pub use crate::searchers::*;
    pub use crate::sampler::*;
    pub use crate::catalog::*;
    pub use crate::rerank::*;
    pub use crate::config::StylistConfig;
    pub use crate::stats::CatalogStats;
    pub use crate::error::{Error, Result};
}
