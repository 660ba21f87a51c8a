//! Built-in first-stage retrievers.
//!
//! # Available Retrievers
//!
//! - [`LexicalRetriever`](crate::searchers::LexicalRetriever): weighted
//!   substring and word-prefix scoring over name, category and description,
//!   with a random fallback when nothing matches.
//!
//! # Example
//!
//! ```rust
//! use stylyst::prelude::*;
//!
//! let catalog = vec![
//!     CatalogItem::new("s1", "Canvas Sneaker", "Casual Shoes (Footwear)", "white low-top", "s1.jpg"),
//!     CatalogItem::new("b1", "Weekender", "Bags", "room for two pairs of shoes", "b1.jpg"),
//! ];
//!
//! let retriever = LexicalRetriever::default();
//! let retrieval = retriever.retrieve("shoes", &catalog, 10);
//! assert_eq!(retrieval.ids(), vec!["s1", "b1"]);
//! ```

/// Implements weighted lexical retrieval.
pub mod lexical;
/// Provides query cleaning and tokenization.
pub mod tokenizer;

pub use lexical::LexicalRetriever;
pub use tokenizer::QueryTerms;
