//! Runs the retrieve-then-rerank pipeline from the command line.
//!
//! The rerank stage is served by an offline stand-in that keeps the
//! retriever's order, so the demo needs no network access:
//!
//! ```text
//! cargo run --example vibe_search -- "90s grunge night out"
//! cargo run --example vibe_search -- --catalog inventory.json --stats "linen summer"
//! RUST_LOG=stylyst=debug cargo run --example vibe_search -- "jacket"
//! ```

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use stylyst::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vibe_search", about = "Vibe search over a product catalog")]
struct Args {
  /// Free-text description of the look.
  query: String,

  /// JSON array of catalog items. Uses a small built-in catalog when omitted.
  #[arg(long)]
  catalog: Option<PathBuf>,

  /// TOML config file layered over the defaults.
  #[arg(long, default_value = stylyst::config::DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Overrides `retrieval.limit`.
  #[arg(long)]
  limit: Option<usize>,

  /// Prints catalog health statistics before searching.
  #[arg(long)]
  stats: bool,
}

/// Answers with the first candidates in prompt order.
struct InOrderReranker;

impl Reranker for InOrderReranker {
  fn rerank(&self, request: &RerankRequest<'_>) -> stylyst::Result<String> {
    let recommendations: Vec<RecommendationItem> = request
      .prompt
      .lines()
      .filter_map(|line| {
        let mut fields = line.split(" | ");
        let id = fields.next()?.trim();
        let name = fields.next()?.trim();
        (!id.contains(char::is_whitespace)).then_some((id, name))
      })
      .take(request.pick_count)
      .enumerate()
      .map(|(i, (id, name))| RecommendationItem {
        rank: i as u32 + 1,
        item_id: id.to_string(),
        description: name.to_string(),
        explanation: "Strong lexical match for the query.".to_string(),
      })
      .collect();

    let response = RecommendationResponse {
      user_query: String::new(),
      stylist_summary: format!("Top {} lexical matches.", recommendations.len()),
      recommendations,
    };
    Ok(serde_json::to_string(&response)?)
  }
}

fn sample_catalog() -> Catalog {
  Catalog::from_items(vec![
    CatalogItem::new(
      "item_001",
      "Vintage Distressed Leather Jacket",
      "Outerwear",
      "Genuine black leather biker jacket with a distressed finish and a 90s grunge aesthetic.",
      "https://picsum.photos/id/103/400/500",
    )
    .with_price("$120"),
    CatalogItem::new(
      "item_002",
      "Oversized Flannel Shirt",
      "Topwear - Shirts",
      "Red and black plaid flannel, worn open over a band tee.",
      "https://picsum.photos/id/342/400/500",
    ),
    CatalogItem::new(
      "item_003",
      "Chunky Combat Boots",
      "Casual Shoes (Footwear)",
      "Lace-up black boots with a lug sole.",
      "https://picsum.photos/id/21/400/500",
    ),
    CatalogItem::new(
      "item_004",
      "Silk Slip Dress",
      "Dresses",
      "Emerald green silk satin slip dress for evening cocktails.",
      "https://picsum.photos/id/439/400/500",
    ),
    CatalogItem::new(
      "item_005",
      "Linen Wide-Leg Trousers",
      "Bottomwear - Trousers",
      "Beige linen trousers for hot summer days.",
      "https://picsum.photos/id/660/400/500",
    ),
    CatalogItem::new(
      "item_006",
      "Structured Blazer",
      "Outerwear",
      "Navy blue double-breasted blazer with gold buttons.",
      "https://placehold.co/400x500?text=Missing+item_006",
    ),
  ])
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();

  let mut config = StylistConfig::load_from(&args.config)
    .with_context(|| format!("loading {}", args.config.display()))?;
  if let Some(limit) = args.limit {
    config.retrieval.limit = limit;
  }

  let catalog = match &args.catalog {
    Some(path) => {
      let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
      Catalog::from_json_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?
    }
    None => sample_catalog(),
  };

  if args.stats {
    let stats = CatalogStats::compute(&catalog, &config.scoring.missing_image);
    println!("{}", serde_json::to_string_pretty(&stats)?);
  }

  let retriever = LexicalRetriever::new(config.scoring.clone())
    .with_fallback_sample_size(config.retrieval.fallback_sample_size);
  let retrieval = retriever.retrieve_with_strategy(&args.query, &catalog, config.retrieval.limit);
  println!("strategy: {:?}", retrieval.strategy);
  for (i, item) in retrieval.candidates.iter().enumerate() {
    println!("{:>3}. {} | {} | {}", i + 1, item.id, item.name, item.category);
  }

  let engine = StylistEngine::from_config(&config, Box::new(InOrderReranker));
  let response = engine.recommend(&args.query, &catalog)?;
  println!();
  println!("{}", response.stylist_summary);
  for pick in &response.recommendations {
    println!("  #{} {} ({})", pick.rank, pick.item_id, pick.description);
  }

  Ok(())
}
