//! Catalog health statistics.

use crate::rules::ImageSentinel;
use crate::types::CatalogItem;
use serde::Serialize;
use std::collections::HashMap;

/// Number of master categories reported by [`CatalogStats::compute`].
pub const TOP_CATEGORIES: usize = 6;

/// Colour words looked up in descriptions, in priority order.
pub const COLOR_KEYWORDS: [&str; 12] = [
  "Black", "White", "Blue", "Red", "Green", "Pink", "Yellow", "Navy", "Grey", "Beige", "Purple",
  "Orange",
];

/// A summary of how usable a catalog is for retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
  pub total_items: usize,
  /// Items whose image reference is a placeholder.
  pub missing_images: usize,
  /// Percentage of items with real imagery, rounded. Zero for an empty catalog.
  pub health_score: u8,
  /// Most common master categories with their counts, largest first.
  pub top_categories: Vec<(String, usize)>,
  /// Items per colour, counting only the first colour found in each description.
  pub colors: Vec<(String, usize)>,
}

impl CatalogStats {
  pub fn compute(catalog: &[CatalogItem], sentinel: &ImageSentinel) -> Self {
    let total_items = catalog.len();
    let missing_images = catalog
      .iter()
      .filter(|item| sentinel.matches(&item.image_ref))
      .count();

    let health_score = if total_items == 0 {
      0
    } else {
      (((total_items - missing_images) as f64 / total_items as f64) * 100.0).round() as u8
    };

    Self {
      total_items,
      missing_images,
      health_score,
      top_categories: top_categories(catalog, TOP_CATEGORIES),
      colors: color_counts(catalog),
    }
  }
}

/// Reduces a composite category to its top-level group.
///
/// "Casual Shoes (Footwear)" becomes "Footwear", "Topwear - Shirts" becomes
/// "Topwear"; anything that reduces to nothing becomes "Other".
pub fn master_category(category: &str) -> String {
  let parenthesised = category
    .split('(')
    .nth(1)
    .map(|rest| rest.replacen(')', "", 1))
    .filter(|master| !master.is_empty());
  if let Some(master) = parenthesised {
    return master;
  }

  let prefix = category.split('-').next().unwrap_or_default().trim();
  if prefix.is_empty() {
    "Other".to_string()
  } else {
    prefix.to_string()
  }
}

fn top_categories(catalog: &[CatalogItem], max: usize) -> Vec<(String, usize)> {
  let mut positions: HashMap<String, usize> = HashMap::new();
  let mut counts: Vec<(String, usize)> = Vec::new();

  for item in catalog {
    let master = master_category(&item.category);
    match positions.get(&master) {
      Some(&pos) => counts[pos].1 += 1,
      None => {
        positions.insert(master.clone(), counts.len());
        counts.push((master, 1));
      }
    }
  }

  // stable: ties keep first-seen order
  counts.sort_by(|a, b| b.1.cmp(&a.1));
  counts.truncate(max);
  counts
}

fn color_counts(catalog: &[CatalogItem]) -> Vec<(String, usize)> {
  let mut counts = [0usize; COLOR_KEYWORDS.len()];

  for item in catalog {
    let description = item.description.to_lowercase();
    if let Some(pos) = COLOR_KEYWORDS
      .iter()
      .position(|color| description.contains(&color.to_lowercase()))
    {
      counts[pos] += 1;
    }
  }

  COLOR_KEYWORDS
    .iter()
    .zip(counts)
    .filter(|(_, count)| *count > 0)
    .map(|(color, count)| (color.to_string(), count))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_master_category() {
    assert_eq!(master_category("Casual Shoes (Footwear)"), "Footwear");
    assert_eq!(master_category("Topwear - Shirts"), "Topwear");
    assert_eq!(master_category("Dresses"), "Dresses");
    assert_eq!(master_category(""), "Other");
    assert_eq!(master_category(" - Belts"), "Other");
  }

  #[test]
  fn test_compute() {
    let catalog = vec![
      CatalogItem::new("1", "Tee", "Topwear - Tshirts", "plain white tee, black trim", "1.jpg"),
      CatalogItem::new("2", "Shirt", "Topwear - Shirts", "navy oxford", "2.jpg"),
      CatalogItem::new("3", "Sneaker", "Casual Shoes (Footwear)", "red canvas", "https://placehold.co/x"),
    ];
    let stats = CatalogStats::compute(&catalog, &ImageSentinel::default());

    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.missing_images, 1);
    assert_eq!(stats.health_score, 67);
    assert_eq!(
      stats.top_categories,
      vec![("Topwear".to_string(), 2), ("Footwear".to_string(), 1)]
    );
    // "black" wins over "white" for item 1 because it comes first in the palette
    assert_eq!(
      stats.colors,
      vec![("Black".to_string(), 1), ("Red".to_string(), 1), ("Navy".to_string(), 1)]
    );
  }

  #[test]
  fn test_empty_catalog() {
    let stats = CatalogStats::compute(&[], &ImageSentinel::default());
    assert_eq!(stats.health_score, 0);
    assert!(stats.top_categories.is_empty());
    assert!(stats.colors.is_empty());
  }
}
