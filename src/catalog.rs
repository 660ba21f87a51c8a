//! Catalog snapshots and the store that hands them out.
//!
//! Retrieval never sees a catalog that can change under it. Writers build a
//! new [`Catalog`] and swap it into the [`CatalogStore`]; readers take a
//! snapshot, which is a reference-counted pointer to an immutable slice.

use crate::error::Result;
use crate::types::{CatalogItem, ItemId};
use parking_lot::RwLock;
use std::io::Read;
use std::ops::Deref;
use std::sync::Arc;

/// An immutable, cheaply clonable view of the catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
  items: Arc<[CatalogItem]>,
}

impl Default for Catalog {
  fn default() -> Self {
    Self::from_items(Vec::new())
  }
}

impl Catalog {
  pub fn from_items(items: Vec<CatalogItem>) -> Self {
    Self {
      items: items.into(),
    }
  }

  /// Parses a JSON array of items.
  ///
  /// Absent text fields become empty strings and `image` is accepted as an
  /// alias for `image_ref`.
  pub fn from_json_str(json: &str) -> Result<Self> {
    let items: Vec<CatalogItem> = serde_json::from_str(json)?;
    Ok(Self::from_items(items))
  }

  pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
    let items: Vec<CatalogItem> = serde_json::from_reader(reader)?;
    Ok(Self::from_items(items))
  }

  /// Looks up the first item with the given id.
  pub fn get(&self, id: &str) -> Option<&CatalogItem> {
    self.items.iter().find(|item| item.id == id)
  }

  pub fn items(&self) -> &[CatalogItem] {
    &self.items
  }
}

impl Deref for Catalog {
  type Target = [CatalogItem];

  fn deref(&self) -> &Self::Target {
    &self.items
  }
}

impl From<Vec<CatalogItem>> for Catalog {
  fn from(items: Vec<CatalogItem>) -> Self {
    Self::from_items(items)
  }
}

impl FromIterator<CatalogItem> for Catalog {
  fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
    Self::from_items(iter.into_iter().collect())
  }
}

/// Shared holder for the current catalog.
///
/// Every mutation builds a fresh [`Catalog`]; snapshots taken earlier keep
/// the version they were taken from.
#[derive(Debug, Default)]
pub struct CatalogStore {
  current: RwLock<Catalog>,
}

impl CatalogStore {
  pub fn new(catalog: Catalog) -> Self {
    Self {
      current: RwLock::new(catalog),
    }
  }

  /// Returns the current catalog. Later writes do not affect it.
  pub fn snapshot(&self) -> Catalog {
    self.current.read().clone()
  }

  /// Replaces the whole catalog, e.g. after a sync or cache load.
  pub fn replace(&self, catalog: Catalog) {
    *self.current.write() = catalog;
  }

  /// Inserts `item`, replacing any existing item with the same id.
  pub fn put(&self, item: CatalogItem) {
    let mut current = self.current.write();
    let mut items = current.items.to_vec();
    match items.iter_mut().find(|existing| existing.id == item.id) {
      Some(existing) => *existing = item,
      None => items.push(item),
    }
    *current = Catalog::from_items(items);
  }

  /// Removes every item with the given id. Returns whether anything was removed.
  pub fn remove(&self, id: &ItemId) -> bool {
    let mut current = self.current.write();
    if !current.items.iter().any(|item| &item.id == id) {
      return false;
    }
    let items = current.items.iter().filter(|item| &item.id != id).cloned().collect();
    *current = Catalog::from_items(items);
    true
  }

  pub fn len(&self) -> usize {
    self.current.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
