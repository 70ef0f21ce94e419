//! Wishlist aggregate

use crate::items::{Item, ItemId};

/// Saved items, unique by id, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    entries: Vec<Item>,
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a wishlist from entries, returning the first repeated item id if any.
    pub(crate) fn from_entries(entries: Vec<Item>) -> Result<Self, ItemId> {
        for (idx, item) in entries.iter().enumerate() {
            if entries.iter().skip(idx + 1).any(|other| other.id == item.id) {
                return Err(item.id.clone());
            }
        }

        Ok(Self { entries })
    }

    /// Read-only view of the entries.
    #[must_use]
    pub fn entries(&self) -> &[Item] {
        &self.entries
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter()
    }

    /// Check if an item is saved.
    #[must_use]
    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.iter().any(|item| item.id == *item_id)
    }

    /// Get the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends the item unless it is already present. Returns whether it was added.
    pub(crate) fn insert(&mut self, item: &Item) -> bool {
        if self.contains(item.id.as_str()) {
            return false;
        }

        self.entries.push(item.clone());

        true
    }

    pub(crate) fn remove(&mut self, item_id: &str) -> Option<Item> {
        let idx = self.entries.iter().position(|item| item.id == *item_id)?;

        Some(self.entries.remove(idx))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a Wishlist {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
