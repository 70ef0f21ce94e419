//! Cart aggregate

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{
    items::{Item, ItemId},
    prices::Price,
};

/// One item and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    item: Item,
    quantity: NonZeroU32,
}

impl CartLine {
    /// Creates a line for `quantity` units of `item`.
    #[must_use]
    pub fn new(item: Item, quantity: NonZeroU32) -> Self {
        Self { item, quantity }
    }

    /// The item on this line.
    #[must_use]
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Units of the item, always at least one.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price.times(u64::from(self.quantity.get()))
    }
}

/// Outcome of adding to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAddition {
    /// A new line was appended.
    Added,

    /// An existing line's quantity was increased.
    Updated,
}

/// Cart
///
/// Ordered lines, at most one per item id. Lines keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from lines, returning the first repeated item id if any.
    pub(crate) fn from_lines(lines: Vec<CartLine>) -> Result<Self, ItemId> {
        for (idx, line) in lines.iter().enumerate() {
            let repeated = lines
                .iter()
                .skip(idx + 1)
                .any(|other| other.item.id == line.item.id);

            if repeated {
                return Err(line.item.id.clone());
            }
        }

        Ok(Self { lines })
    }

    /// Read-only view of the lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Find the line for an item.
    #[must_use]
    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item.id == *item_id)
    }

    /// Get the number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .fold(0, u64::saturating_add)
    }

    /// Sum of `price × quantity` across all lines, in minor units.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Price::ZERO, Price::saturating_add)
    }

    pub(crate) fn add(&mut self, item: &Item, quantity: NonZeroU32) -> CartAddition {
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity.get());

            return CartAddition::Updated;
        }

        self.lines.push(CartLine::new(item.clone(), quantity));

        CartAddition::Added
    }

    pub(crate) fn remove(&mut self, item_id: &str) -> Option<CartLine> {
        let idx = self.lines.iter().position(|line| line.item.id == *item_id)?;

        Some(self.lines.remove(idx))
    }

    /// Sets an existing line's quantity. Returns `false` if there is no such line.
    pub(crate) fn set_quantity(&mut self, item_id: &str, quantity: NonZeroU32) -> bool {
        match self.lines.iter_mut().find(|line| line.item.id == *item_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
