//! Snapshots
//!
//! Whole-aggregate JSON documents written after every mutation. The cart is
//! an array of `{ "item": {..}, "quantity": n }`; the wishlist is an array of
//! item records.

use thiserror::Error;

use crate::{
    items::{Item, ItemId},
    session::{
        cart::{Cart, CartLine},
        wishlist::Wishlist,
    },
};

/// Why a stored snapshot could not be restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not JSON, or JSON of the wrong shape (including zero quantities).
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The same item appears on two lines or entries.
    #[error("item {0} appears more than once")]
    DuplicateItem(ItemId),
}

/// Serialize the cart lines.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn encode_cart(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart.lines())
}

/// Restore a cart from its snapshot.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if the snapshot is malformed or repeats an item.
pub fn decode_cart(raw: &str) -> Result<Cart, SnapshotError> {
    let lines: Vec<CartLine> = serde_json::from_str(raw)?;

    Cart::from_lines(lines).map_err(SnapshotError::DuplicateItem)
}

/// Serialize the wishlist entries.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn encode_wishlist(wishlist: &Wishlist) -> Result<String, serde_json::Error> {
    serde_json::to_string(wishlist.entries())
}

/// Restore a wishlist from its snapshot.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if the snapshot is malformed or repeats an item.
pub fn decode_wishlist(raw: &str) -> Result<Wishlist, SnapshotError> {
    let entries: Vec<Item> = serde_json::from_str(raw)?;

    Wishlist::from_entries(entries).map_err(SnapshotError::DuplicateItem)
}
