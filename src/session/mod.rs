//! Shopping session
//!
//! The cart and wishlist aggregates, their persisted snapshots, and the
//! [`SessionStore`] that ties them to a storage backend and a notification sink.

pub mod cart;
pub mod errors;
pub mod snapshot;
pub mod store;
pub mod wishlist;

pub use cart::{Cart, CartAddition, CartLine};
pub use errors::SessionError;
pub use snapshot::SnapshotError;
pub use store::{DEFAULT_CART_KEY, DEFAULT_WISHLIST_KEY, SessionOptions, SessionStore};
pub use wishlist::Wishlist;
