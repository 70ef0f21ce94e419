//! Tulsi
//!
//! Tulsi is the shopping-session core of an eyewear storefront: a catalog to browse, a cart and
//! wishlist that survive restarts, and checkout totals with a printable receipt.

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod items;
pub mod notify;
pub mod observability;
pub mod prelude;
pub mod prices;
pub mod session;
pub mod storage;
