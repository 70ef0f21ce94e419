//! Tulsi prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, CatalogFilter, CatalogProvider},
    checkout::{CheckoutError, CheckoutPolicy, OrderSummary, receipt::Receipt},
    items::{Item, ItemId},
    notify::{Notification, NotificationQueue, NotificationSink, NoopSink, Severity, TracingSink},
    prices::Price,
    session::{
        Cart, CartAddition, CartLine, SessionError, SessionOptions, SessionStore, SnapshotError,
        Wishlist,
    },
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
};
