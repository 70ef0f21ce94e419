//! Session store
//!
//! Owns the cart and wishlist for one shopping session. Every mutation that
//! changes an aggregate writes the whole aggregate back to the backend before
//! returning; memory stays authoritative if that write fails.

use std::num::NonZeroU32;

use rusty_money::iso::Currency;
use tracing::{debug, error, warn};

use crate::{
    checkout::{CheckoutError, CheckoutPolicy, receipt::Receipt},
    items::Item,
    notify::{NotificationSink, Severity},
    prices::Price,
    session::{
        cart::{Cart, CartAddition},
        errors::SessionError,
        snapshot::{self, SnapshotError},
        wishlist::Wishlist,
    },
    storage::KeyValueStore,
};

/// Default storage key for the cart snapshot.
pub const DEFAULT_CART_KEY: &str = "tulsi-cart";

/// Default storage key for the wishlist snapshot.
pub const DEFAULT_WISHLIST_KEY: &str = "tulsi-wishlist";

/// Construction options for a [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Key the cart snapshot is stored under.
    pub cart_key: String,

    /// Key the wishlist snapshot is stored under.
    pub wishlist_key: String,

    /// Fail construction on a corrupt snapshot instead of discarding it.
    pub strict: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            wishlist_key: DEFAULT_WISHLIST_KEY.to_string(),
            strict: false,
        }
    }
}

/// Cart and wishlist state for a session, persisted through `S` and reported through `N`.
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStore, N: NotificationSink> {
    backend: S,
    sink: N,
    options: SessionOptions,
    cart: Cart,
    wishlist: Wishlist,
}

impl<S: KeyValueStore, N: NotificationSink> SessionStore<S, N> {
    /// Open a session with default keys, discarding any corrupt snapshot.
    pub fn open(mut backend: S, sink: N) -> Self {
        let options = SessionOptions::default();

        let cart = restore_lenient(&mut backend, &options.cart_key, snapshot::decode_cart);
        let wishlist =
            restore_lenient(&mut backend, &options.wishlist_key, snapshot::decode_wishlist);

        Self {
            backend,
            sink,
            options,
            cart,
            wishlist,
        }
    }

    /// Open a session with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CorruptState`] if `options.strict` is set and a
    /// stored snapshot cannot be restored. Without strict mode this never fails.
    pub fn open_with(
        mut backend: S,
        sink: N,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let (cart, wishlist) = if options.strict {
            (
                restore_strict(&backend, &options.cart_key, snapshot::decode_cart)?,
                restore_strict(&backend, &options.wishlist_key, snapshot::decode_wishlist)?,
            )
        } else {
            (
                restore_lenient(&mut backend, &options.cart_key, snapshot::decode_cart),
                restore_lenient(&mut backend, &options.wishlist_key, snapshot::decode_wishlist),
            )
        };

        Ok(Self {
            backend,
            sink,
            options,
            cart,
            wishlist,
        })
    }

    /// The cart, read-only.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The wishlist, read-only.
    #[must_use]
    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// The options this session was opened with.
    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The persistence backend.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// The notification sink.
    #[must_use]
    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Discard the in-memory state and hand back the backend.
    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Add `quantity` units of `item`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidArgument`] if `quantity` is zero.
    pub fn add_to_cart(&mut self, item: &Item, quantity: u32) -> Result<CartAddition, SessionError> {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return Err(SessionError::InvalidArgument(format!(
                "quantity for {} must be at least 1",
                item.id
            )));
        };

        let addition = self.cart.add(item, quantity);

        debug!(item = %item.id, quantity = quantity.get(), ?addition, "cart add");

        self.persist_cart();

        let message = match addition {
            CartAddition::Added => format!("Added {} to cart", item.name),
            CartAddition::Updated => format!("Updated quantity for {}", item.name),
        };

        self.sink.notify(&message, Severity::Success);

        Ok(addition)
    }

    /// Remove the line for `item_id`. Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, item_id: &str) -> bool {
        let Some(line) = self.cart.remove(item_id) else {
            return false;
        };

        debug!(item = item_id, "cart remove");

        self.persist_cart();
        self.sink.notify(
            &format!("Removed {} from cart", line.item().name),
            Severity::Success,
        );

        true
    }

    /// Set the quantity of an existing line. Zero or below removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidArgument`] if `quantity` exceeds `u32::MAX`.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> Result<(), SessionError> {
        if quantity <= 0 {
            self.remove_from_cart(item_id);

            return Ok(());
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                SessionError::InvalidArgument(format!(
                    "quantity {quantity} for {item_id} is too large"
                ))
            })?;

        if self.cart.set_quantity(item_id, quantity) {
            debug!(item = item_id, quantity = quantity.get(), "cart quantity set");

            self.persist_cart();
        }

        Ok(())
    }

    /// Empty the cart. Always persists and always notifies.
    pub fn clear_cart(&mut self) {
        self.cart.clear();

        debug!("cart cleared");

        self.persist_cart();
        self.sink.notify("Cart cleared", Severity::Success);
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Sum of `price × quantity`, in minor units.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.total_price()
    }

    /// Save `item`. Returns `false`, with an informational notification, if it was already saved.
    pub fn add_to_wishlist(&mut self, item: &Item) -> bool {
        if !self.wishlist.insert(item) {
            self.sink.notify(
                &format!("{} is already in your wishlist", item.name),
                Severity::Info,
            );

            return false;
        }

        debug!(item = %item.id, "wishlist add");

        self.persist_wishlist();
        self.sink
            .notify(&format!("Added {} to wishlist", item.name), Severity::Success);

        true
    }

    /// Remove `item_id` from the wishlist. Returns whether it was present.
    pub fn remove_from_wishlist(&mut self, item_id: &str) -> bool {
        let Some(item) = self.wishlist.remove(item_id) else {
            return false;
        };

        debug!(item = item_id, "wishlist remove");

        self.persist_wishlist();
        self.sink.notify(
            &format!("Removed {} from wishlist", item.name),
            Severity::Success,
        );

        true
    }

    /// Check whether `item_id` is saved.
    #[must_use]
    pub fn is_in_wishlist(&self, item_id: &str) -> bool {
        self.wishlist.contains(item_id)
    }

    /// Empty the wishlist. Always persists and always notifies.
    pub fn clear_wishlist(&mut self) {
        self.wishlist.clear();

        debug!("wishlist cleared");

        self.persist_wishlist();
        self.sink.notify("Wishlist cleared", Severity::Success);
    }

    /// Remove `item` if saved, otherwise save it. Returns whether it is saved afterwards.
    pub fn toggle_wishlist(&mut self, item: &Item) -> bool {
        if self.remove_from_wishlist(item.id.as_str()) {
            false
        } else {
            self.add_to_wishlist(item)
        }
    }

    /// Build a receipt for the current cart and then clear it.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart is empty or the totals overflow.
    /// The cart is left untouched on error.
    pub fn checkout(
        &mut self,
        policy: &CheckoutPolicy,
        currency: &'static Currency,
    ) -> Result<Receipt, CheckoutError> {
        let receipt = Receipt::new(&self.cart, policy, currency)?;

        debug!(
            items = receipt.summary().total_items,
            grand_total = receipt.summary().grand_total.minor_units(),
            "checkout"
        );

        self.clear_cart();

        Ok(receipt)
    }

    fn persist_cart(&mut self) {
        let encoded = snapshot::encode_cart(&self.cart);

        write_snapshot(
            &mut self.backend,
            &self.sink,
            &self.options.cart_key,
            encoded,
            "cart",
        );
    }

    fn persist_wishlist(&mut self) {
        let encoded = snapshot::encode_wishlist(&self.wishlist);

        write_snapshot(
            &mut self.backend,
            &self.sink,
            &self.options.wishlist_key,
            encoded,
            "wishlist",
        );
    }
}

fn write_snapshot<S: KeyValueStore, N: NotificationSink>(
    backend: &mut S,
    sink: &N,
    key: &str,
    encoded: Result<String, serde_json::Error>,
    what: &str,
) {
    let result = match encoded {
        Ok(json) => backend.set(key, &json).map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };

    match result {
        Ok(()) => debug!(key, "snapshot written"),
        Err(reason) => {
            error!(key, %reason, "failed to persist snapshot");
            sink.notify(
                &format!("Could not save your {what}; changes may be lost on reload"),
                Severity::Error,
            );
        }
    }
}

fn restore_strict<S, T>(
    backend: &S,
    key: &str,
    decode: fn(&str) -> Result<T, SnapshotError>,
) -> Result<T, SessionError>
where
    S: KeyValueStore,
    T: Default,
{
    let Some(raw) = read_snapshot(backend, key) else {
        return Ok(T::default());
    };

    decode(&raw).map_err(|source| SessionError::CorruptState {
        key: key.to_string(),
        source,
    })
}

fn restore_lenient<S, T>(
    backend: &mut S,
    key: &str,
    decode: fn(&str) -> Result<T, SnapshotError>,
) -> T
where
    S: KeyValueStore,
    T: Default,
{
    let Some(raw) = read_snapshot(backend, key) else {
        return T::default();
    };

    match decode(&raw) {
        Ok(restored) => restored,
        Err(err) => {
            warn!(key, error = %err, "discarding corrupt snapshot");

            if let Err(err) = backend.remove(key) {
                warn!(key, error = %err, "failed to remove corrupt snapshot");
            }

            T::default()
        }
    }
}

/// Backend read failures count as "no snapshot".
fn read_snapshot<S: KeyValueStore>(backend: &S, key: &str) -> Option<String> {
    match backend.get(key) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key, error = %err, "failed to read snapshot, starting empty");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        notify::{Notification, NotificationQueue},
        storage::{MemoryStore, StorageError},
    };

    use super::*;

    fn montblanc() -> Item {
        Item::new("1", "Montblanc MB0036O Optical Frame", Price::new(34_999))
            .with_brand("Montblanc")
            .with_category("optical")
    }

    fn wayfarer() -> Item {
        Item::new("2", "Ray-Ban Wayfarer Classic", Price::new(12_999))
            .with_brand("Ray-Ban")
            .with_category("sunglasses")
    }

    fn store() -> SessionStore<MemoryStore, NotificationQueue> {
        SessionStore::open(MemoryStore::new(), NotificationQueue::new())
    }

    fn messages(queue: &NotificationQueue) -> Vec<(String, Severity)> {
        queue
            .drain()
            .into_iter()
            .map(|Notification { message, severity }| (message, severity))
            .collect()
    }

    /// Backend whose writes always fail.
    #[derive(Debug, Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn add_to_cart_sets_totals() -> TestResult {
        let mut store = store();

        store.add_to_cart(&montblanc(), 2)?;

        assert_eq!(store.total_items(), 2);
        assert_eq!(store.total_price(), Price::new(2 * 34_999));

        Ok(())
    }

    #[test]
    fn add_to_cart_twice_accumulates_on_one_line() -> TestResult {
        let mut store = store();

        assert_eq!(store.add_to_cart(&montblanc(), 1)?, CartAddition::Added);
        assert_eq!(store.add_to_cart(&montblanc(), 3)?, CartAddition::Updated);

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().line("1").map(|line| line.quantity()), Some(4));

        assert_eq!(
            messages(store.sink()),
            vec![
                (
                    "Added Montblanc MB0036O Optical Frame to cart".to_string(),
                    Severity::Success
                ),
                (
                    "Updated quantity for Montblanc MB0036O Optical Frame".to_string(),
                    Severity::Success
                ),
            ]
        );

        Ok(())
    }

    #[test]
    fn add_to_cart_zero_quantity_is_rejected_without_side_effects() {
        let mut store = store();

        let result = store.add_to_cart(&montblanc(), 0);

        assert!(matches!(result, Err(SessionError::InvalidArgument(_))));
        assert!(store.cart().is_empty());
        assert!(store.sink().is_empty());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn every_cart_mutation_writes_full_snapshot() -> TestResult {
        let mut store = store();

        store.add_to_cart(&montblanc(), 1)?;
        store.add_to_cart(&wayfarer(), 2)?;

        let raw = store.backend().get(DEFAULT_CART_KEY)?.unwrap_or_default();

        assert_eq!(snapshot::decode_cart(&raw)?, *store.cart());

        Ok(())
    }

    #[test]
    fn remove_from_cart_notifies_only_when_present() -> TestResult {
        let mut store = store();

        store.add_to_cart(&wayfarer(), 1)?;
        store.sink().drain();

        assert!(!store.remove_from_cart("404"));
        assert!(store.sink().is_empty());

        assert!(store.remove_from_cart("2"));
        assert_eq!(
            messages(store.sink()),
            vec![(
                "Removed Ray-Ban Wayfarer Classic from cart".to_string(),
                Severity::Success
            )]
        );
        assert_eq!(store.backend().get(DEFAULT_CART_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn update_quantity_is_absolute_and_silent() -> TestResult {
        let mut store = store();

        store.add_to_cart(&wayfarer(), 5)?;
        store.sink().drain();

        store.update_quantity("2", 2)?;

        assert_eq!(store.total_items(), 2);
        assert!(store.sink().is_empty());

        let raw = store.backend().get(DEFAULT_CART_KEY)?.unwrap_or_default();
        let stored = snapshot::decode_cart(&raw)?;

        assert_eq!(stored, *store.cart());
        assert_eq!(stored.line("2").map(|line| line.quantity()), Some(2));

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_or_below_matches_remove() -> TestResult {
        for quantity in [0, -1, i64::MIN] {
            let mut updated = store();
            let mut removed = store();

            for session in [&mut updated, &mut removed] {
                session.add_to_cart(&montblanc(), 1)?;
                session.add_to_cart(&wayfarer(), 3)?;
            }

            updated.update_quantity("2", quantity)?;
            removed.remove_from_cart("2");

            assert_eq!(updated.cart(), removed.cart());
            assert_eq!(
                updated.backend().get(DEFAULT_CART_KEY)?,
                removed.backend().get(DEFAULT_CART_KEY)?
            );
        }

        Ok(())
    }

    #[test]
    fn update_quantity_for_missing_line_is_noop() -> TestResult {
        let mut store = store();

        store.update_quantity("missing", 3)?;

        assert!(store.cart().is_empty());
        assert!(store.backend().get(DEFAULT_CART_KEY)?.is_none());

        Ok(())
    }

    #[test]
    fn update_quantity_too_large_is_rejected() -> TestResult {
        let mut store = store();

        store.add_to_cart(&wayfarer(), 1)?;

        let result = store.update_quantity("2", i64::from(u32::MAX) + 1);

        assert!(matches!(result, Err(SessionError::InvalidArgument(_))));
        assert_eq!(store.total_items(), 1);

        Ok(())
    }

    #[test]
    fn clear_cart_twice_is_empty_and_notifies_each_time() -> TestResult {
        let mut store = store();

        store.add_to_cart(&wayfarer(), 1)?;
        store.sink().drain();

        store.clear_cart();
        assert!(store.cart().is_empty());

        store.clear_cart();
        assert!(store.cart().is_empty());

        assert_eq!(
            messages(store.sink()),
            vec![
                ("Cart cleared".to_string(), Severity::Success),
                ("Cart cleared".to_string(), Severity::Success),
            ]
        );

        Ok(())
    }

    #[test]
    fn add_to_wishlist_twice_reports_already_present() {
        let mut store = store();

        assert!(store.add_to_wishlist(&montblanc()));
        assert!(!store.add_to_wishlist(&montblanc()));

        assert_eq!(store.wishlist().len(), 1);
        assert_eq!(
            messages(store.sink()),
            vec![
                (
                    "Added Montblanc MB0036O Optical Frame to wishlist".to_string(),
                    Severity::Success
                ),
                (
                    "Montblanc MB0036O Optical Frame is already in your wishlist".to_string(),
                    Severity::Info
                ),
            ]
        );
    }

    #[test]
    fn remove_from_wishlist_absent_is_silent() {
        let mut store = store();

        assert!(!store.remove_from_wishlist("1"));
        assert!(store.sink().is_empty());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn toggle_wishlist_twice_restores_membership() {
        let mut store = store();

        assert!(store.toggle_wishlist(&wayfarer()));
        assert!(store.is_in_wishlist("2"));

        assert!(!store.toggle_wishlist(&wayfarer()));
        assert!(!store.is_in_wishlist("2"));
    }

    #[test]
    fn toggle_wishlist_removes_saved_item() -> TestResult {
        let mut store = store();

        store.add_to_wishlist(&montblanc());
        store.add_to_wishlist(&wayfarer());
        store.sink().drain();

        assert!(!store.toggle_wishlist(&wayfarer()));
        assert!(!store.is_in_wishlist("2"));
        assert_eq!(
            messages(store.sink()),
            vec![(
                "Removed Ray-Ban Wayfarer Classic from wishlist".to_string(),
                Severity::Success
            )]
        );

        let raw = store.backend().get(DEFAULT_WISHLIST_KEY)?.unwrap_or_default();

        assert_eq!(snapshot::decode_wishlist(&raw)?, *store.wishlist());

        Ok(())
    }

    #[test]
    fn wishlist_removals_write_full_snapshot() -> TestResult {
        let mut store = store();

        store.add_to_wishlist(&montblanc());
        store.add_to_wishlist(&wayfarer());

        assert!(store.remove_from_wishlist("1"));

        let raw = store.backend().get(DEFAULT_WISHLIST_KEY)?.unwrap_or_default();
        let stored = snapshot::decode_wishlist(&raw)?;

        assert_eq!(stored, *store.wishlist());
        assert!(stored.contains("2"));
        assert!(!stored.contains("1"));

        store.clear_wishlist();

        assert_eq!(
            store.backend().get(DEFAULT_WISHLIST_KEY)?.as_deref(),
            Some("[]")
        );

        Ok(())
    }

    #[test]
    fn clear_wishlist_always_notifies() {
        let mut store = store();

        store.clear_wishlist();

        assert_eq!(
            messages(store.sink()),
            vec![("Wishlist cleared".to_string(), Severity::Success)]
        );
    }

    #[test]
    fn reopening_restores_both_aggregates() -> TestResult {
        let mut store = store();

        store.add_to_cart(&wayfarer(), 2)?;
        store.add_to_cart(&montblanc(), 1)?;
        store.add_to_wishlist(&montblanc());

        let cart = store.cart().clone();
        let wishlist = store.wishlist().clone();

        let reopened = SessionStore::open(store.into_backend(), NotificationQueue::new());

        assert_eq!(*reopened.cart(), cart);
        assert_eq!(*reopened.wishlist(), wishlist);
        assert!(reopened.sink().is_empty());

        Ok(())
    }

    #[test]
    fn corrupt_cart_snapshot_starts_empty_and_is_discarded() -> TestResult {
        let mut backend = MemoryStore::new();
        backend.set(DEFAULT_CART_KEY, "{not json")?;
        backend.set(DEFAULT_WISHLIST_KEY, &serde_json::to_string(&[wayfarer()])?)?;

        let store = SessionStore::open(backend, NotificationQueue::new());

        assert!(store.cart().is_empty());
        assert!(store.is_in_wishlist("2"));
        assert!(store.backend().get(DEFAULT_CART_KEY)?.is_none());

        Ok(())
    }

    #[test]
    fn strict_mode_surfaces_corrupt_snapshot() -> TestResult {
        let mut backend = MemoryStore::new();
        backend.set(DEFAULT_WISHLIST_KEY, "{not json")?;

        let options = SessionOptions {
            strict: true,
            ..SessionOptions::default()
        };

        let result = SessionStore::open_with(backend, NotificationQueue::new(), options);

        assert!(matches!(
            result,
            Err(SessionError::CorruptState { ref key, .. }) if key == DEFAULT_WISHLIST_KEY
        ));

        Ok(())
    }

    #[test]
    fn custom_keys_keep_sessions_apart() -> TestResult {
        let mut backend = MemoryStore::new();

        {
            let options = SessionOptions {
                cart_key: "guest-cart".to_string(),
                wishlist_key: "guest-wishlist".to_string(),
                strict: false,
            };
            let mut guest = SessionStore::open_with(&mut backend, NotificationQueue::new(), options)?;
            guest.add_to_cart(&wayfarer(), 1)?;
        }

        let default = SessionStore::open(&mut backend, NotificationQueue::new());

        assert!(default.cart().is_empty());
        assert!(backend.get("guest-cart")?.is_some());

        Ok(())
    }

    #[test]
    fn write_failure_keeps_memory_and_reports_error() -> TestResult {
        let mut store = SessionStore::open(ReadOnlyStore::default(), NotificationQueue::new());

        store.add_to_cart(&wayfarer(), 1)?;

        assert_eq!(store.total_items(), 1);
        assert_eq!(
            messages(store.sink()),
            vec![
                (
                    "Could not save your cart; changes may be lost on reload".to_string(),
                    Severity::Error
                ),
                (
                    "Added Ray-Ban Wayfarer Classic to cart".to_string(),
                    Severity::Success
                ),
            ]
        );

        Ok(())
    }

    #[test]
    fn checkout_returns_receipt_and_clears_cart() -> TestResult {
        let mut store = store();

        store.add_to_cart(&wayfarer(), 2)?;

        let receipt = store.checkout(&CheckoutPolicy::default(), rusty_money::iso::INR)?;

        assert_eq!(receipt.summary().subtotal, Price::new(25_998));
        assert!(store.cart().is_empty());
        assert_eq!(store.backend().get(DEFAULT_CART_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn checkout_of_empty_cart_fails() {
        let mut store = store();

        let result = store.checkout(&CheckoutPolicy::default(), rusty_money::iso::INR);

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert!(store.sink().is_empty());
    }
}
