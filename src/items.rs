//! Items
//!
//! Catalog entries as the session store sees them. An [`Item`] is a read-only
//! record: carts and wishlists hold copies of it, they never edit it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::prices::Price;

/// Opaque catalog identifier, unique within one catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A purchasable product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Catalog identifier
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Unit price in minor currency units
    pub price: Price,

    /// Display asset reference, not interpreted
    #[serde(default)]
    pub image: String,

    /// Category slug (e.g. `sunglasses`)
    #[serde(default)]
    pub category: String,

    /// Brand display name
    #[serde(default)]
    pub brand: String,

    /// Long-form description
    #[serde(default)]
    pub description: String,
}

impl Item {
    /// Creates an item with the given identity and price and empty display fields.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: String::new(),
            category: String::new(),
            brand: String::new(),
            description: String::new(),
        }
    }

    /// Sets the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Sets the category slug.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
