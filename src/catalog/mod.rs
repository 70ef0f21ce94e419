//! Catalog
//!
//! The read-only product list the session store's callers browse. Items are
//! loaded from YAML fixtures under `<base>/catalog/<name>.yml`, with prices
//! written as `"AMOUNT CURRENCY"` (e.g. `"349.99 INR"`).

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashSet;
use rusty_money::iso::{Currency, EUR, GBP, INR, USD};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    items::{Item, ItemId},
    prices::Price,
};

pub mod filter;

pub use filter::CatalogFilter;

/// Catalog Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The same id is used by two items
    #[error("Duplicate item id: {0}")]
    DuplicateItem(ItemId),

    /// The catalog has no items, so its currency is unknown
    #[error("Catalog has no items")]
    Empty,

    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(String),
}

/// Source of catalog items.
pub trait CatalogProvider {
    /// All items, in catalog order.
    fn list_items(&self) -> Vec<Item>;

    /// Look up one item by id.
    fn find(&self, item_id: &str) -> Option<Item> {
        self.list_items()
            .into_iter()
            .find(|item| item.id == *item_id)
    }
}

/// Wrapper for catalog items in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    items: Vec<ItemFixture>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
struct ItemFixture {
    id: String,
    name: String,

    /// Price (e.g., "349.99 INR")
    price: String,

    #[serde(default)]
    image: String,

    #[serde(default)]
    category: String,

    #[serde(default)]
    brand: String,

    #[serde(default)]
    description: String,
}

/// An ordered, single-currency list of items with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load `<base_path>/catalog/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its items
    /// are invalid (see [`Catalog::from_yaml`]).
    pub fn load(base_path: impl AsRef<Path>, name: &str) -> Result<Self, CatalogError> {
        let file_path = base_path
            .as_ref()
            .join("catalog")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let catalog = Self::from_yaml(&contents)?;

        debug!(
            path = %file_path.display(),
            items = catalog.len(),
            currency = catalog.currency.iso_alpha_code,
            "loaded catalog"
        );

        Ok(catalog)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid, items
    /// use different currencies, an id repeats, or there are no items.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        let mut currency: Option<&'static Currency> = None;
        let mut items = Vec::with_capacity(fixture.items.len());

        for item_fixture in fixture.items {
            let (minor_units, item_currency) = parse_price(&item_fixture.price)?;

            if let Some(existing_currency) = currency {
                if existing_currency != item_currency {
                    return Err(CatalogError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        item_currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                currency = Some(item_currency);
            }

            items.push(Item {
                id: ItemId::new(item_fixture.id),
                name: item_fixture.name,
                price: Price::new(minor_units),
                image: item_fixture.image,
                category: item_fixture.category,
                brand: item_fixture.brand,
                description: item_fixture.description,
            });
        }

        Self::from_items(items, currency.ok_or(CatalogError::Empty)?)
    }

    /// Build a catalog from items already priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItem`] if two items share an id.
    pub fn from_items(items: Vec<Item>, currency: &'static Currency) -> Result<Self, CatalogError> {
        let mut seen = FxHashSet::default();

        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
        }

        Ok(Self { items, currency })
    }

    /// All items, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Currency every price in the catalog is denominated in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Get the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no item has that id.
    pub fn get(&self, item_id: &str) -> Result<&Item, CatalogError> {
        self.items
            .iter()
            .find(|item| item.id == *item_id)
            .ok_or_else(|| CatalogError::NotFound(item_id.to_string()))
    }

    /// The first `count` items, for a landing page.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Item] {
        self.items.get(..count).unwrap_or(&self.items)
    }

    /// Items matching `filter`, in catalog order.
    pub fn filter<'a>(&'a self, filter: &'a CatalogFilter) -> impl Iterator<Item = &'a Item> {
        self.items.iter().filter(|item| filter.matches(item))
    }

    /// Distinct brands, in order of first appearance.
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        distinct(self.items.iter().map(|item| item.brand.as_str()))
    }

    /// Distinct categories, in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.items.iter().map(|item| item.category.as_str()))
    }
}

impl CatalogProvider for Catalog {
    fn list_items(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn find(&self, item_id: &str) -> Option<Item> {
        self.get(item_id).ok().cloned()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = FxHashSet::default();

    values
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .collect()
}

/// Parse price string (e.g., "349.99 INR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(u64, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_u64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "INR" => INR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(CatalogError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
