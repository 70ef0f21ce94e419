//! Prices

use std::ops::Deref;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Represents a price in minor currency units (paise, pence, cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    value: u64,
}

impl Price {
    /// Zero in any currency.
    pub const ZERO: Self = Self { value: 0 };

    /// Creates a new Price
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// Minor units held by this price.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.value
    }

    /// Multiplies by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub const fn times(self, quantity: u64) -> Self {
        Price {
            value: self.value.saturating_mul(quantity),
        }
    }

    /// Adds two prices, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Price {
            value: self.value.saturating_add(other.value),
        }
    }

    /// Converts to a [`Money`] value for display.
    ///
    /// Amounts beyond `i64::MAX` minor units are clamped.
    #[must_use]
    pub fn to_money(self, currency: &Currency) -> Money<'_, Currency> {
        let minor = i64::try_from(self.value).unwrap_or(i64::MAX);

        Money::from_minor(minor, currency)
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Price { value }
    }
}
