//! Checkout
//!
//! Order totals derived from a cart: subtotal, tax, flat shipping and the
//! grand total, all in minor currency units.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::{prices::Price, session::cart::Cart};

pub mod receipt;

/// Errors that can occur while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Tax could not be represented in minor units.
    #[error("tax on {0} minor units overflowed")]
    TaxOverflow(u64),

    /// Writing the receipt failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Pricing rules applied at checkout.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutPolicy {
    /// Tax charged on the subtotal, as a fraction (0.05 is 5%).
    pub tax_rate: Percentage,

    /// Flat shipping fee, charged only for non-empty carts.
    pub shipping: Price,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Percentage::from(Decimal::new(5, 2)),
            shipping: Price::new(999),
        }
    }
}

/// Totals for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    /// Units across all lines
    pub total_items: u64,

    /// Sum of line totals before tax and shipping
    pub subtotal: Price,

    /// Tax on the subtotal, rounded to whole minor units
    pub tax: Price,

    /// Shipping fee
    pub shipping: Price,

    /// `subtotal + tax + shipping`
    pub grand_total: Price,
}

impl OrderSummary {
    /// Compute the totals for `cart` under `policy`.
    ///
    /// An empty cart yields all-zero totals, shipping included.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::TaxOverflow`] if the tax does not fit in `u64`.
    pub fn from_cart(cart: &Cart, policy: &CheckoutPolicy) -> Result<Self, CheckoutError> {
        let subtotal = cart.total_price();
        let tax = tax_on(subtotal, policy.tax_rate)?;
        let shipping = if cart.is_empty() {
            Price::ZERO
        } else {
            policy.shipping
        };

        Ok(Self {
            total_items: cart.total_items(),
            subtotal,
            tax,
            shipping,
            grand_total: subtotal.saturating_add(tax).saturating_add(shipping),
        })
    }
}

/// Tax in whole minor units, rounding midpoints away from zero.
fn tax_on(subtotal: Price, rate: Percentage) -> Result<Price, CheckoutError> {
    let applied = rate * Decimal::from(subtotal.minor_units());

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .map(Price::new)
        .ok_or(CheckoutError::TaxOverflow(subtotal.minor_units()))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use testresult::TestResult;

    use crate::items::Item;

    use super::*;

    fn cart_of(lines: &[(u64, u32)]) -> Cart {
        let mut cart = Cart::new();

        for (idx, &(price, quantity)) in lines.iter().enumerate() {
            let item = Item::new(idx.to_string(), format!("Frame {idx}"), Price::new(price));
            cart.add(&item, NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN));
        }

        cart
    }

    #[test]
    fn default_policy_is_five_percent_and_flat_shipping() {
        let policy = CheckoutPolicy::default();

        assert_eq!(policy.shipping, Price::new(999));
        assert_eq!(policy.tax_rate * Decimal::ONE_HUNDRED, Decimal::new(5, 0));
    }

    #[test]
    fn summary_adds_tax_and_shipping() -> TestResult {
        let cart = cart_of(&[(12_000, 2), (6_000, 1)]);

        let summary = OrderSummary::from_cart(&cart, &CheckoutPolicy::default())?;

        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.subtotal, Price::new(30_000));
        assert_eq!(summary.tax, Price::new(1_500));
        assert_eq!(summary.shipping, Price::new(999));
        assert_eq!(summary.grand_total, Price::new(32_499));

        Ok(())
    }

    #[test]
    fn tax_rounds_midpoints_away_from_zero() -> TestResult {
        // 5% of 12_999 is 649.95, 5% of 10 is 0.5
        assert_eq!(
            tax_on(Price::new(12_999), CheckoutPolicy::default().tax_rate)?,
            Price::new(650)
        );
        assert_eq!(
            tax_on(Price::new(10), CheckoutPolicy::default().tax_rate)?,
            Price::new(1)
        );

        Ok(())
    }

    #[test]
    fn empty_cart_has_no_shipping() -> TestResult {
        let summary = OrderSummary::from_cart(&Cart::new(), &CheckoutPolicy::default())?;

        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.grand_total, Price::ZERO);

        Ok(())
    }

    #[test]
    fn custom_policy_is_respected() -> TestResult {
        let policy = CheckoutPolicy {
            tax_rate: Percentage::from(Decimal::new(18, 2)),
            shipping: Price::ZERO,
        };

        let summary = OrderSummary::from_cart(&cart_of(&[(10_000, 1)]), &policy)?;

        assert_eq!(summary.tax, Price::new(1_800));
        assert_eq!(summary.grand_total, Price::new(11_800));

        Ok(())
    }
}
