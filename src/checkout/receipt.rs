//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};

use crate::{
    checkout::{CheckoutError, CheckoutPolicy, OrderSummary},
    prices::Price,
    session::cart::{Cart, CartLine},
};

/// Itemised record of a checked-out cart.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Lines as they were in the cart at checkout
    lines: Vec<CartLine>,

    /// Totals for the lines
    summary: OrderSummary,

    /// Tax rate the summary was computed with
    tax_rate: Percentage,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl Receipt {
    /// Build a receipt for the cart's current contents.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines, or a
    /// [`CheckoutError`] if the totals cannot be computed.
    pub fn new(
        cart: &Cart,
        policy: &CheckoutPolicy,
        currency: &'static Currency,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            lines: cart.lines().to_vec(),
            summary: OrderSummary::from_cart(cart, policy)?,
            tax_rate: policy.tax_rate,
            currency,
        })
    }

    /// Totals for the order.
    #[must_use]
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// Purchased lines, in cart order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Writes the receipt table and totals.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), CheckoutError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Brand", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            let item = line.item();

            builder.push_record([
                format!("#{:<3}", idx + 1),
                item.name.clone(),
                item.brand.clone(),
                self.money(item.price),
                line.quantity().to_string(),
                self.money(line.line_total()),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)
    }

    /// Renders the receipt into a string.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if rendering fails.
    pub fn render(&self) -> Result<String, CheckoutError> {
        let mut out = Vec::new();

        self.write_to(&mut out)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), CheckoutError> {
        let summary = &self.summary;

        let shipping = if summary.shipping == Price::ZERO {
            "Free".to_string()
        } else {
            self.money(summary.shipping)
        };

        let rows = [
            (
                format!(" Subtotal ({} items):", summary.total_items),
                self.money(summary.subtotal),
            ),
            (
                format!(" Tax ({}%):", percent_points(self.tax_rate)),
                self.money(summary.tax),
            ),
            (" Shipping:".to_string(), shipping),
            (" Total:".to_string(), self.money(summary.grand_total)),
        ];

        let label_width = rows.iter().map(|(label, _)| label.chars().count()).max();
        let value_width = rows.iter().map(|(_, value)| value.chars().count()).max();

        for (label, value) in &rows {
            writeln!(
                out,
                "{label:>label_width$}  {value:>value_width$}  ",
                label_width = label_width.unwrap_or_default(),
                value_width = value_width.unwrap_or_default(),
            )?;
        }

        writeln!(out)?;

        Ok(())
    }

    fn money(&self, price: Price) -> String {
        price.to_money(self.currency).to_string()
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(rate: Percentage) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}
