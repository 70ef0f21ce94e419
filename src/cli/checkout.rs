use std::io::Write;

use tulsi::{
    catalog::Catalog,
    checkout::{CheckoutError, CheckoutPolicy},
};

use crate::cli::{Session, write_error};

pub(crate) fn run(
    catalog: &Catalog,
    session: &mut Session<'_>,
    out: &mut impl Write,
) -> Result<(), String> {
    let receipt = match session.checkout(&CheckoutPolicy::default(), catalog.currency()) {
        Ok(receipt) => receipt,
        Err(CheckoutError::EmptyCart) => {
            return writeln!(out, "Your cart is empty; nothing to check out").map_err(write_error);
        }
        Err(error) => return Err(error.to_string()),
    };

    receipt.write_to(out).map_err(|error| error.to_string())
}
