use std::io::Write;

use clap::{Args, Subcommand};
use tulsi::catalog::Catalog;

use crate::cli::{Session, money, print_table, write_error};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its totals
    Show,

    /// Add an item, or more of an item already in the cart
    Add {
        /// Item id
        id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Remove an item's line
    Remove {
        /// Item id
        id: String,
    },

    /// Set an item's quantity; zero or less removes it
    Update {
        /// Item id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove every line
    Clear,
}

pub(crate) fn run(
    command: CartCommand,
    catalog: &Catalog,
    session: &mut Session<'_>,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => show(catalog, session, out),
        CartSubcommand::Add { id, quantity } => {
            let item = catalog.get(&id).map_err(|error| error.to_string())?;

            session
                .add_to_cart(item, quantity)
                .map_err(|error| error.to_string())?;

            Ok(())
        }
        CartSubcommand::Remove { id } => {
            if !session.remove_from_cart(&id) {
                writeln!(out, "Item {id} is not in your cart").map_err(write_error)?;
            }

            Ok(())
        }
        CartSubcommand::Update { id, quantity } => {
            if session.cart().line(&id).is_none() {
                return writeln!(out, "Item {id} is not in your cart").map_err(write_error);
            }

            session
                .update_quantity(&id, quantity)
                .map_err(|error| error.to_string())
        }
        CartSubcommand::Clear => {
            session.clear_cart();

            Ok(())
        }
    }
}

fn show(catalog: &Catalog, session: &Session<'_>, out: &mut impl Write) -> Result<(), String> {
    let cart = session.cart();

    if cart.is_empty() {
        return writeln!(out, "Your cart is empty").map_err(write_error);
    }

    print_table(
        out,
        &["Id", "Item", "Unit Price", "Qty", "Line Total"],
        cart.iter().map(|line| {
            [
                line.item().id.to_string(),
                line.item().name.clone(),
                money(line.item().price, catalog),
                line.quantity().to_string(),
                money(line.line_total(), catalog),
            ]
        }),
    )?;

    writeln!(
        out,
        "{} items, {}",
        session.total_items(),
        money(session.total_price(), catalog)
    )
    .map_err(write_error)
}
