use std::io::Write;

use clap::{Args, Subcommand};
use tulsi::catalog::Catalog;

use crate::cli::{Session, money, print_table, write_error};

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// Show saved items
    Show,

    /// Save an item
    Add {
        /// Item id
        id: String,
    },

    /// Forget a saved item
    Remove {
        /// Item id
        id: String,
    },

    /// Save an item, or forget it if already saved
    Toggle {
        /// Item id
        id: String,
    },

    /// Forget every saved item
    Clear,
}

pub(crate) fn run(
    command: WishlistCommand,
    catalog: &Catalog,
    session: &mut Session<'_>,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        WishlistSubcommand::Show => show(catalog, session, out),
        WishlistSubcommand::Add { id } => {
            let item = catalog.get(&id).map_err(|error| error.to_string())?;

            session.add_to_wishlist(item);

            Ok(())
        }
        WishlistSubcommand::Remove { id } => {
            if !session.remove_from_wishlist(&id) {
                writeln!(out, "Item {id} is not in your wishlist").map_err(write_error)?;
            }

            Ok(())
        }
        WishlistSubcommand::Toggle { id } => {
            let item = catalog.get(&id).map_err(|error| error.to_string())?;

            session.toggle_wishlist(item);

            Ok(())
        }
        WishlistSubcommand::Clear => {
            session.clear_wishlist();

            Ok(())
        }
    }
}

fn show(catalog: &Catalog, session: &Session<'_>, out: &mut impl Write) -> Result<(), String> {
    let wishlist = session.wishlist();

    if wishlist.is_empty() {
        return writeln!(out, "Your wishlist is empty").map_err(write_error);
    }

    print_table(
        out,
        &["Id", "Item", "Brand", "Price"],
        wishlist.iter().map(|item| {
            [
                item.id.to_string(),
                item.name.clone(),
                item.brand.clone(),
                money(item.price, catalog),
            ]
        }),
    )
}
