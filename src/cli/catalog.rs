use std::io::Write;

use clap::{Args, Subcommand};
use tulsi::catalog::{Catalog, CatalogFilter, filter::slugify};

use crate::cli::{money, print_table, write_error};

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List items, optionally filtered
    List(ListArgs),

    /// Show one item in full
    Show {
        /// Item id
        id: String,
    },

    /// List brand slugs usable with `--brand`
    Brands,

    /// List categories usable with `--category`
    Categories,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Brand slug (e.g. `oliver-peoples`), or `all`
    #[arg(long)]
    brand: Option<String>,

    /// Category (e.g. `sunglasses`), or `all`
    #[arg(long)]
    category: Option<String>,

    /// Text to look for in the name, brand or description
    #[arg(short, long)]
    query: Option<String>,

    /// Only the first N items of the catalog
    #[arg(long, conflicts_with_all = ["brand", "category", "query"])]
    featured: Option<usize>,
}

pub(crate) fn run(
    command: CatalogCommand,
    catalog: &Catalog,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List(args) => list(&args, catalog, out),
        CatalogSubcommand::Show { id } => show(&id, catalog, out),
        CatalogSubcommand::Brands => print_table(
            out,
            &["Slug", "Brand"],
            catalog
                .brands()
                .into_iter()
                .map(|brand| [slugify(brand), brand.to_string()]),
        ),
        CatalogSubcommand::Categories => print_table(
            out,
            &["Category"],
            catalog
                .categories()
                .into_iter()
                .map(|category| [category.to_string()]),
        ),
    }
}

fn list(args: &ListArgs, catalog: &Catalog, out: &mut impl Write) -> Result<(), String> {
    let filter = CatalogFilter {
        brand: args.brand.clone(),
        category: args.category.clone(),
        query: args.query.clone(),
    };

    let items: Vec<_> = match args.featured {
        Some(count) => catalog.featured(count).iter().collect(),
        None => catalog.filter(&filter).collect(),
    };

    if items.is_empty() {
        return writeln!(out, "No items match those filters").map_err(write_error);
    }

    print_table(
        out,
        &["Id", "Name", "Brand", "Category", "Price"],
        items.into_iter().map(|item| {
            [
                item.id.to_string(),
                item.name.clone(),
                item.brand.clone(),
                item.category.clone(),
                money(item.price, catalog),
            ]
        }),
    )
}

fn show(id: &str, catalog: &Catalog, out: &mut impl Write) -> Result<(), String> {
    let item = catalog.get(id).map_err(|error| error.to_string())?;

    writeln!(
        out,
        "{name}\n{brand} · {category} · {price}\n\n{description}",
        name = item.name,
        brand = item.brand,
        category = item.category,
        price = money(item.price, catalog),
        description = item.description,
    )
    .map_err(write_error)
}
