use std::io::Write;

use clap::{Parser, Subcommand};
use tabled::{builder::Builder, settings::Style};
use tulsi::{
    catalog::Catalog,
    config::Config,
    notify::{NotificationQueue, TracingSink},
    prices::Price,
    session::SessionStore,
    storage::FileStore,
};

mod cart;
mod catalog;
mod checkout;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "tulsi", about = "Tulsi eyewear storefront", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog(catalog::CatalogCommand),

    /// Manage the cart
    Cart(cart::CartCommand),

    /// Manage the wishlist
    Wishlist(wishlist::WishlistCommand),

    /// Print a receipt for the cart and empty it
    Checkout,
}

/// Session store used by the binary: snapshots on disk, notifications queued
/// for printing and also logged.
pub(crate) type Session<'q> = SessionStore<FileStore, (&'q NotificationQueue, TracingSink)>;

impl Cli {
    pub(crate) fn run(self, out: &mut impl Write) -> Result<(), String> {
        let catalog = self
            .config
            .load_catalog()
            .map_err(|error| format!("failed to load catalog: {error}"))?;

        let queue = NotificationQueue::new();

        let result = match self.command {
            Commands::Catalog(command) => return catalog::run(command, &catalog, out),
            Commands::Cart(command) => match open_session(&self.config, &queue) {
                Ok(mut session) => cart::run(command, &catalog, &mut session, out),
                Err(error) => Err(error),
            },
            Commands::Wishlist(command) => match open_session(&self.config, &queue) {
                Ok(mut session) => wishlist::run(command, &catalog, &mut session, out),
                Err(error) => Err(error),
            },
            Commands::Checkout => match open_session(&self.config, &queue) {
                Ok(mut session) => checkout::run(&catalog, &mut session, out),
                Err(error) => Err(error),
            },
        };

        // Changes already persisted are reported even when the command failed afterwards
        let reported = report(&queue, out);

        result.and(reported)
    }
}

fn open_session<'q>(config: &Config, queue: &'q NotificationQueue) -> Result<Session<'q>, String> {
    SessionStore::open_with(
        config.file_store(),
        (queue, TracingSink),
        config.session_options(),
    )
    .map_err(|error| format!("failed to open session: {error}"))
}

/// Prints queued notifications, one per line.
fn report(queue: &NotificationQueue, out: &mut impl Write) -> Result<(), String> {
    for notification in queue.drain() {
        writeln!(out, "[{}] {}", notification.severity, notification.message)
            .map_err(write_error)?;
    }

    Ok(())
}

pub(crate) fn money(price: Price, catalog: &Catalog) -> String {
    price.to_money(catalog.currency()).to_string()
}

pub(crate) fn print_table<R>(
    out: &mut impl Write,
    header: &[&str],
    rows: impl IntoIterator<Item = R>,
) -> Result<(), String>
where
    R: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();

    builder.push_record(header.iter().map(ToString::to_string));

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    writeln!(out, "{table}").map_err(write_error)
}

pub(crate) fn write_error(error: std::io::Error) -> String {
    format!("failed to write output: {error}")
}

#[cfg(test)]
mod tests {
    use std::{io, path::Path};

    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    /// Rejects its first write, then accepts everything.
    #[derive(Default)]
    struct FailsOnce {
        failed: bool,
        written: Vec<u8>,
    }

    impl Write for FailsOnce {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;

                return Err(io::Error::other("pipe closed"));
            }

            self.written.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn cli(data_dir: &Path, args: &[&str]) -> Result<Cli, clap::Error> {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let data_dir = data_dir.to_string_lossy();
        let catalog_dir = fixtures.to_string_lossy();

        let mut argv = vec![
            "tulsi",
            "--data-dir",
            &*data_dir,
            "--catalog-dir",
            &*catalog_dir,
        ];
        argv.extend_from_slice(args);

        Cli::try_parse_from(argv)
    }

    #[test]
    fn cart_add_reports_notification() -> TestResult {
        let dir = TempDir::new()?;
        let mut out = Vec::new();

        cli(dir.path(), &["cart", "add", "2", "-q", "2"])?.run(&mut out)?;

        let printed = String::from_utf8(out)?;

        assert!(printed.contains("[success] Added"), "{printed}");

        Ok(())
    }

    #[test]
    fn checkout_reports_cleared_cart_when_receipt_cannot_be_written() -> TestResult {
        let dir = TempDir::new()?;

        cli(dir.path(), &["cart", "add", "2"])?.run(&mut Vec::new())?;

        let mut out = FailsOnce::default();
        let result = cli(dir.path(), &["checkout"])?.run(&mut out);

        assert!(result.is_err());

        let printed = String::from_utf8(out.written)?;

        assert!(printed.contains("[success] Cart cleared"), "{printed}");

        Ok(())
    }
}
