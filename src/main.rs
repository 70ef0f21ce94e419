//! Tulsi storefront CLI

use std::{io, process::ExitCode};

use clap::Parser;
use tulsi::{config::Config, observability};

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    Config::load_dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // Help and version requests also arrive here
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = observability::init(&cli.config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    let mut stdout = io::stdout().lock();

    match cli.run(&mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(clippy::print_stderr, reason = "command errors are reported to the user")]
            {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}
