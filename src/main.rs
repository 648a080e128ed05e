mod cli;

use clap::Parser;
use cli::{Args, Command};
use cloudendpoints::uuid::Uuid;
use cloudendpoints::{Client, Error, Result};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let _ = stderrlog::new()
        .module(module_path!())
        .quiet(args.verbose.is_silent())
        .verbosity(args.verbose.log_level_filter())
        .init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Export(args) => {
            // Validate the container configuration before any request or write
            let publisher = cli::build_publisher(&args.container)?;
            let options = cli::build_export_options(&args);

            let report = cloudendpoints::run(&Client::new(), &options, Uuid::new_v4())?;
            cli::log::export_report(&report);

            if args.summary {
                cli::output::summary_table(&report);
            }

            if let (Some(csv_file), Some(groups)) = (&args.csv_file, &report.office365_ips) {
                cli::csv::save(groups, csv_file)?;
            }

            if let Some(publisher) = publisher {
                cloudendpoints::publish(&publisher, &options)?;
            }
        }

        Command::Download(args) => {
            let publisher = cli::build_publisher(&args.container)?.ok_or_else(missing_container)?;
            publisher.download(&args.source, &args.dest)?;
        }

        Command::Ls(args) => {
            let publisher = cli::build_publisher(&args.container)?.ok_or_else(missing_container)?;
            let names = publisher.ls_files(&args.path, args.recursive)?;
            cli::output::blob_names(&names);
        }
    }

    Ok(())
}

fn missing_container() -> Error {
    Error::Config("a blob container is required: set --container-url or --container-dir".to_string())
}
