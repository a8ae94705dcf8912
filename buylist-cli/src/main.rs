//! buylist CLI
//!
//! Operator tool for the buy list: upload the catalog, take in customer
//! lists, match them, and produce offers.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::LevelFilter;

use cli_types::{CatalogAction, Cli, Commands, ConfigAction, SubmissionsAction};
pub(crate) use error::CliError;

/// Log an empty line (spacing between output sections).
pub(crate) fn log_blank() {
    log::info!("");
}

fn init_logging(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Error | log::Level::Warn => {
                writeln!(buf, "{}: {}", record.level(), record.args())
            }
            _ => writeln!(buf, "{}", record.args()),
        });
    }

    match logfile {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(
                strip_ansi_escapes::Writer::new(file),
            )));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::runtime(format!("Failed to initialize logging: {}", e)))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db = cli.db;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Upload { csv } => commands::catalog::run_catalog_upload(db, &csv, quiet),
            CatalogAction::Show { limit } => commands::catalog::run_catalog_show(db, limit),
            CatalogAction::Stats => commands::catalog::run_catalog_stats(db),
        },
        Commands::Submit(args) => commands::submit::run_submit(db, args, quiet),
        Commands::Submissions { action } => match action {
            SubmissionsAction::List => commands::submissions::run_submissions_list(db),
            SubmissionsAction::Show { id } => commands::submissions::run_submissions_show(db, &id),
            SubmissionsAction::Status { id, status } => {
                commands::submissions::run_submissions_status(db, &id, status)
            }
        },
        Commands::Match(args) => commands::match_cmd::run_match(db, args, quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(db);
                Ok(())
            }
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Set { key, value } => {
                commands::config::run_config_set(&key, value.as_deref())
            }
            ConfigAction::SetKey { api_key, model } => {
                commands::config::run_config_set_key(api_key, model)
            }
        },
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
