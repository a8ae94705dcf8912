//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use buylist_catalog::SubmissionStatus;

#[derive(Parser)]
#[command(name = "buylist")]
#[command(about = "Reconcile customer card lists against the store buy list", long_about = None)]
pub(crate) struct Cli {
    /// Database file (defaults to store.path in settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage the buy-list catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Record a customer submission
    Submit(SubmitArgs),

    /// Browse and update customer submissions
    Submissions {
        #[command(subcommand)]
        action: SubmissionsAction,
    },

    /// Match a submission against the catalog and build an offer
    Match(MatchArgs),

    /// Show or change settings and assistant credentials
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CatalogAction {
    /// Replace the catalog with the contents of a CSV export
    Upload {
        /// CSV file (name, set, number, condition, price columns)
        csv: PathBuf,
    },

    /// Print catalog entries
    Show {
        /// Maximum number of entries to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Show catalog statistics
    Stats,
}

/// Where a submission's card list comes from.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub(crate) struct CardSource {
    /// CSV file with name/set/number/condition/quantity columns
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Free-form text file; cards are extracted by the assistant
    #[arg(long)]
    pub paste: Option<PathBuf>,

    /// JPEG photos, one card each; identified by the assistant
    #[arg(long, num_args = 1..)]
    pub image: Option<Vec<PathBuf>>,
}

#[derive(Args)]
pub(crate) struct SubmitArgs {
    /// Customer first name
    #[arg(long)]
    pub first_name: String,

    /// Customer email address
    #[arg(long)]
    pub email: String,

    /// Customer phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    #[command(flatten)]
    pub source: CardSource,
}

#[derive(Subcommand)]
pub(crate) enum SubmissionsAction {
    /// List submissions, newest first
    List,

    /// Show one submission and its cards
    Show {
        /// Submission id
        id: String,
    },

    /// Change a submission's status
    Status {
        /// Submission id
        id: String,

        /// New status (pending, contacted, finalized)
        status: SubmissionStatus,
    },
}

#[derive(Args)]
pub(crate) struct MatchArgs {
    /// Submission id
    pub id: String,

    /// Ask the assistant about rows without a strict match
    #[arg(long)]
    pub fuzzy: bool,

    /// Assistant calls allowed in flight during --fuzzy
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Include the collector number in strict-match keys
    #[arg(long)]
    pub number_aware: bool,

    /// Rows to select: "all" for every match, or comma-separated row numbers
    #[arg(long)]
    pub select: Option<String>,

    /// Write the partner import CSV for the selection into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Draft an offer email for the selection
    #[arg(long)]
    pub email: bool,

    /// Summarize the character of the customer's list
    #[arg(long)]
    pub vibe: bool,

    /// Print each row's match key and match source
    #[arg(long)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show settings, credentials and their sources
    Show,

    /// Print the settings and credentials file paths
    Path,

    /// Change a setting (store.path or shop.name)
    Set {
        /// Setting key
        key: String,

        /// New value; omit to clear
        value: Option<String>,
    },

    /// Save the assistant API key to the credentials file
    SetKey {
        /// API key
        api_key: String,

        /// Model name
        #[arg(long)]
        model: Option<String>,
    },
}
