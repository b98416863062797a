use crate::domain::model::SearchFilters;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "contact-match")]
#[command(
    about = "Fuzzy contact matching, conflict checks and CSV import for title agency contacts"
)]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the nickname variants of a name
    Expand { phrase: String },

    /// Fuzzy search contacts by category
    Search {
        #[command(flatten)]
        store: StoreArgs,

        #[arg(long, default_value = "")]
        buyer: String,

        #[arg(long, default_value = "")]
        realtor: String,

        #[arg(long, default_value = "")]
        attorney: String,

        #[arg(long, default_value = "")]
        lender: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a prospect already exists under any nickname
    Conflict {
        #[command(flatten)]
        store: StoreArgs,

        name: String,

        #[arg(long)]
        json: bool,
    },

    /// Show how a CSV file would be imported
    Preview {
        file: String,

        /// Write the normalized rows to this CSV file
        #[arg(long)]
        out: Option<String>,
    },

    /// Import a CSV file into the contact snapshot
    Import {
        #[command(flatten)]
        store: StoreArgs,

        file: String,

        /// Validate and report without saving the snapshot
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Contact snapshot JSON file (overrides store.snapshot)
    #[arg(long)]
    pub store: Option<String>,
}

impl Command {
    pub fn filters(&self) -> Option<SearchFilters> {
        match self {
            Command::Search {
                buyer,
                realtor,
                attorney,
                lender,
                ..
            } => Some(SearchFilters {
                buyer: buyer.clone(),
                realtor: realtor.clone(),
                attorney: attorney.clone(),
                lender: lender.clone(),
            }),
            _ => None,
        }
    }
}
