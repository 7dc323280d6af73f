use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::config::ConfigOverrides;
use crate::utils::parse_amount;

/// FlatSwaps: home exchanges between students.
///
/// Prices swaps, walks the contract wizard, tracks the move-abroad
/// checklist and reads the inbox against a local database.
#[derive(Debug, Parser)]
#[command(name = "flatswaps")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database backend (`sqlite` or `memory`)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Database connection string, e.g. `flatswaps.db` or `:memory:`
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log level or filter directive; `RUST_LOG` wins when set
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend.clone(),
            db: self.db.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Platform fee and monthly totals for two rents
    Pricing(PricingArgs),
    /// Fill, review, export and save a swap contract
    Contract(ContractArgs),
    /// Show or update the move-abroad checklist
    Checklist(ChecklistArgs),
    /// Profile, listings, searches and contracts of a user
    Dashboard(DashboardArgs),
    /// Create an account
    Signup(SignupArgs),
    /// List swap matches
    Matches(MatchesArgs),
    /// Read the inbox, open a conversation or send a message
    Messages(MessagesArgs),
}

#[derive(Debug, Args)]
pub struct PricingArgs {
    /// Monthly rent of the first property
    #[arg(long, value_parser = parse_amount)]
    pub rent1: Decimal,

    /// Monthly rent of the second property
    #[arg(long, value_parser = parse_amount)]
    pub rent2: Decimal,

    /// Platform fee percentage; defaults to the configured fee
    #[arg(long, value_parser = parse_amount)]
    pub fee: Option<Decimal>,
}

#[derive(Debug, Args)]
pub struct ContractArgs {
    /// TOML file with wizard answers (`conversation_id` and a `[fields]` table)
    #[arg(short, long)]
    pub answers: PathBuf,

    /// Prefill from this conversation instead of the one in the answers file
    #[arg(long)]
    pub conversation: Option<String>,

    /// Write the contract document to the export directory
    #[arg(long, default_value_t = false)]
    pub export: bool,

    /// Store the contract as pending
    #[arg(long, default_value_t = false)]
    pub save: bool,
}

#[derive(Debug, Args)]
pub struct ChecklistArgs {
    /// Only list urgent items
    #[arg(long, default_value_t = false)]
    pub urgent: bool,

    /// Only list items due in this timeframe, e.g. "After arrival"
    #[arg(long)]
    pub timeframe: Option<String>,

    /// Item ids to mark done, or undone when already done
    #[arg(long, num_args = 1..)]
    pub toggle: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// User to show; defaults to the saved user
    #[arg(long)]
    pub user: Option<String>,

    /// Print the dashboard as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Repeated password; defaults to `--password`
    #[arg(long)]
    pub confirm: Option<String>,

    #[arg(long, default_value_t = false)]
    pub accept_terms: bool,
}

#[derive(Debug, Args)]
pub struct MatchesArgs {
    /// new, pending, accepted or rejected
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct MessagesArgs {
    /// Open this conversation and mark it read
    #[arg(long)]
    pub conversation: Option<String>,

    /// Text to send to `--conversation`
    #[arg(long, requires = "conversation")]
    pub send: Option<String>,
}
