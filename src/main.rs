use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prime_common::SortOrder;
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "prime-numbers")]
#[command(
    version,
    about = "Inventory manager for phone numbers on sale, with promo sheets and mirror numbers"
)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .prime/ with a default config and an empty database
    Init,
    /// Add, list, edit, and remove phone numbers
    Phones {
        #[command(subcommand)]
        command: PhonesCommands,
    },
    /// Generate mirror numbers and show the ones already issued
    Mirror {
        #[command(subcommand)]
        command: MirrorCommands,
    },
    /// Build the promo sheet for the given phone number ids
    Promo {
        /// Listing ids, in the order they should appear
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,

        /// Print the sheet as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API and live WebSocket feed
    Serve {
        /// Port to serve on (overrides prime.toml)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (overrides prime.toml)
        #[arg(long)]
        host: Option<String>,

        /// Open a browser once the server is up
        #[arg(long)]
        open: bool,

        /// Enable dev mode (permissive CORS, bind all interfaces)
        #[arg(long)]
        dev: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum PhonesCommands {
    /// Add a phone number for sale
    Add {
        phone_number: String,

        /// Asking price in MVR
        #[arg(long)]
        price: f64,

        /// Only available on a postpaid plan
        #[arg(long)]
        postpaid: bool,

        /// Record it as already sold
        #[arg(long)]
        sold: bool,
    },
    /// List phone numbers
    List {
        /// Case-insensitive substring of the phone number
        #[arg(short, long)]
        search: Option<String>,

        /// Only postpaid-only numbers
        #[arg(long)]
        postpaid_only: bool,

        /// Leave out sold numbers
        #[arg(long)]
        hide_sold: bool,

        /// newest, oldest, price-high, price-low, number
        #[arg(long, default_value = "newest")]
        sort: SortOrder,

        #[arg(long)]
        json: bool,
    },
    /// Change fields of a phone number
    Edit {
        id: i64,

        #[arg(long)]
        number: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        postpaid: Option<bool>,

        #[arg(long)]
        sold: Option<bool>,
    },
    /// Mark a phone number as sold
    Sold { id: i64 },
    /// Delete a phone number
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum MirrorCommands {
    /// Issue a new mirror number
    Generate {
        /// Attempts before giving up (overrides prime.toml)
        #[arg(long)]
        max_attempts: Option<u32>,

        #[arg(long)]
        json: bool,
    },
    /// Show issued mirror numbers, newest first
    History {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default prime.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    prime_numbers::telemetry::init(cli.verbose, cli.log_json);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Init => cmd::cmd_init(&project_dir)?,
        Commands::Phones { command } => cmd::cmd_phones(&project_dir, command.clone()).await?,
        Commands::Mirror { command } => cmd::cmd_mirror(&project_dir, command.clone()).await?,
        Commands::Promo { ids, json } => cmd::cmd_promo(&project_dir, ids.clone(), *json).await?,
        Commands::Serve {
            port,
            host,
            open,
            dev,
        } => cmd::cmd_serve(&project_dir, *port, host.clone(), *open, *dev).await?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, command.clone())?,
    }

    Ok(())
}
