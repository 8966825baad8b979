//! Fatalert Control - CLI viewer for the captured fatal error log
//!
//! Read-side of the alert pipeline: paged listing, detail by id, count,
//! bulk clear, and the effective alert configuration.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fatalertctl")]
#[command(about = "Fatalert - fatal error log viewer", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the error log database (defaults to the system path)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Path to the alert configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List captured errors, most recent first
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u64,

        /// Rows per page
        #[arg(long, default_value_t = 50)]
        page_size: u64,
    },

    /// Show one captured error in full
    Show {
        /// Record id
        id: i64,
    },

    /// Print the number of captured errors
    Count,

    /// Irreversibly delete every captured error
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show the effective alert configuration (defaults applied)
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();
    let db_path = cli
        .db
        .unwrap_or_else(|| fatalert::store::ERROR_DB_PATH.to_string());
    let config_path = cli
        .config
        .unwrap_or_else(|| fatalert::config::CONFIG_PATH.to_string());

    match cli.command {
        Commands::List { page, page_size } => commands::list(&db_path, page, page_size),
        Commands::Show { id } => commands::show(&db_path, id),
        Commands::Count => commands::count(&db_path),
        Commands::Clear { yes } => commands::clear(&db_path, yes),
        Commands::Config => commands::config(&config_path),
    }
}
