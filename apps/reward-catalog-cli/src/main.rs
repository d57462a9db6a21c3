use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "reward-catalog")]
#[command(about = "Reward catalog - normalize reference tables and query rewards")]
#[command(version)]
struct Cli {
    /// Log debug output from the catalog build
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize tables, types, and totals
    Summary {
        /// Catalog manifest (YAML)
        #[arg(short, long, default_value = "catalog.yaml")]
        manifest: PathBuf,
    },

    /// List the entries of one reward type
    List {
        /// Catalog manifest (YAML)
        #[arg(short, long, default_value = "catalog.yaml")]
        manifest: PathBuf,

        /// Reward type to list
        #[arg(short = 't', long = "type")]
        reward_type: String,

        /// Only entries priced in the primary currency
        #[arg(long)]
        primary_only: bool,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the primary currency total, or the total for another currency
    Total {
        /// Catalog manifest (YAML)
        #[arg(short, long, default_value = "catalog.yaml")]
        manifest: PathBuf,

        /// Currency label (defaults to the primary currency)
        #[arg(short, long)]
        currency: Option<String>,
    },

    /// Validate a manifest and report schema fields that miss their headers
    Check {
        /// Catalog manifest (YAML)
        #[arg(short, long, default_value = "catalog.yaml")]
        manifest: PathBuf,
    },

    /// Write every entry to a JSON file
    Export {
        /// Catalog manifest (YAML)
        #[arg(short, long, default_value = "catalog.yaml")]
        manifest: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "catalog.json")]
        out: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "reward_catalog=debug,reward_catalog_tables=debug,reward_catalog_cli=debug"
    } else {
        "reward_catalog=info,reward_catalog_tables=info,reward_catalog_cli=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Summary { manifest } => commands::summarize_catalog::execute(manifest),

        Commands::List {
            manifest,
            reward_type,
            primary_only,
            json,
        } => commands::list_entries::execute(manifest, reward_type, primary_only, json),

        Commands::Total { manifest, currency } => commands::show_total::execute(manifest, currency),

        Commands::Check { manifest } => commands::check_manifest::execute(manifest),

        Commands::Export { manifest, out } => commands::export_entries::execute(manifest, out),
    }
}
