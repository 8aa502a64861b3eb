//! steam-catalog: Steam library snapshots for handheld shell UIs
//!
//! This tool is not affiliated with or endorsed by Valve Corporation.
//! It only reads locally stored Steam data on your machine.

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use steam_catalog::commands::{self, SnapshotOptions};
use steam_catalog::logging;

#[derive(Parser)]
#[command(name = "steam-catalog")]
#[command(about = "Steam library, download and storage snapshots", long_about = None)]
#[command(version)]
struct Cli {
    /// Steam installation root (overrides STEAM_ROOT and the default locations)
    #[arg(long, global = true)]
    steam_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the merged game catalog (installed + owned) as JSON
    Library {
        /// Path to write library.json
        #[arg(long, short)]
        out: PathBuf,

        /// Owned-games JSON (array or Web API GetOwnedGames response);
        /// overrides the fetch enabled by STEAM_API_KEY and STEAM_ID64
        #[arg(long)]
        owned: Option<PathBuf>,

        /// Keep running and rewrite when manifests change
        #[arg(long)]
        watch: bool,

        /// Poll interval in seconds for --watch
        #[arg(long, default_value_t = 2.0)]
        interval: f64,
    },

    /// Write in-progress downloads and updates as JSON
    Downloads {
        /// Path to write downloads.json
        #[arg(long, short)]
        out: PathBuf,

        /// Keep running and rewrite when manifests change
        #[arg(long)]
        watch: bool,

        /// Poll interval in seconds for --watch
        #[arg(long, default_value_t = 2.0)]
        interval: f64,
    },

    /// Write per-library disk usage as JSON
    Storage {
        /// Path to write storage.json
        #[arg(long, short)]
        out: PathBuf,

        /// Keep running and refresh periodically
        #[arg(long)]
        watch: bool,

        /// Refresh interval in seconds for --watch
        #[arg(long, default_value_t = 15.0)]
        interval: f64,
    },

    /// Show the merged game catalog as a table
    List {
        /// Owned-games JSON (array or Web API GetOwnedGames response);
        /// overrides the fetch enabled by STEAM_API_KEY and STEAM_ID64
        #[arg(long)]
        owned: Option<PathBuf>,

        /// Only show installed games
        #[arg(long)]
        installed_only: bool,
    },

    /// Print a KeyValues (.vdf/.acf) file as JSON
    Vdf {
        /// File to parse
        file: PathBuf,
    },
}

fn announce_watch(watch: bool) {
    if watch {
        eprintln!("{}", "(WATCH MODE - press Ctrl+C to stop)".blue());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let steam_root = cli.steam_root;

    match cli.command {
        Commands::Library {
            out,
            owned,
            watch,
            interval,
        } => {
            announce_watch(watch);
            commands::library::execute(commands::library::LibraryOptions {
                steam_root,
                out,
                owned,
                watch,
                interval,
            })?;
        }

        Commands::Downloads {
            out,
            watch,
            interval,
        } => {
            announce_watch(watch);
            commands::downloads::execute(SnapshotOptions {
                steam_root,
                out,
                watch,
                interval,
            })?;
        }

        Commands::Storage {
            out,
            watch,
            interval,
        } => {
            announce_watch(watch);
            commands::storage::execute(SnapshotOptions {
                steam_root,
                out,
                watch,
                interval,
            })?;
        }

        Commands::List {
            owned,
            installed_only,
        } => {
            let options = commands::list::ListOptions {
                steam_root,
                owned,
                installed_only,
            };
            let output = commands::list::execute(options)?;
            println!("{}", output);
        }

        Commands::Vdf { file } => {
            let output = commands::vdf::execute(&file)?;
            println!("{}", output);
        }
    }

    Ok(())
}
