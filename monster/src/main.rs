//! Monster movie collection console.
//!
//! A menu-driven interface for adding, removing, editing and listing monster
//! movies and their characters. The collection is loaded from a text file on
//! start and written back on "Save & Exit":
//!
//! ```bash
//! cargo run -p monster -- --file saves/monster_movies.txt
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG` (or `--log-level`) to see them.

mod config;
mod shell;

use clap::Parser;
use config::{ShellConfig, DEFAULT_DATA_FILE};
use shell::Shell;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "monster")]
#[command(version)]
#[command(about = "Manage a collection of monster movies and their characters")]
struct Cli {
    /// Text file to load the collection from and save it to
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DATA_FILE)]
    file: PathBuf,

    /// Start with an empty collection instead of loading the file
    #[arg(long)]
    no_load: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = ShellConfig::default()
        .with_data_file(cli.file)
        .with_load_on_start(!cli.no_load);
    tracing::debug!(?config, "Starting console");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(config, stdin.lock(), stdout.lock());
    shell.run()?;

    Ok(())
}
