//! versecache - read a poem catalog offline.
//!
//! On start the local store is opened, populated from the remote table if it
//! is empty, and the cached poems are listed. `--show <id>` opens one poem the
//! way the detail screen does: select it, then read the selection back.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use versecache_core::utils::truncate_string;
use versecache_core::{
    Config, ListState, PoemSession, StorageSession, StoreLocation, SupabaseSource, SyncOptions,
};

// ============================================================================
// Constants
// ============================================================================

/// Width of the first-line preview in the poem list
const PREVIEW_WIDTH: usize = 48;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

enum Command {
    List,
    Show(i64),
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args.get(1).map(String::as_str) {
        None | Some("--list") => Ok(Command::List),
        Some("--show") => {
            let id = args
                .get(2)
                .context("--show needs a poem id")?
                .parse::<i64>()
                .context("poem id must be an integer")?;
            Ok(Command::Show(id))
        }
        Some(other) => Err(anyhow::anyhow!(
            "Unknown argument {other}. Usage: versecache [--list | --show <id>]"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if let Err(e) = config.validate_remote() {
        warn!(error = %e, "Sync will be skipped");
    }

    let storage = Arc::new(StorageSession::new(StoreLocation::File(
        config.database_path()?,
    )));
    info!(location = %storage.location(), "versecache starting");

    let source = Arc::new(SupabaseSource::from_config(&config)?);
    let session = PoemSession::new(storage, source, SyncOptions::from_config(&config));

    session
        .start()
        .await
        .context("Local poem store unavailable")?;

    let (result, snapshot) = session.sync_and_reload().await?;
    eprintln!("{} (cache loaded {})", result.summary(), snapshot.age_display());

    match command {
        Command::List => print_list(&session),
        Command::Show(id) => {
            if session.select_by_id(id).is_none() {
                eprintln!("No poem with id {} in the local cache.", id);
            }
            print_detail(&session);
        }
    }

    Ok(())
}

fn print_list(session: &PoemSession) {
    match session.list_state() {
        ListState::Loading => println!("Loading..."),
        ListState::Unavailable => println!("Offline - no poems available."),
        ListState::Empty => println!("No poems yet."),
        ListState::Ready(_) => {
            for poem in session.poems().poems() {
                println!(
                    "{:>4}  {:<32}  {}",
                    poem.id,
                    truncate_string(&poem.title, 32),
                    truncate_string(poem.first_line(), PREVIEW_WIDTH)
                );
            }
        }
    }
}

fn print_detail(session: &PoemSession) {
    let Some(poem) = session.current_selection() else {
        println!("No poem selected.");
        return;
    };

    println!("{}\n", poem.title);
    println!("{}\n", poem.body);
    println!("    - {}", poem.display_author());
}
