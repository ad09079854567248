//! Layout Studio CLI
//!
//! Usage:
//!   layout-studio [--config <FILE>] serve [--addr <ADDR>] [--database <URL>] [--memory]
//!   layout-studio normalize <FAMILY> [FILE] [--profile <KEY>]
//!   layout-studio profiles

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::Value;

use layout_studio::identity::StaticTokens;
use layout_studio::profile::profiles;
use layout_studio::server::{self, AppState};
use layout_studio::store::{RowStore, SchemaVersion};
use layout_studio::{
    normalize_document, Family, MemoryStore, ProfileKey, SqliteStore, StudioConfig,
};

#[derive(Parser)]
#[command(name = "layout-studio")]
#[command(about = "Layout geometry and device-profile configuration service")]
struct Cli {
    /// Configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Listen address, overrides [server].addr
        #[arg(long)]
        addr: Option<String>,

        /// SQLite database URL, overrides [server].database_url
        #[arg(long)]
        database: Option<String>,

        /// Keep layouts in memory instead of SQLite
        #[arg(long)]
        memory: bool,
    },

    /// Normalize a layout document read from FILE or stdin and print it
    Normalize {
        /// hotspot, shelf, device, home, nav or login
        family: String,

        /// Input file (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Device profile for variable families
        #[arg(short, long, default_value = "desktop")]
        profile: String,
    },

    /// List device profiles
    Profiles,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StudioConfig::from_file(path),
        None => StudioConfig::builtin(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Serve {
            addr,
            database,
            memory,
        } => run_server(config, addr, database, memory),
        Command::Normalize {
            family,
            input,
            profile,
        } => run_normalize(&family, input, &profile),
        Command::Profiles => {
            for info in profiles() {
                println!("{:<18} {}", info.key.as_str(), info.label);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_normalize(family: &str, input: Option<PathBuf>, profile: &str) -> Result<(), String> {
    let family: Family = family.parse()?;
    let profile: ProfileKey = profile.parse()?;

    let source = match &input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("reading '{}': {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("reading stdin: {}", e))?;
            buffer
        }
    };
    let raw: Value = serde_json::from_str(&source).map_err(|e| format!("invalid JSON: {}", e))?;
    let normalized = normalize_document(family, profile, &raw).map_err(|e| e.to_string())?;
    let pretty = serde_json::to_string_pretty(&normalized).map_err(|e| e.to_string())?;
    println!("{}", pretty);
    Ok(())
}

fn run_server(
    config: StudioConfig,
    addr: Option<String>,
    database: Option<String>,
    memory: bool,
) -> Result<(), String> {
    let addr = addr.unwrap_or(config.server.addr);
    let database = database.unwrap_or(config.server.database_url);
    let identity = Arc::new(StaticTokens::new(&config.auth.tokens));
    if config.auth.tokens.is_empty() {
        info!("no API tokens configured; layouts are read-only");
    }

    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    runtime.block_on(async move {
        let store: Arc<dyn RowStore> = if memory {
            info!("using in-memory layout store");
            Arc::new(MemoryStore::new())
        } else {
            let sqlite = SqliteStore::connect(&database)
                .await
                .map_err(|e| e.to_string())?;
            sqlite
                .create_schema(SchemaVersion::Current)
                .await
                .map_err(|e| e.to_string())?;
            sqlite.migrate().await.map_err(|e| e.to_string())?;
            info!("using SQLite layout store at {}", database);
            Arc::new(sqlite)
        };

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("binding {}: {}", addr, e))?;
        let state = AppState::new(store, identity);
        server::serve(listener, state).await.map_err(|e| {
            error!("server stopped: {}", e);
            e.to_string()
        })
    })
}
