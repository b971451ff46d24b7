//! Account lookup service.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /v1/accountlookup/account
//!           │
//!           ▼
//!   ┌────────────────────────────────────────────────────────────────┐
//!   │                        ACCOUNT LOOKUP                          │
//!   │                                                                │
//!   │  http ──▶ routing::FailoverRouter                              │
//!   │                 │                                              │
//!   │                 ▼                                              │
//!   │        resilience::CircuitBreaker ── open ───┐                 │
//!   │                 │ permitted                  │                 │
//!   │                 ▼                            ▼                 │
//!   │        provider (primary) ── failure ──▶ provider (secondary)  │
//!   │                                                                │
//!   │  config · observability · lifecycle · admin                    │
//!   └────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use account_lookup::config::{load_config, ServiceConfig};
use account_lookup::lifecycle::startup;

#[derive(Parser)]
#[command(name = "account-lookup")]
#[command(about = "Bank account lookup with primary/secondary provider failover", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "ACCOUNT_LOOKUP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => load_config(&path)?,
        None => ServiceConfig::default(),
    };

    startup::run(config).await?;
    Ok(())
}
