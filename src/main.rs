//! Orbis - A Matrix bot for Politics and War alliances.
//!
//! Orbis answers short commands posted in Matrix rooms with information
//! looked up on the Politics and War API: nation stats, active wars,
//! recommended warchests and counters to an aggressor.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! matrix:
//!   homeserver_url: "https://matrix.org"
//!   user_id: "@orbis:matrix.org"
//!   device_id: "ORBISBOT"
//!   access_token: "syt_..."
//!
//! pnw:
//!   api_key: "your-api-key"
//!   alliance_id: 1234
//! ```
//!
//! Any value can be overridden with an `ORBIS_` environment variable, e.g.
//! `ORBIS_MATRIX__ACCESS_TOKEN`. See [`config`] for every option.
//!
//! # Usage
//!
//! ```bash
//! orbis --config config.yaml
//! ```
//!
//! # Bot Commands
//!
//! - `=ping` - Check the bot is alive
//! - `=help` - List the commands
//! - `=nation <nation_id>` - Nation stats
//! - `=wars <nation_id>` - Active wars of a nation
//! - `=chest <city_count>` - Recommended warchest
//! - `=counter <nation_id>` - Allied counters to an aggressor
//!
//! # Architecture
//!
//! - [`bot`] - Wires the Matrix connection to the dispatcher
//! - [`commands`] - Registry, dispatcher, handlers and rendering
//! - [`config`] - YAML configuration with environment overrides
//! - [`matrix`] - Matrix client, sync and replies
//! - [`pnw`] - Politics and War API client
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod matrix;
mod pnw;

/// Command-line arguments for the Orbis bot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Environment variables prefixed with `ORBIS_` override its values.
    #[arg(short, long)]
    config: String,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting orbis {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;
}
