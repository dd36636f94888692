//! Configuration file structures for the Orbis bot.
//!
//! The configuration is read from a YAML file and merged with environment
//! variables prefixed with `ORBIS_`. Nested keys are separated by `__`, so
//! `ORBIS_MATRIX__ACCESS_TOKEN` overrides `matrix.access_token`.
//!
//! # Configuration File Format
//!
//! ```yaml
//! matrix:
//!   homeserver_url: "https://matrix.org"
//!   user_id: "@orbis:matrix.org"
//!   device_id: "ORBISBOT"
//!   access_token: "syt_..."
//!
//! pnw:
//!   url: "https://politicsandwar.com"
//!   api_key: "your-api-key"
//!   alliance_id: 1234
//!   counter_limit: 5
//!
//! commands:
//!   prefix: "="
//! ```
//!
//! Only `matrix` and `pnw.api_key` / `pnw.alliance_id` are mandatory, every
//! other value has a default.

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Prefix of the environment variables overriding the configuration file.
const ENV_PREFIX: &str = "ORBIS_";

/// Root configuration structure for the Orbis bot.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Politics and War API configuration
    pub pnw: Pnw,
    /// Command parsing configuration
    #[serde(default)]
    pub commands: Commands,
}

/// Matrix account configuration.
///
/// The bot does not log in with a password: it restores a session from an
/// access token issued for `device_id`.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Homeserver base URL, e.g. `https://matrix.org`
    pub homeserver_url: String,

    /// Fully qualified Matrix user ID of the bot account.
    ///
    /// Messages sent by this user are never treated as commands.
    pub user_id: String,

    /// Device the access token was issued for
    pub device_id: String,

    /// Access token of the bot account.
    ///
    /// This is the only credential the bot needs. It is read once at startup.
    pub access_token: String,
}

/// Politics and War API configuration.
#[derive(Debug, Deserialize)]
pub struct Pnw {
    /// Base URL of the game, without trailing slash
    #[serde(default = "default_pnw_url")]
    pub url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Alliance whose members are suggested as counters
    pub alliance_id: u64,

    /// Maximum number of counters listed by `find_counters`
    #[serde(default = "default_counter_limit")]
    pub counter_limit: usize,
}

/// Command parsing configuration.
#[derive(Debug, Deserialize)]
pub struct Commands {
    /// Character every command starts with
    #[serde(default = "default_prefix")]
    pub prefix: char,
}

impl Default for Commands {
    fn default() -> Self {
        Commands {
            prefix: default_prefix(),
        }
    }
}

fn default_pnw_url() -> String {
    "https://politicsandwar.com".to_owned()
}

fn default_counter_limit() -> usize {
    5
}

fn default_prefix() -> char {
    '='
}

impl Config {
    /// Loads the configuration from a YAML file, then applies the `ORBIS_`
    /// environment overrides.
    ///
    /// Trailing slashes are removed from the configured URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if a mandatory value is missing from both the file and
    /// the environment, or if a value has the wrong type.
    pub fn load(path: &str) -> Result<Self, anyhow::Error> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.normalize();

        Ok(config)
    }

    fn normalize(&mut self) {
        trim_trailing_slash(&mut self.pnw.url);
        trim_trailing_slash(&mut self.matrix.homeserver_url);
    }
}

fn trim_trailing_slash(url: &mut String) {
    while url.ends_with('/') {
        url.pop();
    }
}
