use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub cache_path: String,
    /// Quiet period before local changes are pushed to the server.
    pub debounce_ms: u64,
    /// Program used to open links.
    pub opener: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000".to_string(),
            cache_path: "config/tui_cache.json".to_string(),
            debounce_ms: 400,
            opener: "xdg-open".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkdeck_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:4000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the local cache file.
    #[arg(long)]
    cache: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write the library to a JSON backup file.
    Export {
        /// Destination file, `links-backup.json` by default.
        path: Option<String>,
    },
    /// Replace the library with the content of a JSON backup file.
    Import { path: String },
    /// Print a random password and its strength.
    Password {
        #[arg(long, default_value_t = engine::password::DEFAULT_LENGTH)]
        length: usize,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_lowercase: bool,
        #[arg(long)]
        no_digits: bool,
        #[arg(long)]
        no_symbols: bool,
        /// Allow look-alike characters such as `l` and `1`.
        #[arg(long)]
        allow_similar: bool,
    },
}

pub fn load() -> Result<(AppConfig, Option<Command>)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LINKDECK_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(cache) = args.cache {
        settings.cache_path = cache;
    }

    Ok((settings, args.command))
}
