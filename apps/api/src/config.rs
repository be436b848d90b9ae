use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::render::FontConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one `{collection}.txt` file per collection.
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub pdf_font: FontConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_dir: PathBuf::from(env_or("DATA_DIR", "tanka_data")),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            pdf_font: env_or("PDF_FONT", "mincho")
                .parse::<FontConfig>()
                .map_err(|e| anyhow!(e))
                .context("PDF_FONT must be 'mincho' or 'helvetica'")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
