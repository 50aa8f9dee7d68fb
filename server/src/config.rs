//! Server configuration parsed from environment variables.

use std::path::PathBuf;

use crate::records::DEFAULT_RESULT_LIMIT;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RECORDS_FILE: &str = "data/records.jsonl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub records_path: PathBuf,
    pub records_limit: usize,
}

impl ServerConfig {
    /// Build server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 5000
    /// - `STATIC_DIR`: default `static/` next to this crate's manifest
    /// - `RECORDS_PATH`: `.jsonl` or `.csv`, default `data/records.jsonl` next to
    ///   this crate's manifest
    /// - `RECORDS_LIMIT`: maximum records passed to the answer step, default 20
    ///
    /// Unparseable numbers fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| manifest_dir().join("static")),
            records_path: std::env::var("RECORDS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| manifest_dir().join(DEFAULT_RECORDS_FILE)),
            records_limit: env_parse("RECORDS_LIMIT", DEFAULT_RESULT_LIMIT),
        }
    }
}

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
