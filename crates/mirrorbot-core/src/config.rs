use std::{env, path::PathBuf};

use crate::Result;

/// Typed configuration for the bot process.
///
/// Everything comes from the environment; the logging/identity core itself
/// takes these values as plain constructor arguments.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_file: PathBuf,
    pub backups_dir: PathBuf,
    /// Declared first run: create the database and apply migrations.
    pub first_run: bool,
    /// Mirror executed SQL statements into the local log stream.
    pub log_queries: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let data_dir = env_path("MIRRORBOT_DATA_DIR").unwrap_or_else(|| PathBuf::from("data"));

        Ok(Self {
            database_file: env_path("MIRRORBOT_DATABASE")
                .unwrap_or_else(|| data_dir.join("mirrorbot.db")),
            backups_dir: env_path("MIRRORBOT_BACKUPS")
                .unwrap_or_else(|| data_dir.join("backups")),
            first_run: env_flag("MIRRORBOT_FIRST_RUN"),
            log_queries: env_flag("MIRRORBOT_LOG_QUERIES"),
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_str(key).map(PathBuf::from)
}

fn env_flag(key: &str) -> bool {
    matches!(
        env_str(key).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
