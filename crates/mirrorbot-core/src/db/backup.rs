//! Database backups.
//!
//! A backup is a full textual dump of the database (schema and data),
//! gzipped, written to a dated directory. The dump itself comes from the
//! external `sqlite3` utility. Backup failures never propagate: the caller
//! gets "no backup produced" and the bot keeps running.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use tokio::process::Command;

use crate::{errors::Error, Result};

const BACKUP_FILENAME: &str = "mirrorbot.sql.gz";

#[derive(Clone, Debug, PartialEq)]
pub struct BackupFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Creates a backup of the database. Returns `None` when no backup could be
/// produced, whatever the reason.
pub async fn create_backup(database_file: &Path, backups_dir: &Path) -> Option<BackupFile> {
    match create_backup_file(database_file, backups_dir).await {
        Ok(file) => Some(file),
        Err(err) => {
            tracing::warn!("backup failed: {err}");
            None
        }
    }
}

/// Dumps the database and writes the gzipped result to the next dated backup
/// location.
async fn create_backup_file(database_file: &Path, backups_dir: &Path) -> Result<BackupFile> {
    if !database_file.exists() {
        return Err(Error::Config(format!(
            "database file {} does not exist",
            database_file.display()
        )));
    }

    let output = Command::new("sqlite3")
        .arg(database_file)
        .arg(".dump")
        .output()
        .await?;
    if !output.status.success() {
        return Err(Error::Config(format!(
            "sqlite3 dump failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let dir = backup_directory(backups_dir).await?;
    let path = dir.join(BACKUP_FILENAME);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&output.stdout)?;
    let compressed = encoder.finish()?;

    tokio::fs::write(&path, &compressed).await?;
    let size = tokio::fs::metadata(&path).await?.len();
    Ok(BackupFile { path, size })
}

/// Dated directory for today's backup, created if needed.
async fn backup_directory(backups_dir: &Path) -> Result<PathBuf> {
    let dir = backups_dir.join(Local::now().format("%Y-%m-%d").to_string());
    tokio::fs::create_dir_all(&dir).await?;
    Ok(dir)
}
