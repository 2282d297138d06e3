//! First-run schema setup.
//!
//! Migrations are embedded SQL scripts executed in a fixed order on a
//! declared first run. There is no forward/backward versioning beyond this.

use crate::Result;

use super::Database;

const MIGRATIONS: &[(&str, &str)] = &[("initial", include_str!("../../migrations/initial.sql"))];

/// Brings a first-run database file to the current schema. A no-op on every
/// subsequent run.
pub fn run(db: &Database) -> Result<()> {
    if !db.options().first_run {
        return Ok(());
    }

    tracing::info!("running {} migration(s)", MIGRATIONS.len());
    let conn = db.lock();
    for (name, script) in MIGRATIONS {
        tracing::debug!("applying migration: {name}");
        conn.execute_batch(script)?;
    }
    Ok(())
}

/// Checks whether a table exists.
pub fn table_exists(db: &Database, name: &str) -> Result<bool> {
    let conn = db.lock();
    let mut stmt =
        conn.prepare("select tbl_name from sqlite_master where type = 'table' and tbl_name = ?1")?;
    let found = stmt.exists([name])?;
    Ok(found)
}
