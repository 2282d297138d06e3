//! Database layer: sqlite handle, schema migrations, queries, backups.
//!
//! The engine itself (file storage, transactions, indexing) is rusqlite's
//! business; this module owns the schema and the query contracts the bot
//! core relies on.

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use rusqlite::Connection;

use crate::{errors::Error, Result};

pub mod backup;
pub mod identity;
pub mod migrations;
pub mod sql;

pub use identity::{MessageIdentity, MessageIdentityStore, DEFAULT_NAMESPACE};

#[derive(Clone, Copy, Debug, Default)]
pub struct DatabaseOptions {
    /// Declared first run: the database file must not exist yet and the
    /// schema migrations will be applied.
    pub first_run: bool,
    /// Mirror executed statement text to the query log callback.
    pub log_queries: bool,
}

/// Callback receiving normalized statement text for query logging.
pub type QueryLogFn = Box<dyn Fn(&str) + Send + Sync>;

/// Handle to the bot's sqlite database.
///
/// One process-wide instance, set up once during startup. All persistent
/// state related to the bot goes through here.
pub struct Database {
    conn: Mutex<Connection>,
    path: PathBuf,
    options: DatabaseOptions,
    query_log: Mutex<Option<QueryLogFn>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Opens the database; on a declared first run, creates a new one and
    /// applies migrations.
    ///
    /// A database that already exists during a first run is a fatal
    /// configuration error: either move or delete the old database before
    /// initializing.
    pub fn open(path: impl AsRef<Path>, options: DatabaseOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if options.first_run && path.exists() {
            return Err(Error::Config(format!(
                "tried to initialize a new database at {} while one already exists",
                path.display()
            )));
        }
        if !options.first_run && !path.exists() {
            return Err(Error::Config(format!(
                "database file {} does not exist (set first_run to create it)",
                path.display()
            )));
        }

        if options.first_run {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        let db = Self {
            conn: Mutex::new(conn),
            path,
            options,
            query_log: Mutex::new(None),
        };
        migrations::run(&db)?;
        Ok(db)
    }

    /// In-memory database with migrations applied. Used by tests.
    pub fn in_memory() -> Result<Self> {
        let db = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            path: PathBuf::from(":memory:"),
            options: DatabaseOptions {
                first_run: true,
                log_queries: false,
            },
            query_log: Mutex::new(None),
        };
        migrations::run(&db)?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> DatabaseOptions {
        self.options
    }

    /// Installs the callback that receives executed statement text when
    /// `log_queries` is on.
    pub fn set_query_log(&self, f: QueryLogFn) {
        *self.query_log.lock().expect("query log lock poisoned") = Some(f);
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database lock poisoned")
    }

    pub(crate) fn log_statement(&self, statement: &str) {
        if !self.options.log_queries {
            return;
        }
        if let Some(log) = &*self.query_log.lock().expect("query log lock poisoned") {
            log(&sql::normalize(statement));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_run_over_existing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.db");
        std::fs::write(&path, b"not empty").unwrap();

        let err = Database::open(
            &path,
            DatabaseOptions {
                first_run: true,
                log_queries: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_without_first_run_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Database::open(dir.path().join("absent.db"), DatabaseOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn first_run_creates_schema_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.db");

        let db = Database::open(
            &path,
            DatabaseOptions {
                first_run: true,
                log_queries: false,
            },
        )
        .unwrap();
        assert!(migrations::table_exists(&db, "msg").unwrap());
        assert!(migrations::table_exists(&db, "msg_component").unwrap());
        drop(db);

        // Reopening without first_run finds the schema in place.
        let db = Database::open(&path, DatabaseOptions::default()).unwrap();
        assert!(migrations::table_exists(&db, "msg").unwrap());
    }

    #[test]
    fn query_log_receives_statements() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(
            dir.path().join("bot.db"),
            DatabaseOptions {
                first_run: true,
                log_queries: true,
            },
        )
        .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        db.set_query_log(Box::new(move |stmt| {
            sink.lock().unwrap().push(stmt.to_string());
        }));

        db.set("status", DEFAULT_NAMESPACE, &[]).unwrap();
        assert!(!seen.lock().unwrap().is_empty());
    }
}
