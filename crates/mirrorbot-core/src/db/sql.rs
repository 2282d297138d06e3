//! Parameterized statement helpers.
//!
//! Callers hand over statement text with `?n` placeholders and bind values
//! separately; statement text that inlines its own quoted string literals is
//! rejected outright, which keeps user data out of the SQL. Indentation
//! normalization is applied to log output only, never to query semantics.

use rusqlite::{Params, Row};

use crate::text::dedent;
use crate::{errors::Error, Result};

use super::Database;

/// Normalizes statement text for log readability: inline SQL written as an
/// indented multiline string comes out flush left.
pub fn normalize(statement: &str) -> String {
    dedent(statement)
}

/// Rejects statement text that inlines quoted string literals.
pub fn check_statement(statement: &str) -> Result<()> {
    if statement.contains('\'') {
        return Err(Error::Usage(
            "statement inlines a string literal; bind it as a parameter instead".to_string(),
        ));
    }
    Ok(())
}

impl Database {
    /// Executes a single statement, returning the number of affected rows.
    pub fn execute<P: Params>(&self, statement: &str, params: P) -> Result<usize> {
        check_statement(statement)?;
        self.log_statement(statement);
        let conn = self.lock();
        Ok(conn.execute(statement, params)?)
    }

    /// Runs a query and maps every row through `f`.
    pub fn query_rows<T, P, F>(&self, statement: &str, params: P, f: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        check_statement(statement)?;
        self.log_statement(statement);
        let conn = self.lock();
        let mut stmt = conn.prepare(statement)?;
        let rows = stmt.query_map(params, f)?;
        Ok(rows.collect::<rusqlite::Result<Vec<T>>>()?)
    }
}
