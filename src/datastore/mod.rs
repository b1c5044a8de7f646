//! # Datastore
//!
//! The relational collaborator behind the company resource.
//!
//! A datastore accepts one parameterized statement at a time and returns the
//! produced rows as JSON objects keyed by column name. Callers own the SQL;
//! the datastore only binds parameters, runs the statement and shapes the
//! result set.

mod errors;
mod sqlite;

pub use errors::{DatastoreError, DatastoreResult};
pub use sqlite::SqliteDatastore;

use serde_json::{Map, Value};

/// A single result row, keyed by column name
pub type Row = Map<String, Value>;

/// Parameterized statement execution
///
/// Implementations must be shareable across request tasks. Each call is a
/// single, non-transactional statement.
pub trait Datastore: Send + Sync {
    /// Execute `statement` with positional `params` (`?1`, `?2`, ...)
    ///
    /// Statements that produce no columns return an empty row set.
    fn execute(&self, statement: &str, params: &[Value]) -> DatastoreResult<Vec<Row>>;
}
