//! SQLite-backed datastore
//!
//! One connection guarded by a mutex. Opening a datastore creates the
//! `companies` table when it does not exist yet.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{Number, Value};

use super::errors::{DatastoreError, DatastoreResult};
use super::{Datastore, Row};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companies (
    code        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT
);
";

/// SQLite datastore
pub struct SqliteDatastore {
    conn: Mutex<Connection>,
}

impl SqliteDatastore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> DatastoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "failed to open sqlite database");
            e
        })?;
        let store = Self::bootstrap(conn)?;
        tracing::info!(path = %path.display(), "sqlite datastore ready");
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> DatastoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self::bootstrap(conn)?;
        tracing::debug!("in-memory sqlite datastore ready");
        Ok(store)
    }

    fn bootstrap(conn: Connection) -> DatastoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl Datastore for SqliteDatastore {
    fn execute(&self, statement: &str, params: &[Value]) -> DatastoreResult<Vec<Row>> {
        let bound = params
            .iter()
            .enumerate()
            .map(|(i, v)| to_sql_value(i + 1, v))
            .collect::<DatastoreResult<Vec<_>>>()?;

        let conn = self.conn.lock().map_err(|_| DatastoreError::Poisoned)?;
        let mut stmt = conn.prepare(statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(bound))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (idx, column) in columns.iter().enumerate() {
                let value = from_sql_value(column, row.get_ref(idx)?)?;
                record.insert(column.clone(), value);
            }
            out.push(record);
        }

        tracing::trace!(statement, rows = out.len(), "statement executed");
        Ok(out)
    }
}

fn to_sql_value(position: usize, value: &Value) -> DatastoreResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::Real(f))
            } else {
                Err(DatastoreError::UnsupportedParam {
                    position,
                    kind: "number",
                })
            }
        }
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) => Err(DatastoreError::UnsupportedParam {
            position,
            kind: "array",
        }),
        Value::Object(_) => Err(DatastoreError::UnsupportedParam {
            position,
            kind: "object",
        }),
    }
}

fn from_sql_value(column: &str, value: ValueRef<'_>) -> DatastoreResult<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::from(i)),
        // NaN and infinities have no JSON form
        ValueRef::Real(f) => Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)),
        ValueRef::Text(t) => Ok(Value::String(String::from_utf8_lossy(t).into_owned())),
        ValueRef::Blob(_) => Err(DatastoreError::UnsupportedColumn {
            column: column.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SqliteDatastore {
        SqliteDatastore::open_in_memory().unwrap()
    }

    #[test]
    fn test_schema_is_created() {
        let store = store();
        let rows = store
            .execute("SELECT code, name, description FROM companies", &[])
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_returning_rows_are_keyed_by_column() {
        let store = store();
        let rows = store
            .execute(
                "INSERT INTO companies (code, name, description) VALUES (?1, ?2, ?3) \
                 RETURNING code, name, description",
                &[json!("apple"), json!("Apple"), Value::Null],
            )
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["code"], "apple");
        assert_eq!(rows[0]["name"], "Apple");
        assert_eq!(rows[0]["description"], Value::Null);
    }

    #[test]
    fn test_statement_without_columns_returns_no_rows() {
        let store = store();
        let rows = store
            .execute(
                "INSERT INTO companies (code, name) VALUES (?1, ?2)",
                &[json!("ibm"), json!("IBM")],
            )
            .unwrap();
        assert!(rows.is_empty());

        let rows = store.execute("SELECT code FROM companies", &[]).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_numeric_and_bool_params() {
        let store = store();
        let rows = store
            .execute("SELECT ?1 AS i, ?2 AS f, ?3 AS b", &[json!(7), json!(1.5), json!(true)])
            .unwrap();
        assert_eq!(rows[0]["i"], 7);
        assert_eq!(rows[0]["f"], 1.5);
        assert_eq!(rows[0]["b"], 1);
    }

    #[test]
    fn test_rejects_structured_params() {
        let store = store();
        let err = store
            .execute("SELECT ?1", &[json!(["a"])])
            .unwrap_err();
        assert!(matches!(
            err,
            DatastoreError::UnsupportedParam { position: 1, kind: "array" }
        ));

        let err = store
            .execute("SELECT ?1, ?2", &[json!(1), json!({"a": 1})])
            .unwrap_err();
        assert!(matches!(
            err,
            DatastoreError::UnsupportedParam { position: 2, kind: "object" }
        ));
    }

    #[test]
    fn test_blob_columns_are_rejected() {
        let store = store();
        let err = store.execute("SELECT x'00ff' AS raw", &[]).unwrap_err();
        assert!(matches!(err, DatastoreError::UnsupportedColumn { ref column } if column == "raw"));
    }

    #[test]
    fn test_duplicate_code_is_a_sqlite_error() {
        let store = store();
        let insert = "INSERT INTO companies (code, name) VALUES (?1, ?2)";
        store.execute(insert, &[json!("ibm"), json!("IBM")]).unwrap();

        let err = store
            .execute(insert, &[json!("ibm"), json!("IBM Corp")])
            .unwrap_err();
        assert!(matches!(err, DatastoreError::Sqlite(_)));
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biztime.db");

        {
            let store = SqliteDatastore::open(&path).unwrap();
            store
                .execute(
                    "INSERT INTO companies (code, name) VALUES (?1, ?2)",
                    &[json!("hp"), json!("Hewlett Packard")],
                )
                .unwrap();
        }

        let store = SqliteDatastore::open(&path).unwrap();
        let rows = store
            .execute("SELECT name FROM companies WHERE code = ?1", &[json!("hp")])
            .unwrap();
        assert_eq!(rows[0]["name"], "Hewlett Packard");
    }
}
