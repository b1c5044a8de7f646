//! # Company Resource
//!
//! The five operations over the `companies` table. Each operation issues a
//! single parameterized statement against the injected [`Datastore`] and maps
//! the returned rows onto typed records.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::datastore::{Datastore, DatastoreError, Row};

use super::errors::{CompanyError, CompanyResult};
use super::model::{Company, CompanySummary, CompanyUpdate, NewCompany};

const LIST_SQL: &str = "SELECT code, name FROM companies";

const GET_SQL: &str = "SELECT code, name, description FROM companies WHERE code = ?1";

const INSERT_SQL: &str = "INSERT INTO companies (code, name, description) \
                          VALUES (?1, ?2, ?3) \
                          RETURNING code, name, description";

const UPDATE_SQL: &str = "UPDATE companies \
                          SET name = ?2, \
                              description = CASE WHEN ?4 THEN ?3 ELSE description END \
                          WHERE code = ?1 \
                          RETURNING code, name";

const DELETE_SQL: &str = "DELETE FROM companies WHERE code = ?1 RETURNING code";

/// Company operations bound to a datastore
#[derive(Clone)]
pub struct CompanyResource {
    store: Arc<dyn Datastore>,
}

impl CompanyResource {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// All companies as `{code, name}`, in storage order
    pub async fn list(&self) -> CompanyResult<Vec<CompanySummary>> {
        let rows = self.run(LIST_SQL, Vec::new()).await?;
        rows.into_iter().map(decode).collect()
    }

    /// One company by code
    pub async fn get_by_code(&self, code: &str) -> CompanyResult<Company> {
        let rows = self.run(GET_SQL, vec![Value::from(code)]).await?;
        first(rows, code)
    }

    /// Insert a company and return the stored row
    ///
    /// A duplicate code surfaces as a datastore error.
    pub async fn create(&self, company: NewCompany) -> CompanyResult<Company> {
        let code = company.resolve_code();
        let params = vec![
            Value::from(code.as_str()),
            Value::from(company.name),
            Value::from(company.description),
        ];

        let rows = self.run(INSERT_SQL, params).await?;
        let created: Company = rows
            .into_iter()
            .next()
            .ok_or(CompanyError::EmptyResult)
            .and_then(decode)?;

        tracing::info!(code = %created.code, "company created");
        Ok(created)
    }

    /// Rename a company, and replace or clear its description when the
    /// update carries one
    pub async fn update(&self, code: &str, update: CompanyUpdate) -> CompanyResult<CompanySummary> {
        let description_given = update.description.is_some();
        let params = vec![
            Value::from(code),
            Value::from(update.name),
            Value::from(update.description.flatten()),
            Value::from(description_given),
        ];

        let rows = self.run(UPDATE_SQL, params).await?;
        let updated: CompanySummary = first(rows, code)?;

        tracing::info!(code = %updated.code, "company updated");
        Ok(updated)
    }

    /// Remove a company, returning the removed code
    pub async fn delete(&self, code: &str) -> CompanyResult<String> {
        let rows = self.run(DELETE_SQL, vec![Value::from(code)]).await?;
        if rows.is_empty() {
            return Err(CompanyError::not_found(code));
        }

        tracing::info!(code, "company deleted");
        Ok(code.to_string())
    }

    /// Run one statement on the blocking pool
    async fn run(&self, statement: &'static str, params: Vec<Value>) -> CompanyResult<Vec<Row>> {
        let store = Arc::clone(&self.store);
        let rows = tokio::task::spawn_blocking(move || store.execute(statement, &params))
            .await
            .map_err(|e| DatastoreError::Join(e.to_string()))??;
        Ok(rows)
    }
}

fn decode<T: DeserializeOwned>(row: Row) -> CompanyResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn first<T: DeserializeOwned>(rows: Vec<Row>, code: &str) -> CompanyResult<T> {
    match rows.into_iter().next() {
        Some(row) => decode(row),
        None => Err(CompanyError::not_found(code)),
    }
}
