//! Company HTTP Routes
//!
//! CRUD endpoints over the company resource. Handlers do no error handling
//! of their own; every failure is returned as a [`CompanyError`] and rendered
//! by its `IntoResponse` impl.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::company::{
    Company, CompanyError, CompanyResource, CompanySummary, CompanyUpdate, NewCompany,
};

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub companies: Vec<CompanySummary>,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse<T: Serialize> {
    pub company: T,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================
// Company Routes
// ==================

/// Create company routes, relative to their mount point
pub fn company_routes(resource: Arc<CompanyResource>) -> Router {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route(
            "/:code",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(resource)
}

async fn list_handler(
    State(resource): State<Arc<CompanyResource>>,
) -> Result<Json<CompaniesResponse>, CompanyError> {
    let companies = resource.list().await?;
    Ok(Json(CompaniesResponse { companies }))
}

async fn get_handler(
    State(resource): State<Arc<CompanyResource>>,
    Path(code): Path<String>,
) -> Result<Json<CompanyResponse<Company>>, CompanyError> {
    let company = resource.get_by_code(&code).await?;
    Ok(Json(CompanyResponse { company }))
}

async fn create_handler(
    State(resource): State<Arc<CompanyResource>>,
    Json(body): Json<NewCompany>,
) -> Result<(StatusCode, Json<CompanyResponse<Company>>), CompanyError> {
    let company = resource.create(body).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

async fn update_handler(
    State(resource): State<Arc<CompanyResource>>,
    Path(code): Path<String>,
    Json(body): Json<CompanyUpdate>,
) -> Result<Json<CompanyResponse<CompanySummary>>, CompanyError> {
    let company = resource.update(&code, body).await?;
    Ok(Json(CompanyResponse { company }))
}

async fn delete_handler(
    State(resource): State<Arc<CompanyResource>>,
    Path(code): Path<String>,
) -> Result<Json<MessageResponse>, CompanyError> {
    resource.delete(&code).await?;
    Ok(Json(MessageResponse {
        message: "deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelopes_serialize() {
        let list = serde_json::to_value(CompaniesResponse { companies: vec![] }).unwrap();
        assert_eq!(list, serde_json::json!({"companies": []}));

        let single = serde_json::to_value(CompanyResponse {
            company: CompanySummary {
                code: "ibm".to_string(),
                name: "IBM".to_string(),
            },
        })
        .unwrap();
        assert_eq!(single, serde_json::json!({"company": {"code": "ibm", "name": "IBM"}}));
    }
}
