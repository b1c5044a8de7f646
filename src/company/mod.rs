//! # Companies
//!
//! The company resource: typed records, the operations over the
//! `companies` table, and the translation of their failures into HTTP
//! responses.

mod errors;
mod model;
mod resource;

pub use errors::{CompanyError, CompanyResult, ErrorResponse};
pub use model::{derive_code, Company, CompanySummary, CompanyUpdate, NewCompany};
pub use resource::CompanyResource;
