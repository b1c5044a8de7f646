//! Company records and request bodies

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A full company row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// The `{code, name}` projection used by listings and updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// Body of a create request
///
/// `code` is optional; when absent it is derived from `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCompany {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            code: None,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The code this company will be stored under
    pub fn resolve_code(&self) -> String {
        match self.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => derive_code(&self.name),
        }
    }
}

/// Body of an update request
///
/// `description` has three states: omitted keeps the stored description,
/// `null` clears it, and a string replaces it.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyUpdate {
    pub name: String,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

impl CompanyUpdate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }
}

/// Marks a field that appeared in the body, even as `null`
///
/// Only runs for fields that are present; absent ones fall back to
/// `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("static regex"))
}

/// Derive a lowercase, hyphen-separated code from a company name
///
/// Letters and digits from any script are kept. Names without any get a
/// random code.
pub fn derive_code(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = separator().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        Uuid::new_v4().simple().to_string()
    } else {
        slug.to_string()
    }
}
