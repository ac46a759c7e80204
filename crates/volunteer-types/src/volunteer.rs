//! Volunteer records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered volunteer. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Unique across the collection, compared exactly (case-sensitive)
    pub email: String,
    /// Absent on records written before timestamps were kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Volunteer {
    pub fn new(id: String, first_name: String, last_name: String, email: String) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            created_at: Some(Utc::now()),
        }
    }
}

/// Split a single-field name on its first whitespace into first and last
pub fn split_full_name(full: &str) -> (String, String) {
    let full = full.trim();
    match full.split_once(char::is_whitespace) {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (full.to_string(), String::new()),
    }
}
