//! Logged service hours

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged block of service. Immutable once written.
///
/// Volunteer email and event title are snapshots taken at logging time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursEntry {
    pub id: String,
    pub volunteer_id: String,
    pub volunteer_email: String,
    pub event_id: Option<String>,
    pub event_title: Option<String>,
    pub hours: f64,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
