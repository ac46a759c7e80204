//! Event records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled event volunteers can register for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub location: Option<String>,
    /// Maximum number of attendees, 0 means unlimited
    #[serde(default)]
    pub capacity: u32,
    /// Volunteer ids in registration order, no duplicates
    #[serde(default)]
    pub attendees: Vec<String>,
    /// Absent on records written before timestamps were kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(
        id: String,
        title: String,
        date: Option<String>,
        location: Option<String>,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            title,
            date,
            location,
            capacity,
            attendees: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.capacity == 0
    }

    pub fn is_full(&self) -> bool {
        !self.is_unlimited() && self.attendees.len() >= self.capacity as usize
    }

    pub fn has_attendee(&self, volunteer_id: &str) -> bool {
        self.attendees.iter().any(|id| id == volunteer_id)
    }

    /// Open slots, `None` when unlimited
    pub fn remaining(&self) -> Option<u32> {
        if self.is_unlimited() {
            return None;
        }
        Some(self.capacity.saturating_sub(self.attendees.len() as u32))
    }
}
