//! Volunteer Types - plain record definitions
//!
//! These are the records persisted in the three collections. They carry no
//! storage or runtime dependencies so handlers and tooling can share them.

pub mod event;
pub mod hours;
pub mod volunteer;

pub use event::*;
pub use hours::*;
pub use volunteer::*;

use serde::{Deserialize, Serialize};

/// The three independently stored collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Volunteers,
    Events,
    Hours,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Volunteers,
        Collection::Events,
        Collection::Hours,
    ];

    /// Name used as the storage key
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Volunteers => "volunteers",
            Collection::Events => "events",
            Collection::Hours => "hours",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
