//! Volunteer Core Library
//!
//! The record store over the volunteers, events and hours collections, the
//! persistence port it talks to, the bundled backends, and the bulk importer.

// Re-export pure types from volunteer-types
pub use volunteer_types::*;

pub mod error;
pub mod fields;
pub mod import;
pub mod ports;
pub mod storage;
pub mod store;

pub use error::{Result, StoreError};
pub use import::VolunteerCandidate;
pub use ports::CollectionBackend;
pub use storage::{JsonFileBackend, MemoryBackend, SqliteBackend};
pub use store::{NewEvent, NewHoursEntry, RecordStore};
