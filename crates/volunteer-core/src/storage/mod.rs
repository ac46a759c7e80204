//! Storage backends
//!
//! JSON files on disk are the default. SQLite keeps each collection as one
//! row. DashMap (in-memory) serves tests and throwaway instances.

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
