//! Ports - abstract interfaces the store depends on

pub mod storage;

pub use storage::CollectionBackend;
