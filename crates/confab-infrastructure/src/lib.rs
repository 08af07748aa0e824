//! Infrastructure layer: durable storage, paths, and configuration loading.

pub mod config_service;
pub mod kv_store;
pub mod paths;

pub use config_service::{ConfigService, apply_overrides};
pub use kv_store::{FileKeyValueStore, MemoryKeyValueStore};
pub use paths::ConfabPaths;
