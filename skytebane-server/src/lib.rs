//! skytebane-server: geolocation record services over SQLite or Supabase
//!
//! Two structurally parallel HTTP services share this crate: the posts
//! service (named positions with an optional target location) and the
//! points service (categorized map points). Each process serves a single
//! resource endpoint - creation and full-table listing - backed by the
//! storage backend selected from the environment at startup.

pub mod config;
pub mod http;
pub mod models;
pub mod storage;

pub use config::{ConfigError, StorageConfig};
pub use http::{run_server, ServerConfig, Service};
pub use storage::{Storage, StorageError};
