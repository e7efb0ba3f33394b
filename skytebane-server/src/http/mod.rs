//! HTTP layer - axum routers, error mapping, JSON extraction
//!
//! One process serves one resource endpoint; both services share this
//! module and differ only in which resource router gets mounted.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, Service};
