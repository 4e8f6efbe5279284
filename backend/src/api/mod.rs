//! HTTP API for the order cleaner.
//!
//! - [`server`] - axum router and handlers
//! - [`types`] - response bodies and download constants
//! - [`logs`] - broadcast log stream for SSE

pub mod logs;
pub mod server;
pub mod types;
