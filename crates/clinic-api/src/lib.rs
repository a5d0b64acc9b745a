//! HTTP boundary for the clinic backend.
//!
//! Wraps `clinic-core` in an axum service: bearer token auth, role gates
//! for prescription mutations, pagination envelopes, and a best-effort
//! queue-changed broadcast.

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppContext;
