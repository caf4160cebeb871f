//! # guard-server
//!
//! HTTP surface for Cloud Guard. Every route lives under `/api`; all but
//! health, register and login require a bearer token.
//!
//! The binary (`cloudguard`) is a thin shell over [`app::router`]: it loads
//! configuration, opens the store, optionally seeds demo data and serves.

pub mod app;
pub mod cli;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod validation;

pub use app::router;
pub use error::ApiError;
pub use state::AppState;
