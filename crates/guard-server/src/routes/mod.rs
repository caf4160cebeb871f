//! Route handlers grouped by resource. Each module exposes `routes()`,
//! nested under its prefix by [`crate::app::router`].

pub mod accounts;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod policies;
