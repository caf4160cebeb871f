//! # guard-core
//!
//! Core types and error types for Cloud Guard.
//!
//! This crate provides the foundational types shared across all Cloud Guard crates:
//! - Entity structs for users, cloud accounts, policies, evaluations, notifications
//! - Closed enums for every enumerated domain (provider, statuses, severity, notification type)
//! - The dashboard snapshot and the fold that computes it
//! - Read-side response views
//! - Input validation helpers and cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;
pub mod snapshot;
pub mod validation;
