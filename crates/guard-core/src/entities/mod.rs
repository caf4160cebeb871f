//! Entity structs for all Cloud Guard domain objects.
//!
//! Each entity maps to one table in the libSQL schema (see
//! `guard-db/migrations/001_initial.sql`). Identities are store-assigned
//! integers.

mod account;
mod evaluation;
mod notification;
mod policy;
mod user;

pub use account::CloudAccount;
pub use evaluation::PolicyEvaluation;
pub use notification::Notification;
pub use policy::Policy;
pub use user::User;
