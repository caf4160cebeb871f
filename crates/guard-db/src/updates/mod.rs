//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some` fields
//! generate SET clauses in the dynamic UPDATE SQL; an update with every field
//! `None` is a no-op that returns the stored row. Nullable columns use
//! `Option<Option<T>>` so that "clear" (`Some(None)`) differs from "leave
//! unchanged" (`None`).

pub mod account;
pub mod evaluation;
pub mod policy;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including an explicit `null`) as `Some(..)`.
///
/// Paired with `#[serde(default)]` so an absent field stays `None`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
