//! Cross-origin caller list.
//!
//! `CORS_ORIGINS` arrives either as one comma-delimited string (the usual
//! shape for hosted environment variables) or as an explicit list (TOML).

use serde::{Deserialize, Deserializer};

/// Local dev server only. Hosted frontends are configured per deployment.
pub(crate) fn default_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Split a delimited origin string, dropping blank entries.
#[must_use]
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// Deserialize either shape into a normalized list. An empty value falls
/// back to the development default.
pub(crate) fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(raw) => split_origins(&raw),
        OneOrMany::Many(list) => list
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect(),
    };
    if origins.is_empty() {
        Ok(default_origins())
    } else {
        Ok(origins)
    }
}
