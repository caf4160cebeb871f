//! # guard-config
//!
//! Layered settings loading for Cloud Guard using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. `CLOUDGUARD_*` prefixed environment variables
//! 2. Flat environment variables (`APP_NAME`, `DATABASE_URL`, `PORT`, ...),
//!    including those loaded from `.env`
//! 3. `cloudguard.toml` (or the file passed with `--config`)
//! 4. Built-in defaults, suitable for local development
//!
//! # Usage
//!
//! ```no_run
//! use guard_config::GuardConfig;
//!
//! let config = GuardConfig::load_with_dotenv(None).expect("config");
//! println!("listening on {}", config.port);
//! ```

mod cors;
mod database;
mod error;

pub use cors::split_origins;
pub use database::StoreLocation;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default signing secret. Fine for local development, flagged by [`GuardConfig::warnings`].
pub const DEV_JWT_SECRET: &str = "change-me";

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "cloudguard.toml";

/// Flat environment variable names, matching the names hosted deployments set.
const ENV_KEYS: [&str; 8] = [
    "APP_NAME",
    "DATABASE_URL",
    "PORT",
    "DEMO_SEED",
    "CORS_ORIGINS",
    "JWT_SECRET",
    "JWT_ALGORITHM",
    "ACCESS_TOKEN_EXPIRE_MINUTES",
];

fn default_app_name() -> String {
    "Cloud Guard Platform".to_string()
}

fn default_database_url() -> String {
    "sqlite:///./cloud_guard.db".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_demo_seed() -> bool {
    true
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

const fn default_token_expiry() -> i64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuardConfig {
    /// Display name reported by the health endpoint and startup logs.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Store connection string, see [`StoreLocation::parse`].
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to seed the demo dataset on startup.
    #[serde(default = "default_demo_seed")]
    pub demo_seed: bool,

    /// Origins allowed to call the API from a browser.
    #[serde(
        default = "cors::default_origins",
        deserialize_with = "cors::deserialize_origins"
    )]
    pub cors_origins: Vec<String>,

    /// Shared secret used to sign bearer tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Token signing algorithm name (`HS256`, `HS384`, `HS512`).
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,

    /// Token lifetime in minutes.
    #[serde(default = "default_token_expiry")]
    pub access_token_expire_minutes: i64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            database_url: default_database_url(),
            port: default_port(),
            demo_seed: default_demo_seed(),
            cors_origins: cors::default_origins(),
            jwt_secret: default_jwt_secret(),
            jwt_algorithm: default_jwt_algorithm(),
            access_token_expire_minutes: default_token_expiry(),
        }
    }
}

impl GuardConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Does NOT read `.env` -- use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// Variables already present in the process environment win over `.env`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(config_file)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can extract from it directly or layer more providers.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let path = config_file.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::raw().only(&ENV_KEYS))
            .merge(Env::prefixed("CLOUDGUARD_"))
    }

    /// Resolve [`Self::database_url`] into a store location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unsupported URLs.
    pub fn store_location(&self) -> Result<StoreLocation, ConfigError> {
        StoreLocation::parse(&self.database_url)
    }

    /// Non-fatal configuration smells worth logging at startup.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.jwt_secret == DEV_JWT_SECRET {
            warnings.push(
                "JWT_SECRET is the development default; set a real secret before deploying"
                    .to_string(),
            );
        }
        if self.cors_origins.iter().any(|origin| origin == "*") {
            warnings.push("CORS_ORIGINS contains '*'; any site can call the API".to_string());
        }
        warnings
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_expire_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "access_token_expire_minutes".into(),
                reason: "must be a positive number of minutes".into(),
            });
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "jwt_secret".into(),
                reason: "must not be empty".into(),
            });
        }
        self.store_location()?;
        Ok(())
    }
}
