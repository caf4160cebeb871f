//! Shared application state handed to every handler.

use std::sync::Arc;

use guard_auth::{AuthError, TokenService};
use guard_config::GuardConfig;
use guard_db::service::GuardService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GuardService>,
    pub tokens: Arc<TokenService>,
    pub app_name: Arc<str>,
}

impl AppState {
    pub fn new(service: GuardService, tokens: TokenService, app_name: impl Into<Arc<str>>) -> Self {
        Self {
            service: Arc::new(service),
            tokens: Arc::new(tokens),
            app_name: app_name.into(),
        }
    }

    /// Build state from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnsupportedAlgorithm` for a non-HMAC `jwt_algorithm`.
    pub fn from_config(config: &GuardConfig, service: GuardService) -> Result<Self, AuthError> {
        let tokens = TokenService::new(
            &config.jwt_secret,
            &config.jwt_algorithm,
            config.access_token_expire_minutes,
        )?;
        Ok(Self::new(service, tokens, config.app_name.as_str()))
    }
}
