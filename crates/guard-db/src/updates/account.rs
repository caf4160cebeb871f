//! Cloud account update builder.

use guard_core::enums::AccountStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

pub struct AccountUpdateBuilder(AccountUpdate);

impl AccountUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(AccountUpdate::default())
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.0.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: AccountStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn build(self) -> AccountUpdate {
        self.0
    }
}
impl Default for AccountUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
