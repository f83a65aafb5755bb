//! Client-side tunables for the auth bootstrap.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host app builds one `AuthConfig` at startup (usually `Default`, or
//! parsed from a JSON blob the server embeds in the page) and hands it to
//! `provide_auth`. Every timer in this crate reads its delay from here.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_GUARD_TIMEOUT_MS: u32 = 2_500;
const DEFAULT_BYPASS_OFFER_DELAY_MS: u32 = 5_000;
const DEFAULT_SUCCESS_REDIRECT_DELAY_MS: u32 = 1_500;
const DEFAULT_BYPASS_STORAGE_KEY: &str = "auth_guard_bypass";
const DEFAULT_PROVIDER: &str = "google";

/// Auth bootstrap configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Prefix prepended to every `/api/auth/*` path. Empty means same origin.
    pub api_base: String,
    /// Hard deadline after which a guard reveals regardless of auth.
    pub guard_timeout_ms: u32,
    /// Countdown before the "continue anyway" affordance appears.
    pub bypass_offer_delay_ms: u32,
    /// How long the callback success screen stays up before navigating.
    pub success_redirect_delay_ms: u32,
    /// `sessionStorage` key holding the one-shot bypass flag.
    pub bypass_storage_key: String,
    /// Identity provider passed to `/api/auth/oauth/start`.
    pub provider: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            guard_timeout_ms: DEFAULT_GUARD_TIMEOUT_MS,
            bypass_offer_delay_ms: DEFAULT_BYPASS_OFFER_DELAY_MS,
            success_redirect_delay_ms: DEFAULT_SUCCESS_REDIRECT_DELAY_MS,
            bypass_storage_key: DEFAULT_BYPASS_STORAGE_KEY.to_owned(),
            provider: DEFAULT_PROVIDER.to_owned(),
        }
    }
}

impl AuthConfig {
    /// Parse a config from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the serde error if `raw` is not a JSON object of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn guard_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.guard_timeout_ms))
    }

    pub fn bypass_offer_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.bypass_offer_delay_ms))
    }

    pub fn success_redirect_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.success_redirect_delay_ms))
    }

    /// Absolute URL for an `/api/...` path under `api_base`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base.trim_end_matches('/'))
    }
}
