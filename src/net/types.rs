//! Wire DTOs for the `/api/auth/*` contract.
//!
//! DESIGN
//! ======
//! `Identity` is owned by the identity service. The client reads `id` and
//! otherwise keeps the record opaque, so unknown fields are carried through
//! untouched instead of being rejected.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// The authenticated principal as returned by `GET /api/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable principal identifier.
    pub id: String,
    /// Every other attribute the server sent.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), attributes: serde_json::Map::new() }
    }
}

/// Which flow the user started at the identity provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    /// Parse the `mode` query parameter. Anything but `signup` is sign-in.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("signup") => Self::SignUp,
            _ => Self::SignIn,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
        }
    }

    /// Route the callback page navigates to after a successful exchange.
    pub fn landing_path(self) -> &'static str {
        match self {
            Self::SignIn => "/dashboard",
            Self::SignUp => "/onboarding",
        }
    }
}

/// Request body for `POST /api/auth/sessions`.
#[derive(Debug, Serialize)]
pub struct ExchangeRequest<'a> {
    pub code: &'a str,
}

/// `{success, error, redirectUrl}` envelope used by the mutating endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}
