//! Auth error taxonomy shared by the session client and state machines.
//!
//! ERROR HANDLING
//! ==============
//! "Not signed in" is never an error: `fetch_identity` returns `Ok(None)`.
//! Everything here is a real failure, but only the callback page ever shows
//! one to the user. The guard collapses all of them to "reveal, no user".

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use thiserror::Error;

/// Failure reported by the session exchange client.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// `exchange_code` was called without a code; no request was sent.
    #[error("no authorization code")]
    MissingCode,
    /// The server rejected the code (expired, reused, or forged).
    #[error("authorization code rejected: {0}")]
    ExchangeRejected(String),
    /// Network failure or 5xx from the identity service.
    #[error("identity service unavailable: {0}")]
    ServiceUnavailable(String),
    /// The server reported it is misconfigured (500 with a message).
    #[error("identity service misconfigured: {0}")]
    Configuration(String),
}

/// Coarse failure domain used for logging and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    InvalidCode,
    NetworkFailure,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::InvalidCode => "invalid_code",
            Self::NetworkFailure => "network_failure",
        }
    }
}

impl AuthError {
    /// Failure domain for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingCode | Self::ExchangeRejected(_) => FailureKind::InvalidCode,
            Self::ServiceUnavailable(_) => FailureKind::NetworkFailure,
            Self::Configuration(_) => FailureKind::Configuration,
        }
    }

    /// Reason text shown on the callback error screen.
    pub fn reason(&self) -> String {
        match self {
            Self::MissingCode => "no code".to_owned(),
            Self::ExchangeRejected(reason) | Self::ServiceUnavailable(reason) | Self::Configuration(reason) => {
                reason.clone()
            }
        }
    }
}
