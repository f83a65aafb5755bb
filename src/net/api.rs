//! Session exchange client for the `/api/auth/*` endpoints.
//!
//! Client-side (hydrate): real credentialed HTTP calls via `gloo-net`. The
//! session itself is an HTTP-only cookie the server sets; this client never
//! sees a token, only success/failure.
//! Server-side (SSR) and native builds: stubs reporting the service as
//! unavailable, since these endpoints only make sense in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Status classification lives in plain functions so the mapping from HTTP
//! outcomes to `AuthError` is testable without a browser. A `401` from
//! `/api/auth/me` is the normal signed-out answer, not a failure.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::types::{ApiResponse, AuthMode, Identity};
use crate::config::AuthConfig;
use crate::error::AuthError;

#[cfg(any(test, feature = "hydrate"))]
const SESSIONS_PATH: &str = "/api/auth/sessions";
#[cfg(any(test, feature = "hydrate"))]
const ME_PATH: &str = "/api/auth/me";
#[cfg(any(test, feature = "hydrate"))]
const LOGOUT_PATH: &str = "/api/auth/logout";

/// The HTTP contract the auth bootstrap depends on.
///
/// Futures are `!Send`: everything runs on the browser's single event loop.
pub trait SessionApi {
    /// Trade a one-time authorization code for a session cookie.
    ///
    /// Callers must invoke this at most once per code; providers invalidate
    /// codes after first use.
    fn exchange_code<'a>(&'a self, code: &'a str) -> LocalBoxFuture<'a, Result<(), AuthError>>;

    /// Current principal, or `None` when the server says "not authenticated".
    fn fetch_identity(&self) -> LocalBoxFuture<'_, Result<Option<Identity>, AuthError>>;

    /// Begin an OAuth flow; resolves to the provider URL to send the browser to.
    fn start_oauth<'a>(&'a self, provider: &'a str, mode: AuthMode) -> LocalBoxFuture<'a, Result<String, AuthError>>;

    /// End the session. Never fails from the caller's point of view.
    fn logout(&self) -> LocalBoxFuture<'_, ()>;
}

/// Reject blank codes before any request is made. The code itself is sent
/// exactly as the provider issued it.
pub(crate) fn validate_code(code: &str) -> Result<&str, AuthError> {
    if code.trim().is_empty() { Err(AuthError::MissingCode) } else { Ok(code) }
}

#[cfg(any(test, feature = "hydrate"))]
fn oauth_start_path(provider: &str, mode: AuthMode) -> String {
    format!(
        "/api/auth/oauth/start?provider={}&mode={}",
        urlencoding::encode(provider),
        mode.as_str()
    )
}

#[cfg(any(test, feature = "hydrate"))]
fn status_failure_message(status: u16) -> String {
    format!("identity service returned {status}")
}

/// Map a `POST /api/auth/sessions` response onto the exchange outcome.
#[cfg(any(test, feature = "hydrate"))]
fn classify_exchange_response(status: u16, body: Option<ApiResponse>) -> Result<(), AuthError> {
    let error = body.as_ref().and_then(|b| b.error.clone());
    match status {
        200..=299 => match body {
            Some(body) if !body.success => {
                Err(AuthError::ExchangeRejected(error.unwrap_or_else(|| "exchange rejected".to_owned())))
            }
            _ => Ok(()),
        },
        500 if error.is_some() => Err(AuthError::Configuration(error.unwrap_or_default())),
        500..=599 => Err(AuthError::ServiceUnavailable(status_failure_message(status))),
        _ => Err(AuthError::ExchangeRejected(error.unwrap_or_else(|| status_failure_message(status)))),
    }
}

/// Whether a `GET /api/auth/me` status carries an identity body.
///
/// `Ok(false)` means signed out; that is the expected answer for anonymous
/// visitors and must not be logged as a failure.
#[cfg(any(test, feature = "hydrate"))]
fn classify_identity_status(status: u16) -> Result<bool, AuthError> {
    match status {
        200..=299 => Ok(true),
        401 => Ok(false),
        _ => Err(AuthError::ServiceUnavailable(status_failure_message(status))),
    }
}

/// Map a `POST /api/auth/oauth/start` response onto the redirect URL.
#[cfg(any(test, feature = "hydrate"))]
fn classify_start_response(status: u16, body: Option<ApiResponse>) -> Result<String, AuthError> {
    let body = body.unwrap_or_default();
    match (status, body.success, body.redirect_url) {
        (200..=299, true, Some(url)) if !url.is_empty() => Ok(url),
        (500, _, _) if body.error.is_some() => Err(AuthError::Configuration(body.error.unwrap_or_default())),
        (200..=299, _, _) => Err(AuthError::Configuration(
            body.error.unwrap_or_else(|| "missing redirect url".to_owned()),
        )),
        _ => Err(AuthError::ServiceUnavailable(status_failure_message(status))),
    }
}

#[cfg(feature = "hydrate")]
fn transport_error(err: gloo_net::Error) -> AuthError {
    AuthError::ServiceUnavailable(err.to_string())
}

/// Browser implementation backed by `fetch` with `credentials: include`.
#[derive(Clone, Debug, Default)]
pub struct HttpSessionClient {
    config: AuthConfig,
}

impl HttpSessionClient {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[cfg(feature = "hydrate")]
    async fn send_exchange(&self, code: &str) -> Result<(), AuthError> {
        use super::types::ExchangeRequest;

        let resp = gloo_net::http::Request::post(&self.config.endpoint(SESSIONS_PATH))
            .credentials(web_sys::RequestCredentials::Include)
            .json(&ExchangeRequest { code })
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        let body = resp.json::<ApiResponse>().await.ok();
        classify_exchange_response(status, body)
    }

    #[cfg(feature = "hydrate")]
    async fn send_identity(&self) -> Result<Option<Identity>, AuthError> {
        let resp = gloo_net::http::Request::get(&self.config.endpoint(ME_PATH))
            .credentials(web_sys::RequestCredentials::Include)
            .send()
            .await
            .map_err(transport_error)?;
        if !classify_identity_status(resp.status())? {
            return Ok(None);
        }
        resp.json::<Identity>()
            .await
            .map(Some)
            .map_err(|e| AuthError::ServiceUnavailable(format!("malformed identity: {e}")))
    }

    #[cfg(feature = "hydrate")]
    async fn send_start(&self, provider: &str, mode: AuthMode) -> Result<String, AuthError> {
        let resp = gloo_net::http::Request::post(&self.config.endpoint(&oauth_start_path(provider, mode)))
            .credentials(web_sys::RequestCredentials::Include)
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        let body = resp.json::<ApiResponse>().await.ok();
        classify_start_response(status, body)
    }
}

impl SessionApi for HttpSessionClient {
    fn exchange_code<'a>(&'a self, code: &'a str) -> LocalBoxFuture<'a, Result<(), AuthError>> {
        async move {
            let code = validate_code(code)?;
            #[cfg(feature = "hydrate")]
            {
                self.send_exchange(code).await
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = code;
                Err(AuthError::ServiceUnavailable("not available on server".to_owned()))
            }
        }
        .boxed_local()
    }

    fn fetch_identity(&self) -> LocalBoxFuture<'_, Result<Option<Identity>, AuthError>> {
        async move {
            #[cfg(feature = "hydrate")]
            {
                self.send_identity().await
            }
            #[cfg(not(feature = "hydrate"))]
            {
                Err(AuthError::ServiceUnavailable("not available on server".to_owned()))
            }
        }
        .boxed_local()
    }

    fn start_oauth<'a>(&'a self, provider: &'a str, mode: AuthMode) -> LocalBoxFuture<'a, Result<String, AuthError>> {
        async move {
            #[cfg(feature = "hydrate")]
            {
                self.send_start(provider, mode).await
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (provider, mode);
                Err(AuthError::ServiceUnavailable("not available on server".to_owned()))
            }
        }
        .boxed_local()
    }

    fn logout(&self) -> LocalBoxFuture<'_, ()> {
        async move {
            #[cfg(feature = "hydrate")]
            {
                let sent = gloo_net::http::Request::post(&self.config.endpoint(LOGOUT_PATH))
                    .credentials(web_sys::RequestCredentials::Include)
                    .send()
                    .await;
                if let Err(e) = sent {
                    log::debug!("logout request failed (ignored): {e}");
                }
            }
        }
        .boxed_local()
    }
}
