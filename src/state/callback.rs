//! OAuth redirect landing: exchange the authorization code exactly once.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity provider redirects back to `/auth/callback?code&error&mode`.
//! `CallbackStage` turns those query parameters into a one-shot exchange,
//! refreshes the auth store on success and sends the browser to its landing
//! page after a short confirmation delay.
//!
//! DESIGN
//! ======
//! Exchanges are keyed by code in an `ExchangeLedger` that lives in app
//! context, not in the page. A page that mounts twice for the same code joins
//! the first exchange's outcome instead of spending the code again. Only the
//! run that started the exchange refreshes the store and navigates.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use super::auth::AuthStore;
use crate::error::AuthError;
use crate::net::api::SessionApi;
use crate::net::types::AuthMode;
use crate::util::event_loop::EventLoop;
use crate::util::navigation::Navigator;

/// What the callback page shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CallbackResult {
    #[default]
    Loading,
    Success,
    Error(String),
}

/// Query parameters of the landing route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub mode: AuthMode,
}

impl CallbackParams {
    /// Read the parameters through `get`. Empty values count as absent.
    pub fn from_query(get: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| get(key).filter(|value| !value.is_empty());
        Self {
            code: present("code"),
            error: present("error"),
            mode: AuthMode::parse(get("mode").as_deref()),
        }
    }
}

/// Shared outcome of one code exchange.
pub type ExchangeOutcome = Shared<LocalBoxFuture<'static, Result<(), AuthError>>>;

/// Codes already sent for exchange during this page load.
#[derive(Clone, Default)]
pub struct ExchangeLedger {
    entries: Rc<RefCell<HashMap<String, ExchangeOutcome>>>,
}

impl ExchangeLedger {
    /// Outcome for `code`, calling `start` only if the code is new.
    /// The flag is `true` for the caller that started the exchange.
    pub fn claim(
        &self,
        code: &str,
        start: impl FnOnce() -> LocalBoxFuture<'static, Result<(), AuthError>>,
    ) -> (ExchangeOutcome, bool) {
        let mut entries = self.entries.borrow_mut();
        if let Some(outcome) = entries.get(code) {
            return (outcome.clone(), false);
        }
        let outcome = start().shared();
        entries.insert(code.to_owned(), outcome.clone());
        (outcome, true)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.borrow().contains_key(code)
    }
}

/// Callback-page driver. Owns handles so its work can outlive the page.
#[derive(Clone)]
pub struct CallbackStage {
    pub api: Rc<dyn SessionApi>,
    pub store: Option<AuthStore>,
    pub ledger: ExchangeLedger,
    pub event_loop: Rc<dyn EventLoop>,
    pub navigator: Rc<dyn Navigator>,
    pub redirect_delay: Duration,
}

impl CallbackStage {
    /// Decide the outcome for `params`, reporting it through `on_status`.
    ///
    /// Terminal errors are reported before this returns; an exchange reports
    /// from a spawned task.
    pub fn begin(&self, params: CallbackParams, on_status: impl Fn(CallbackResult) + 'static) {
        if let Some(error) = params.error {
            log::warn!("identity provider returned error: {error}");
            on_status(CallbackResult::Error(error));
            return;
        }
        let Some(code) = params.code else {
            on_status(CallbackResult::Error(AuthError::MissingCode.reason()));
            return;
        };

        let api = self.api.clone();
        let (outcome, leader) = self.ledger.claim(&code, || {
            let code = code.clone();
            async move { api.exchange_code(&code).await }.boxed_local()
        });
        if !leader {
            log::debug!("auth callback joined exchange already in flight");
        }

        let stage = self.clone();
        let mode = params.mode;
        self.event_loop.spawn(
            async move {
                match outcome.await {
                    Ok(()) => {
                        on_status(CallbackResult::Success);
                        if leader {
                            stage.finish_sign_in(mode).await;
                        }
                    }
                    Err(err) => {
                        log::warn!("code exchange failed ({}): {err}", err.kind().as_str());
                        on_status(CallbackResult::Error(err.reason()));
                    }
                }
            }
            .boxed_local(),
        );
    }

    async fn finish_sign_in(&self, mode: AuthMode) {
        if let Some(store) = &self.store {
            self.event_loop.spawn(store.refresh().map(drop).boxed_local());
        }
        self.event_loop.sleep(self.redirect_delay).await;
        let landing = mode.landing_path();
        log::info!("sign-in complete; continuing to {landing}");
        self.navigator.navigate(landing);
    }
}
