//! Tab-wide auth-session state and the store that owns it.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `AuthStore` is created at app start and shared through context. Guards
//! read it to decide when to stop blocking, the callback page refreshes it
//! after a code exchange, and any component can subscribe to changes.
//!
//! DESIGN
//! ======
//! Single writer: only `refresh()` completions (and `logout()`) mutate the
//! state. Concurrent `refresh()` calls share one in-flight request through a
//! `Shared` future, so a page mounting several consumers at once produces a
//! single `/api/auth/me` call.
//!
//! ERROR HANDLING
//! ==============
//! A failed identity check settles exactly like "signed out". The failure is
//! kept in `last_failure` and logged with its kind, so a dead identity
//! service stays distinguishable from an anonymous visitor in diagnostics.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::error::AuthError;
use crate::net::api::SessionApi;
use crate::net::types::Identity;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<Identity>,
    pub is_loading: bool,
}

impl Default for AuthState {
    /// Nothing is known until the first identity check settles.
    fn default() -> Self {
        Self { user: None, is_loading: true }
    }
}

impl AuthState {
    /// A settled state carrying the last known server answer.
    pub fn settled(user: Option<Identity>) -> Self {
        Self { user, is_loading: false }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Completion of one (possibly shared) identity check.
pub type RefreshHandle = Shared<LocalBoxFuture<'static, AuthState>>;

type Listener = Rc<dyn Fn(&AuthState)>;

struct StoreInner {
    api: Rc<dyn SessionApi>,
    state: RefCell<AuthState>,
    has_settled: Cell<bool>,
    last_failure: RefCell<Option<AuthError>>,
    in_flight: RefCell<Option<RefreshHandle>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener_id: Cell<u64>,
}

/// Owned auth store; clones share the same state.
#[derive(Clone)]
pub struct AuthStore {
    inner: Rc<StoreInner>,
}

impl AuthStore {
    pub fn new(api: Rc<dyn SessionApi>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                api,
                state: RefCell::new(AuthState::default()),
                has_settled: Cell::new(false),
                last_failure: RefCell::new(None),
                in_flight: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// The error behind the most recent signed-out settle, if it was one.
    pub fn last_failure(&self) -> Option<AuthError> {
        self.inner.last_failure.borrow().clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.in_flight.borrow().is_some()
    }

    #[cfg(feature = "hydrate")]
    pub(crate) fn api(&self) -> Rc<dyn SessionApi> {
        self.inner.api.clone()
    }

    /// Re-check identity with the server.
    ///
    /// Joins the in-flight check when one exists. The returned future must
    /// be polled (awaited or spawned) for the request to make progress.
    pub fn refresh(&self) -> RefreshHandle {
        if let Some(pending) = self.inner.in_flight.borrow().as_ref() {
            log::debug!("auth refresh joined in-flight identity check");
            return pending.clone();
        }

        let api = self.inner.api.clone();
        let weak = Rc::downgrade(&self.inner);
        let check = async move {
            let outcome = api.fetch_identity().await;
            settle(&weak, outcome)
        }
        .boxed_local()
        .shared();
        // Registered before listeners run so a refresh from inside one joins it.
        *self.inner.in_flight.borrow_mut() = Some(check.clone());
        self.update(|state| state.is_loading = true);
        check
    }

    /// Start the first identity check if nothing has been checked yet.
    ///
    /// Returns the handle to poll, or `None` when the state is already
    /// settled and no check is running.
    pub fn ensure_loaded(&self) -> Option<RefreshHandle> {
        if let Some(pending) = self.inner.in_flight.borrow().as_ref() {
            return Some(pending.clone());
        }
        if self.inner.has_settled.get() {
            return None;
        }
        Some(self.refresh())
    }

    /// End the session. Always settles to signed out, whatever the server says.
    pub async fn logout(&self) {
        self.inner.api.logout().await;
        log::info!("signed out");
        *self.inner.last_failure.borrow_mut() = None;
        self.inner.has_settled.set(true);
        self.update(|state| *state = AuthState::settled(None));
    }

    /// Observe every state change until the returned guard is dropped.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription { store: Rc::downgrade(&self.inner), id }
    }

    fn update(&self, apply: impl FnOnce(&mut AuthState)) {
        apply(&mut self.inner.state.borrow_mut());
        notify(&self.inner);
    }
}

fn settle(weak: &Weak<StoreInner>, outcome: Result<Option<Identity>, AuthError>) -> AuthState {
    let (user, failure) = match outcome {
        Ok(user) => {
            log::debug!("identity check settled: authenticated={}", user.is_some());
            (user, None)
        }
        Err(err) => {
            log::warn!("identity check failed ({}): {err}", err.kind().as_str());
            (None, Some(err))
        }
    };
    let settled = AuthState::settled(user);

    // Store dropped mid-request: nobody is left to observe the answer.
    let Some(inner) = weak.upgrade() else {
        return settled;
    };
    *inner.last_failure.borrow_mut() = failure;
    *inner.in_flight.borrow_mut() = None;
    inner.has_settled.set(true);
    *inner.state.borrow_mut() = settled.clone();
    notify(&inner);
    settled
}

fn notify(inner: &StoreInner) {
    // Snapshot first: listeners may subscribe or unsubscribe while running.
    let state = inner.state.borrow().clone();
    let listeners: Vec<Listener> = inner.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
    for listener in listeners {
        listener(&state);
    }
}

/// Detaches its listener from the store when dropped.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
