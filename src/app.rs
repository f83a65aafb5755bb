//! Auth context provider for the host application.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host app calls `provide_auth` once in its root component, before the
//! router. Guards, the sign-in button and the callback page find everything
//! they need through `use_context::<AuthContext>()`; when no provider is
//! installed they fall back to revealing immediately with no user.
//!
//! DESIGN
//! ======
//! The store and exchange ledger are `Rc`-based and live only in the
//! browser. They are created under `hydrate` and carried in `SendWrapper` so
//! the context value satisfies Leptos' `Send + Sync` bound; SSR renders with
//! no handles and the default loading state. `state` mirrors the store into a
//! signal for views that only need to read it.

use leptos::prelude::*;
use send_wrapper::SendWrapper;

use crate::config::AuthConfig;
use crate::state::auth::{AuthState, AuthStore};

#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use crate::net::api::SessionApi;
#[cfg(feature = "hydrate")]
use crate::state::auth::Subscription;
#[cfg(feature = "hydrate")]
use crate::state::callback::{CallbackStage, ExchangeLedger};

/// Browser-only handles behind the context.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
#[derive(Clone)]
struct AuthHandles {
    store: AuthStore,
    #[cfg(feature = "hydrate")]
    ledger: ExchangeLedger,
    #[cfg(feature = "hydrate")]
    _mirror: Rc<Subscription>,
}

/// Everything auth-aware components read from context.
#[derive(Clone)]
pub struct AuthContext {
    pub config: AuthConfig,
    /// Reactive mirror of the store's state.
    pub state: RwSignal<AuthState>,
    handles: Option<SendWrapper<AuthHandles>>,
}

impl AuthContext {
    /// The tab's auth store. `None` outside the browser.
    pub fn store(&self) -> Option<AuthStore> {
        self.handles.as_ref().map(|handles| handles.store.clone())
    }
}

/// Install the auth context and start the first identity check.
pub fn provide_auth(config: AuthConfig) -> AuthContext {
    let state = RwSignal::new(AuthState::default());
    let context = AuthContext { handles: create_handles(&config, state), config, state };
    provide_context(context.clone());
    context
}

#[cfg(feature = "hydrate")]
fn create_handles(config: &AuthConfig, state: RwSignal<AuthState>) -> Option<SendWrapper<AuthHandles>> {
    use futures::FutureExt;

    use crate::net::api::HttpSessionClient;
    use crate::util::event_loop::{BrowserLoop, EventLoop};

    let store = AuthStore::new(Rc::new(HttpSessionClient::new(config.clone())));
    let mirror = store.subscribe(move |next| {
        let _ = state.try_set(next.clone());
    });
    if let Some(check) = store.ensure_loaded() {
        BrowserLoop.spawn(check.map(drop).boxed_local());
    }
    Some(SendWrapper::new(AuthHandles { store, ledger: ExchangeLedger::default(), _mirror: Rc::new(mirror) }))
}

#[cfg(not(feature = "hydrate"))]
fn create_handles(_config: &AuthConfig, _state: RwSignal<AuthState>) -> Option<SendWrapper<AuthHandles>> {
    None
}

/// Callback-page driver sharing the context's store and ledger, or a
/// standalone one when no provider is installed.
#[cfg(feature = "hydrate")]
pub fn callback_stage(auth: Option<&AuthContext>) -> CallbackStage {
    use crate::net::api::HttpSessionClient;
    use crate::util::event_loop::BrowserLoop;
    use crate::util::navigation::BrowserNavigator;

    let config = auth.map(|auth| auth.config.clone()).unwrap_or_default();
    let (api, store, ledger) = match auth.and_then(|auth| auth.handles.as_ref()) {
        Some(handles) => (handles.store.api(), Some(handles.store.clone()), handles.ledger.clone()),
        None => {
            let api: Rc<dyn SessionApi> = Rc::new(HttpSessionClient::new(config.clone()));
            (api, None, ExchangeLedger::default())
        }
    };
    CallbackStage {
        api,
        store,
        ledger,
        event_loop: Rc::new(BrowserLoop),
        navigator: Rc::new(BrowserNavigator),
        redirect_delay: config.success_redirect_delay(),
    }
}

/// Read the installed auth context, if any.
pub fn use_auth() -> Option<AuthContext> {
    use_context::<AuthContext>()
}

/// Config from context, or defaults when no provider is installed.
pub fn auth_config() -> AuthConfig {
    use_auth().map(|auth| auth.config).unwrap_or_default()
}
