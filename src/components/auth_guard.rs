//! Render gate for pages that depend on the auth bootstrap.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps route content that should wait for the first identity check. The
//! wrapped content always appears within the configured timeout, whether or
//! not the check ever answers; the guard decides nothing about access. If it
//! revealed on timeout and the check is still pending after the bypass offer
//! delay, a "Continue anyway" switch is shown next to the content.

use leptos::prelude::*;

use super::bypass_switch::BypassSwitch;

#[cfg(feature = "hydrate")]
use std::cell::RefCell;
#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use send_wrapper::SendWrapper;

#[cfg(feature = "hydrate")]
use crate::state::guard::GuardSession;

/// Show `fallback` (a spinner by default) until the auth store settles, the
/// timeout expires, or the bypass flag is set.
#[component]
pub fn AuthGuard(children: ChildrenFn, #[prop(optional, into)] fallback: Option<ViewFn>) -> impl IntoView {
    let revealed = RwSignal::new(false);
    let offered = RwSignal::new(false);
    let fallback = fallback.unwrap_or_else(|| ViewFn::from(|| view! { <GuardSpinner/> }));

    #[cfg(feature = "hydrate")]
    {
        let auth = crate::app::use_auth();
        let slot = SendWrapper::new(Rc::new(RefCell::new(None::<GuardSession>)));
        let mount_slot = slot.clone();
        // Mount after hydration so the first client render matches SSR.
        Effect::new(move |_| {
            if mount_slot.borrow().is_some() {
                return;
            }
            *mount_slot.borrow_mut() = Some(mount_session(auth.as_ref(), revealed, offered));
        });
        on_cleanup(move || {
            slot.borrow_mut().take();
        });
    }

    view! {
        <Show when=move || offered.get()>
            <BypassSwitch/>
        </Show>
        <Show when=move || revealed.get() fallback=fallback>
            {children()}
        </Show>
    }
}

#[cfg(feature = "hydrate")]
fn mount_session(
    auth: Option<&crate::app::AuthContext>,
    revealed: RwSignal<bool>,
    offered: RwSignal<bool>,
) -> GuardSession {
    use crate::state::guard::GuardEnv;
    use crate::util::event_loop::BrowserLoop;
    use crate::util::tab_storage::SessionStorage;

    let config = auth.map(|auth| auth.config.clone()).unwrap_or_default();
    let store = auth.and_then(crate::app::AuthContext::store);
    let env = GuardEnv {
        store: store.as_ref(),
        storage: &SessionStorage,
        event_loop: &BrowserLoop,
        timeout: config.guard_timeout(),
        offer_delay: config.bypass_offer_delay(),
        bypass_key: &config.bypass_storage_key,
    };
    GuardSession::mount(
        &env,
        move |_| {
            let _ = revealed.try_set(true);
        },
        move || {
            let _ = offered.try_set(true);
        },
    )
}

#[component]
fn GuardSpinner() -> impl IntoView {
    view! {
        <div class="auth-guard" role="status" aria-live="polite">
            <div class="auth-guard__spinner" aria-label="Loading"></div>
        </div>
    }
}
