//! Sign-in and sign-out buttons.
//!
//! Both leave the page with a full document load, so neither needs to update
//! the auth store optimistically.

#[cfg(test)]
#[path = "auth_buttons_test.rs"]
mod auth_buttons_test;

use leptos::prelude::*;

#[cfg(any(test, feature = "hydrate"))]
use crate::error::AuthError;
use crate::net::types::AuthMode;

/// Start the OAuth flow with the configured provider.
#[component]
pub fn SignInButton(#[prop(optional)] mode: AuthMode, #[prop(optional, into)] label: Option<String>) -> impl IntoView {
    let busy = RwSignal::new(false);
    let info = RwSignal::new(String::new());
    let label = label.unwrap_or_else(|| default_label(mode).to_owned());
    #[cfg(feature = "hydrate")]
    let auth = crate::app::use_auth();

    let on_click = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let config = auth.as_ref().map(|auth| auth.config.clone()).unwrap_or_default();
            let api: std::rc::Rc<dyn crate::net::api::SessionApi> =
                match auth.as_ref().and_then(crate::app::AuthContext::store) {
                    Some(store) => store.api(),
                    None => std::rc::Rc::new(crate::net::api::HttpSessionClient::new(config.clone())),
                };
            leptos::task::spawn_local(async move {
                let navigator = crate::util::navigation::BrowserNavigator;
                let result =
                    crate::state::sign_in::begin_sign_in(api.as_ref(), &navigator, &config.provider, mode).await;
                if let Err(e) = result {
                    log::warn!("sign-in start failed ({}): {e}", e.kind().as_str());
                    let _ = info.try_set(sign_in_failure_message(&e));
                    let _ = busy.try_set(false);
                }
            });
        }
    };

    view! {
        <div class="sign-in">
            <button class="btn btn--primary sign-in__button" on:click=on_click disabled=move || busy.get()>
                {label}
            </button>
            <Show when=move || !info.get().is_empty()>
                <p class="sign-in__info">{move || info.get()}</p>
            </Show>
        </div>
    }
}

/// End the session and return to the home page.
#[component]
pub fn SignOutButton() -> impl IntoView {
    let busy = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    let auth = crate::app::use_auth();

    let on_click = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            use crate::util::navigation::Navigator;

            let store = auth.as_ref().and_then(crate::app::AuthContext::store);
            leptos::task::spawn_local(async move {
                if let Some(store) = store {
                    store.logout().await;
                }
                crate::util::navigation::BrowserNavigator.navigate("/");
            });
        }
    };

    view! {
        <button class="btn sign-out__button" on:click=on_click disabled=move || busy.get()>
            "Sign out"
        </button>
    }
}

fn default_label(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::SignIn => "Sign in",
        AuthMode::SignUp => "Create account",
    }
}

/// User-facing text for a failed OAuth start.
#[cfg(any(test, feature = "hydrate"))]
fn sign_in_failure_message(err: &AuthError) -> String {
    match err {
        AuthError::Configuration(_) => "Sign-in is not available right now.".to_owned(),
        AuthError::ServiceUnavailable(_) => "Could not reach the sign-in service. Try again.".to_owned(),
        other => format!("Sign-in failed: {}", other.reason()),
    }
}
