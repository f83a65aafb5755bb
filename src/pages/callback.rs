//! OAuth redirect landing page (`/auth/callback`).
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the whole screen and is never wrapped in `AuthGuard`. Shows a
//! spinner while the code is exchanged, a short confirmation before the
//! full-page redirect, or the failure reason with a way back home.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use leptos::prelude::*;
use leptos_meta::Title;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_query_map;

use crate::state::callback::CallbackResult;

#[component]
pub fn CallbackPage() -> impl IntoView {
    let status = RwSignal::new(CallbackResult::Loading);

    #[cfg(feature = "hydrate")]
    {
        use crate::state::callback::CallbackParams;

        let query = use_query_map();
        let auth = crate::app::use_auth();
        let started = StoredValue::new(false);
        Effect::new(move |_| {
            if started.get_value() {
                return;
            }
            started.set_value(true);
            let params = query.with_untracked(|q| CallbackParams::from_query(|key| q.get(key)));
            let stage = crate::app::callback_stage(auth.as_ref());
            stage.begin(params, move |result| {
                // Page may be gone by the time the exchange settles.
                let _ = status.try_set(result);
            });
        });
    }

    view! {
        <Title text=move || status_title(&status.get())/>
        <div class="auth-callback">
            <div class="auth-callback__card">
                {move || {
                    let current = status.get();
                    let title = status_title(&current);
                    match current {
                        CallbackResult::Loading => {
                            view! {
                                <div class="auth-callback__spinner" role="status" aria-label="Loading"></div>
                                <p class="auth-callback__text">{title}</p>
                            }
                                .into_any()
                        }
                        CallbackResult::Success => {
                            view! {
                                <h1 class="auth-callback__title">{title}</h1>
                                <p class="auth-callback__text">"Taking you to your account..."</p>
                            }
                                .into_any()
                        }
                        CallbackResult::Error(reason) => {
                            view! {
                                <h1 class="auth-callback__title auth-callback__title--error">{title}</h1>
                                <p class="auth-callback__reason">{failure_detail(&reason)}</p>
                                <a class="btn auth-callback__home" href="/">"Back to home"</a>
                            }
                                .into_any()
                        }
                    }
                }}
            </div>
        </div>
    }
}

fn status_title(status: &CallbackResult) -> &'static str {
    match status {
        CallbackResult::Loading => "Completing sign-in...",
        CallbackResult::Success => "Signed in",
        CallbackResult::Error(_) => "Authentication Failed",
    }
}

/// Reason line under the failure heading.
fn failure_detail(reason: &str) -> String {
    let reason = reason.trim();
    if reason.is_empty() { "Something went wrong while signing you in.".to_owned() } else { reason.to_owned() }
}
