//! "Continue anyway" escape hatch for a stalled auth guard.

use leptos::prelude::*;

use crate::util::bypass;
use crate::util::navigation::BrowserNavigator;
use crate::util::tab_storage::SessionStorage;

/// Skip-the-guard button. `AuthGuard` renders it once its session offers
/// the bypass; it stays until clicked or the guard unmounts.
///
/// Clicking arms the one-shot tab flag and reloads; the next guard mount
/// consumes it.
#[component]
pub fn BypassSwitch() -> impl IntoView {
    let key = StoredValue::new(crate::app::auth_config().bypass_storage_key);

    let on_continue = move |_| {
        key.with_value(|key| bypass::activate(&SessionStorage, &BrowserNavigator, key));
    };

    view! {
        <div class="bypass-switch" role="alert">
            <p class="bypass-switch__hint">"Still checking your session. This is taking longer than usual."</p>
            <button class="btn bypass-switch__button" on:click=on_continue>
                "Continue anyway"
            </button>
        </div>
    }
}
