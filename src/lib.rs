//! # session-gate
//!
//! Leptos + WASM authentication bootstrap for the browser client.
//!
//! Decides whether the visiting session is signed in, completes the OAuth
//! authorization-code exchange on the `/auth/callback` landing route, and
//! guarantees gated pages become interactive within a bounded time even when
//! the identity service is slow or down.
//!
//! ARCHITECTURE
//! ============
//! `net` holds the HTTP contract, `state` the auth store and the two state
//! machines (guard, callback), `util` the browser seams (tab storage,
//! navigation, timers), and `components`/`pages` the Leptos views wiring
//! them together; `app::provide_auth` installs the shared context.
//! Everything outside the `hydrate` feature compiles and runs natively so
//! the state layer is testable without a browser.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

pub use config::AuthConfig;
pub use error::{AuthError, FailureKind};

/// Install browser logging and the panic hook.
///
/// Call once from the host app's hydrate entry point before mounting.
#[cfg(feature = "hydrate")]
pub fn init_client() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}
