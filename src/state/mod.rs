//! Client-side auth state and the state machines built on it.
//!
//! ARCHITECTURE
//! ============
//! `auth` owns the tab-wide identity state. `guard` and `callback` are the
//! two one-shot state machines that read it, and `sign_in` starts the OAuth
//! round trip that ends on the callback route. None of them touch the DOM;
//! components in `crate::components` and `crate::pages` wire them to Leptos.

pub mod auth;
pub mod callback;
pub mod guard;
pub mod sign_in;
