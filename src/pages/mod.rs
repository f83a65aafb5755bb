//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Only the OAuth landing route lives here; every other page belongs to the
//! host app and opts into gating with `components::auth_guard::AuthGuard`.

pub mod callback;
