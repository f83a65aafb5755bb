//! Reusable auth UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the auth context installed by `crate::app::provide_auth`
//! and drive the state machines in `crate::state`; none of them hold auth
//! state of their own beyond view flags.

pub mod auth_buttons;
pub mod auth_guard;
pub mod bypass_switch;
