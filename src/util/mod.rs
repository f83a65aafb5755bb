//! Browser/environment seams shared by state machines and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each seam is a small trait with a hydrate-backed browser implementation,
//! so the auth state machines can be driven natively in tests.

pub mod bypass;
pub mod event_loop;
pub mod navigation;
pub mod tab_storage;
