//! Networking modules for the auth REST endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the HTTP calls and their failure classification, and `types`
//! defines the wire schema shared with the identity service.

pub mod api;
pub mod types;
