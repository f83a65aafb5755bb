//! One-shot "continue anyway" flag for a stalled auth guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bypass switch arms the flag and reloads the tab; the next guard to
//! mount takes it and reveals immediately. The flag lives in tab storage so
//! it is visible at the earliest point of the reloaded page.
//!
//! DESIGN
//! ======
//! `take` reads and deletes in one call. No caller ever observes the flag
//! without clearing it, so a second mount (or a later reload the user did
//! not ask for) cannot bypass again.

#[cfg(test)]
#[path = "bypass_test.rs"]
mod bypass_test;

use super::navigation::Navigator;
use super::tab_storage::TabStorage;

const FLAG_VALUE: &str = "true";

/// Consume the flag. Returns whether it was set.
pub fn take(storage: &dyn TabStorage, key: &str) -> bool {
    let value = storage.get(key);
    storage.remove(key);
    value.as_deref() == Some(FLAG_VALUE)
}

/// Set the flag for the next guard mount in this tab.
pub fn arm(storage: &dyn TabStorage, key: &str) {
    storage.set(key, FLAG_VALUE);
}

/// User chose to skip the guard: arm the flag and reload the page.
pub fn activate(storage: &dyn TabStorage, navigator: &dyn Navigator, key: &str) {
    log::info!("auth guard bypass requested; reloading");
    arm(storage, key);
    navigator.reload();
}
