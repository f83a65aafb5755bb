//! Full-page navigation helpers.
//!
//! Auth transitions (leaving the callback route, the bypass reload) use real
//! document loads rather than router pushes so every component re-mounts
//! against fresh server state.

/// Where the browser goes next.
pub trait Navigator {
    /// Load `path` as a new document.
    fn navigate(&self, path: &str);
    /// Reload the current document.
    fn reload(&self);
}

/// `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
        }
    }

    fn reload(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        }
    }
}
