//! Timer and task seam over the browser event loop.
//!
//! SYSTEM CONTEXT
//! ==============
//! The guard deadline, the bypass offer countdown and the callback success delay
//! are all "sleep, then maybe run". State machines take an `&dyn EventLoop`
//! so tests can drive virtual time instead of waiting on real timers.
//!
//! DESIGN
//! ======
//! A timer is a spawned task that sleeps and then checks a cancellation flag
//! before running its callback, an alive flag checked after the sleep.
//! Dropping the `TimerHandle` flips the flag, so cancelling
//! from inside the callback itself is safe.

#[cfg(test)]
#[path = "event_loop_test.rs"]
mod event_loop_test;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

/// Single-threaded executor + clock.
pub trait EventLoop {
    /// Run `task` to completion in the background.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// Future resolving after `delay`.
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Pending timer; cancelled when dropped.
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle {
    /// Explicit spelling of `drop(handle)`.
    pub fn cancel(self) {}
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

/// Run `callback` once after `delay` unless the returned handle is dropped first.
pub fn set_timeout(event_loop: &dyn EventLoop, delay: Duration, callback: impl FnOnce() + 'static) -> TimerHandle {
    let cancelled = Rc::new(Cell::new(false));
    let flag = cancelled.clone();
    let sleep = event_loop.sleep(delay);
    event_loop.spawn(
        async move {
            sleep.await;
            if !flag.get() {
                callback();
            }
        }
        .boxed_local(),
    );
    TimerHandle { cancelled }
}

/// The real browser loop: `spawn_local` + `setTimeout`-backed sleeps.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLoop;

#[cfg(feature = "hydrate")]
impl EventLoop for BrowserLoop {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(delay).boxed_local()
    }
}
