//! Auth guard state machine: when may a gated page stop showing its spinner?
//!
//! ARCHITECTURE
//! ============
//! `GuardMachine` is the pure transition function: `Waiting` moves to
//! `Revealed(cause)` on the first trigger and ignores everything after.
//! `GuardSession` is one mount of a guard: it owns the deadline timer and the
//! store subscription, feeds their events into the machine, and tears both
//! down on reveal or unmount.
//!
//! A guard that reveals on timeout while the store is still loading keeps a
//! second countdown running. When it expires and the check has still not
//! answered, the session offers the bypass switch. The offer is measured
//! from mount, so with the default config it appears 5 s after mount and
//! 2.5 s after the timeout reveal.
//!
//! TRADE-OFFS
//! ==========
//! Reveal is advisory. The guard answers "is it safe to stop waiting", never
//! "is this user allowed"; protected API calls enforce authorization again.
//! A broken or missing auth integration therefore reveals immediately with no
//! user instead of blanking the app.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::FutureExt;

use super::auth::{AuthStore, Subscription};
use crate::util::bypass;
use crate::util::event_loop::{EventLoop, TimerHandle, set_timeout};
use crate::util::tab_storage::TabStorage;

/// Event fed into the guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardTrigger {
    /// The mount deadline elapsed.
    Timeout,
    /// The auth store was observed settled (`is_loading == false`).
    AuthSettled,
    /// The one-shot bypass flag was present at mount.
    Bypass,
    /// No auth store could be reached; treated as an immediate settle.
    AuthUnavailable,
}

/// Why a guard revealed its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealCause {
    Timeout,
    Completion,
    Bypass,
}

impl RevealCause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Completion => "completion",
            Self::Bypass => "bypass",
        }
    }
}

/// Guard phase. `Revealed` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardMachine {
    #[default]
    Waiting,
    Revealed(RevealCause),
}

impl GuardMachine {
    /// Apply `trigger`. Returns the cause only on the transition into `Revealed`.
    pub fn apply(&mut self, trigger: GuardTrigger) -> Option<RevealCause> {
        if let Self::Revealed(_) = self {
            return None;
        }
        let cause = match trigger {
            GuardTrigger::Timeout => RevealCause::Timeout,
            GuardTrigger::AuthSettled | GuardTrigger::AuthUnavailable => RevealCause::Completion,
            GuardTrigger::Bypass => RevealCause::Bypass,
        };
        *self = Self::Revealed(cause);
        Some(cause)
    }

    pub fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}

/// Everything a guard mount needs from its environment.
pub struct GuardEnv<'a> {
    pub store: Option<&'a AuthStore>,
    pub storage: &'a dyn TabStorage,
    pub event_loop: &'a dyn EventLoop,
    pub timeout: Duration,
    /// Countdown from mount before a timed-out guard offers the bypass.
    pub offer_delay: Duration,
    pub bypass_key: &'a str,
}

type RevealCallback = Box<dyn FnOnce(RevealCause)>;
type OfferCallback = Box<dyn FnOnce()>;

struct SessionInner {
    machine: Cell<GuardMachine>,
    mounted: Cell<bool>,
    timer: RefCell<Option<TimerHandle>>,
    subscription: RefCell<Option<Subscription>>,
    on_reveal: RefCell<Option<RevealCallback>>,
    store: Option<AuthStore>,
    offer_timer: RefCell<Option<TimerHandle>>,
    offer_due: Cell<bool>,
    offered: Cell<bool>,
    on_offer: RefCell<Option<OfferCallback>>,
}

impl SessionInner {
    fn fire(&self, trigger: GuardTrigger) {
        if !self.mounted.get() {
            return;
        }
        let mut machine = self.machine.get();
        let Some(cause) = machine.apply(trigger) else {
            return;
        };
        self.machine.set(machine);
        self.teardown();
        if cause != RevealCause::Timeout {
            self.offer_timer.borrow_mut().take();
        }
        log::debug!("auth guard revealed: {}", cause.as_str());
        let callback = self.on_reveal.borrow_mut().take();
        if let Some(callback) = callback {
            callback(cause);
        }
        if cause == RevealCause::Timeout && self.offer_due.get() {
            self.offer();
        }
    }

    /// Offer countdown expired.
    fn offer_elapsed(&self) {
        if !self.mounted.get() {
            return;
        }
        self.offer_due.set(true);
        if self.machine.get() == GuardMachine::Revealed(RevealCause::Timeout) {
            self.offer();
        }
    }

    fn offer(&self) {
        self.offer_timer.borrow_mut().take();
        let still_loading = self.store.as_ref().is_some_and(|store| store.snapshot().is_loading);
        if self.offered.get() || !still_loading {
            return;
        }
        self.offered.set(true);
        log::info!("identity check still pending after timeout; offering bypass");
        let callback = self.on_offer.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }

    fn teardown(&self) {
        let timer = self.timer.borrow_mut().take();
        let subscription = self.subscription.borrow_mut().take();
        drop(timer);
        drop(subscription);
    }
}

/// One mounted guard.
pub struct GuardSession {
    inner: Rc<SessionInner>,
}

impl GuardSession {
    /// Mount a guard. `on_reveal` runs at most once, possibly before this
    /// returns. `on_offer` runs at most once, only after a timeout reveal.
    pub fn mount(
        env: &GuardEnv<'_>,
        on_reveal: impl FnOnce(RevealCause) + 'static,
        on_offer: impl FnOnce() + 'static,
    ) -> Self {
        let inner = Rc::new(SessionInner {
            machine: Cell::new(GuardMachine::Waiting),
            mounted: Cell::new(true),
            timer: RefCell::new(None),
            subscription: RefCell::new(None),
            on_reveal: RefCell::new(Some(Box::new(on_reveal))),
            store: env.store.cloned(),
            offer_timer: RefCell::new(None),
            offer_due: Cell::new(false),
            offered: Cell::new(false),
            on_offer: RefCell::new(Some(Box::new(on_offer))),
        });
        let session = Self { inner };

        // PHASE: BYPASS
        // The flag is taken on every mount so it can never outlive one page load.
        if bypass::take(env.storage, env.bypass_key) {
            session.inner.fire(GuardTrigger::Bypass);
            return session;
        }

        let Some(store) = env.store else {
            log::warn!("auth guard mounted without an auth store; revealing");
            session.inner.fire(GuardTrigger::AuthUnavailable);
            return session;
        };

        // PHASE: ARM DEADLINE
        let weak = Rc::downgrade(&session.inner);
        let timer = set_timeout(env.event_loop, env.timeout, move || with_live(&weak, GuardTrigger::Timeout));
        *session.inner.timer.borrow_mut() = Some(timer);

        // PHASE: ARM BYPASS OFFER
        let weak = Rc::downgrade(&session.inner);
        let offer_timer = set_timeout(env.event_loop, env.offer_delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.offer_elapsed();
            }
        });
        *session.inner.offer_timer.borrow_mut() = Some(offer_timer);

        // PHASE: WATCH STORE
        let weak = Rc::downgrade(&session.inner);
        let subscription = store.subscribe(move |state| {
            if !state.is_loading {
                with_live(&weak, GuardTrigger::AuthSettled);
            }
        });
        *session.inner.subscription.borrow_mut() = Some(subscription);

        if !store.snapshot().is_loading {
            session.inner.fire(GuardTrigger::AuthSettled);
            return session;
        }
        if let Some(check) = store.ensure_loaded() {
            env.event_loop.spawn(check.map(drop).boxed_local());
        }
        session
    }

    pub fn phase(&self) -> GuardMachine {
        self.inner.machine.get()
    }

    pub fn is_revealed(&self) -> bool {
        self.phase().is_revealed()
    }

    /// Whether the bypass switch has been offered. Stays set until unmount.
    pub fn is_bypass_offered(&self) -> bool {
        self.inner.offered.get()
    }

    /// Detach from the store and cancel the deadline. Nothing fires afterwards.
    pub fn unmount(self) {}
}

impl Drop for GuardSession {
    fn drop(&mut self) {
        self.inner.mounted.set(false);
        self.inner.teardown();
        self.inner.offer_timer.borrow_mut().take();
        self.inner.on_reveal.borrow_mut().take();
        self.inner.on_offer.borrow_mut().take();
    }
}

fn with_live(weak: &Weak<SessionInner>, trigger: GuardTrigger) {
    if let Some(inner) = weak.upgrade() {
        inner.fire(trigger);
    }
}
