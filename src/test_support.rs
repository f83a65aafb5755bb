//! Test doubles for the browser seams: session API, tab storage, navigation
//! and a virtual-time event loop.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::error::AuthError;
use crate::net::api::{SessionApi, validate_code};
use crate::net::types::{AuthMode, Identity};
use crate::util::event_loop::EventLoop;
use crate::util::navigation::Navigator;
use crate::util::tab_storage::TabStorage;

// =============================================================
// Event loop with manual clock
// =============================================================

pub struct ManualLoop {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    now: Cell<Duration>,
    sleepers: RefCell<Vec<(Duration, oneshot::Sender<()>)>>,
}

impl ManualLoop {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: RefCell::new(pool),
            spawner,
            now: Cell::new(Duration::ZERO),
            sleepers: RefCell::new(Vec::new()),
        }
    }

    /// Poll every spawned task until none can make progress.
    pub fn run(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Move the clock forward, waking sleepers in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        self.run();
        loop {
            let due = {
                let mut sleepers = self.sleepers.borrow_mut();
                let next = sleepers
                    .iter()
                    .enumerate()
                    .filter(|(_, (deadline, _))| *deadline <= target)
                    .min_by_key(|(_, (deadline, _))| *deadline)
                    .map(|(idx, _)| idx);
                next.map(|idx| sleepers.remove(idx))
            };
            let Some((deadline, tx)) = due else {
                break;
            };
            self.now.set(deadline);
            let _ = tx.send(());
            self.run();
        }
        self.now.set(target);
        self.run();
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl EventLoop for ManualLoop {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("local pool accepts tasks");
    }

    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel();
        self.sleepers.borrow_mut().push((self.now.get() + delay, tx));
        rx.map(|_| ()).boxed_local()
    }
}

// =============================================================
// Tab storage
// =============================================================

#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl TabStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

// =============================================================
// Navigation
// =============================================================

#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: RefCell<Vec<String>>,
    pub reloads: Cell<usize>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_owned());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

// =============================================================
// Session API
// =============================================================

/// Canned or test-controlled reply.
enum Reply<T> {
    Ready(T),
    Gate(oneshot::Receiver<T>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Gate(rx) => match rx.await {
                Ok(value) => value,
                // Sender dropped: the request hangs forever.
                Err(_) => futures::future::pending().await,
            },
        }
    }
}

type IdentityResult = Result<Option<Identity>, AuthError>;

#[derive(Default)]
pub struct FakeApi {
    pub identity_calls: Cell<usize>,
    pub exchanged_codes: RefCell<Vec<String>>,
    pub logout_calls: Cell<usize>,
    pub start_calls: RefCell<Vec<(String, AuthMode)>>,
    identity_replies: RefCell<VecDeque<Reply<IdentityResult>>>,
    exchange_replies: RefCell<VecDeque<Reply<Result<(), AuthError>>>>,
    start_reply: RefCell<Option<Result<String, AuthError>>>,
}

impl FakeApi {
    /// Queue an immediate `fetch_identity` answer.
    pub fn reply_identity(&self, result: IdentityResult) {
        self.identity_replies.borrow_mut().push_back(Reply::Ready(result));
    }

    /// Queue a `fetch_identity` answer the test releases later. Dropping the
    /// sender leaves the request hanging forever.
    pub fn hold_identity(&self) -> oneshot::Sender<IdentityResult> {
        let (tx, rx) = oneshot::channel();
        self.identity_replies.borrow_mut().push_back(Reply::Gate(rx));
        tx
    }

    pub fn reply_exchange(&self, result: Result<(), AuthError>) {
        self.exchange_replies.borrow_mut().push_back(Reply::Ready(result));
    }

    pub fn hold_exchange(&self) -> oneshot::Sender<Result<(), AuthError>> {
        let (tx, rx) = oneshot::channel();
        self.exchange_replies.borrow_mut().push_back(Reply::Gate(rx));
        tx
    }

    pub fn reply_start(&self, result: Result<String, AuthError>) {
        *self.start_reply.borrow_mut() = Some(result);
    }
}

impl SessionApi for FakeApi {
    fn exchange_code<'a>(&'a self, code: &'a str) -> LocalBoxFuture<'a, Result<(), AuthError>> {
        if let Err(e) = validate_code(code) {
            return futures::future::ready(Err(e)).boxed_local();
        }
        self.exchanged_codes.borrow_mut().push(code.to_owned());
        let reply = self.exchange_replies.borrow_mut().pop_front();
        async move {
            match reply {
                Some(reply) => reply.resolve().await,
                None => Ok(()),
            }
        }
        .boxed_local()
    }

    fn fetch_identity(&self) -> LocalBoxFuture<'_, IdentityResult> {
        self.identity_calls.set(self.identity_calls.get() + 1);
        let reply = self.identity_replies.borrow_mut().pop_front();
        async move {
            match reply {
                Some(reply) => reply.resolve().await,
                None => Ok(None),
            }
        }
        .boxed_local()
    }

    fn start_oauth<'a>(&'a self, provider: &'a str, mode: AuthMode) -> LocalBoxFuture<'a, Result<String, AuthError>> {
        self.start_calls.borrow_mut().push((provider.to_owned(), mode));
        let reply = self
            .start_reply
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Ok(format!("https://idp.example/authorize?provider={provider}")));
        futures::future::ready(reply).boxed_local()
    }

    fn logout(&self) -> LocalBoxFuture<'_, ()> {
        self.logout_calls.set(self.logout_calls.get() + 1);
        futures::future::ready(()).boxed_local()
    }
}

pub fn identity(id: &str) -> Identity {
    Identity::new(id)
}
