//! Page fetch controller.
//!
//! Loads one document for a view and tracks the result as a small state
//! machine: `Idle -> Loading -> {Loaded | NotFound | Error}`.
//!
//! Two read paths exist:
//! - public, keyed by slug, only matches published documents
//! - editor, keyed by id, ignores the publish flag
//!
//! Every trigger bumps a generation counter. A completion carrying an older
//! generation is discarded, so a slow response for a previous key can never
//! overwrite the state for the current one. Failed loads are not retried; the
//! caller re-triggers with [`FetchController::refresh`].

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gateway::PageGateway;
use crate::models::{DocumentKind, PageDocument};

/// What identifies the document to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    /// Public path: published documents only.
    Slug { kind: DocumentKind, slug: String },
    /// Editor path: any publish state.
    Id(Uuid),
}

impl FetchKey {
    pub fn slug(kind: DocumentKind, slug: impl Into<String>) -> Self {
        FetchKey::Slug {
            kind,
            slug: slug.into(),
        }
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKey::Slug { kind, slug } => write!(f, "{}/{slug}", kind.as_str()),
            FetchKey::Id(id) => write!(f, "id:{id}"),
        }
    }
}

/// Current state of a fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading {
        key: FetchKey,
    },
    Loaded(Box<PageDocument>),
    NotFound {
        key: FetchKey,
    },
    Error {
        key: FetchKey,
        message: String,
    },
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn document(&self) -> Option<&PageDocument> {
        match self {
            FetchState::Loaded(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Run one load for `key` and return its terminal state.
///
/// Never returns `Idle` or `Loading`.
pub async fn fetch_document(gateway: &dyn PageGateway, key: &FetchKey) -> FetchState {
    let result = match key {
        FetchKey::Slug { kind, slug } => gateway.find_published_by_slug(*kind, slug).await,
        FetchKey::Id(id) => gateway.find_by_id(*id).await,
    };

    match result {
        Ok(Some(doc)) => FetchState::Loaded(Box::new(doc)),
        Ok(None) => {
            debug!(key = %key, "document not found");
            FetchState::NotFound { key: key.clone() }
        }
        Err(e) => {
            warn!(key = %key, error = %e, "document fetch failed");
            FetchState::Error {
                key: key.clone(),
                message: e.to_string(),
            }
        }
    }
}

/// Proof that a load was started, used to deliver its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    key: FetchKey,
}

impl FetchTicket {
    pub fn key(&self) -> &FetchKey {
        &self.key
    }
}

struct ControllerInner {
    generation: u64,
    key: Option<FetchKey>,
    task: Option<JoinHandle<()>>,
}

/// Drives loads for one consuming view.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FetchController {
    gateway: Arc<dyn PageGateway>,
    inner: Arc<Mutex<ControllerInner>>,
    state: Arc<watch::Sender<FetchState>>,
}

impl FetchController {
    pub fn new(gateway: Arc<dyn PageGateway>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            gateway,
            inner: Arc::new(Mutex::new(ControllerInner {
                generation: 0,
                key: None,
                task: None,
            })),
            state: Arc::new(state),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// The key the controller is currently tracking.
    pub fn key(&self) -> Option<FetchKey> {
        self.inner.lock().key.clone()
    }

    /// Start a load for `key`, superseding any load in flight.
    ///
    /// Moves to `Loading` immediately. Deliver the result with
    /// [`complete`](Self::complete).
    pub fn begin(&self, key: FetchKey) -> FetchTicket {
        let mut inner = self.inner.lock();
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        inner.generation += 1;
        inner.key = Some(key.clone());
        self.state.send_replace(FetchState::Loading { key: key.clone() });
        FetchTicket {
            generation: inner.generation,
            key,
        }
    }

    /// Deliver the result of the load identified by `ticket`.
    ///
    /// Returns `false` and leaves the state untouched when the ticket has been
    /// superseded by a later [`begin`](Self::begin) or [`cancel`](Self::cancel).
    pub fn complete(&self, ticket: &FetchTicket, state: FetchState) -> bool {
        deliver(&self.inner, &self.state, ticket, state)
    }

    /// Track `key`, loading it in a background task.
    ///
    /// Setting the key already being tracked does nothing; `None` cancels.
    /// Must be called from within a Tokio runtime.
    pub fn set_key(&self, key: Option<FetchKey>) {
        let Some(key) = key else {
            self.cancel();
            return;
        };
        if self.inner.lock().key.as_ref() == Some(&key) {
            return;
        }
        self.spawn_load(key);
    }

    /// Re-run the load for the current key, e.g. after an error.
    pub fn refresh(&self) {
        if let Some(key) = self.key() {
            self.spawn_load(key);
        }
    }

    /// Stop tracking: abort any load in flight and return to `Idle`.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        inner.generation += 1;
        inner.key = None;
        self.state.send_replace(FetchState::Idle);
    }

    /// Wait until the current load settles and return the resulting state.
    pub async fn settled(&self) -> FetchState {
        let mut rx = self.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so it cannot have been dropped.
            Err(_) => self.state(),
        }
    }

    fn spawn_load(&self, key: FetchKey) {
        let ticket = self.begin(key);
        let generation = ticket.generation;

        // The task holds weak handles so dropping every controller clone
        // aborts it instead of keeping the state alive.
        let inner = Arc::downgrade(&self.inner);
        let state_tx = Arc::downgrade(&self.state);
        let gateway = Arc::clone(&self.gateway);
        let task = tokio::spawn(async move {
            let state = fetch_document(gateway.as_ref(), ticket.key()).await;
            if let (Some(inner), Some(state_tx)) = (inner.upgrade(), state_tx.upgrade()) {
                deliver(&inner, &state_tx, &ticket, state);
            }
        });

        let mut inner = self.inner.lock();
        if inner.generation == generation {
            inner.task = Some(task);
        } else {
            // Superseded before the handle could be stored.
            task.abort();
        }
    }
}

fn deliver(
    inner: &Mutex<ControllerInner>,
    state_tx: &watch::Sender<FetchState>,
    ticket: &FetchTicket,
    state: FetchState,
) -> bool {
    let inner = inner.lock();
    if inner.generation != ticket.generation {
        debug!(
            key = %ticket.key,
            generation = ticket.generation,
            current = inner.generation,
            "discarding stale fetch result"
        );
        return false;
    }
    state_tx.send_replace(state);
    true
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
