use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use focusflow_core::model::SearchResult;
use focusflow_core::remote::{SearchRemote, SearchScope};

/// How long input must be quiet before a remote search is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest query that triggers a remote search; anything shorter clears.
const MIN_QUERY_CHARS: usize = 2;

/// What the search surface should render.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchPhase {
    /// Nothing to show: no query, or the query is too short.
    Idle,
    /// Debounce armed or a request in flight.
    Pending,
    /// Results arrived; an empty list is the displayable "no results" state.
    Loaded(Vec<SearchResult>),
    /// The remote failed. Results are cleared; no automatic retry.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub phase: SearchPhase,
}

impl SearchState {
    fn cleared() -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::Idle,
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(&self.phase, SearchPhase::Loaded(results) if results.is_empty())
    }
}

/// Debounced, race-safe incremental search over one UI surface.
///
/// Each keystroke cancels the armed debounce timer; when a timer fires, the
/// request it issues is tagged with the next value of a monotonic sequence.
/// A response is applied only while its tag equals the latest sequence value,
/// so a slow early response can never overwrite a later, faster one, and
/// responses landing after [`SearchEngine::dismiss`] are discarded the same
/// way.
pub struct SearchEngine {
    inner: Arc<Inner>,
}

struct Inner {
    remote: Arc<dyn SearchRemote>,
    scope: SearchScope,
    debounce: Duration,
    seq: AtomicU64,
    timer: Mutex<Option<CancellationToken>>,
    state_tx: watch::Sender<SearchState>,
}

impl SearchEngine {
    pub fn new(remote: Arc<dyn SearchRemote>, scope: SearchScope) -> Self {
        Self::with_debounce(remote, scope, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(
        remote: Arc<dyn SearchRemote>,
        scope: SearchScope,
        debounce: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(SearchState::cleared());
        Self {
            inner: Arc::new(Inner {
                remote,
                scope,
                debounce,
                seq: AtomicU64::new(0),
                timer: Mutex::new(None),
                state_tx,
            }),
        }
    }

    pub fn scope(&self) -> SearchScope {
        self.inner.scope
    }

    /// The state a surface should render right now.
    pub fn state(&self) -> SearchState {
        self.inner.state_tx.borrow().clone()
    }

    /// Watch for state changes. Must be called from within a tokio runtime.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state_tx.subscribe()
    }

    /// Feed the current contents of the search box. Must be called from
    /// within a tokio runtime (the debounce timer is a spawned task).
    pub fn set_query(&self, query: &str) {
        let inner = &self.inner;
        inner.cancel_timer();

        if query.chars().count() < MIN_QUERY_CHARS {
            // Too short to search: clear immediately and strand any response
            // still in flight behind the sequence gate.
            inner.seq.fetch_add(1, Ordering::SeqCst);
            inner.replace_state(SearchState {
                query: query.to_string(),
                phase: SearchPhase::Idle,
            });
            return;
        }

        inner.replace_state(SearchState {
            query: query.to_string(),
            phase: SearchPhase::Pending,
        });

        let token = CancellationToken::new();
        *inner.timer.lock() = Some(token.clone());
        let inner = Arc::clone(&self.inner);
        let query = query.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(inner.debounce) => inner.run(&query).await,
            }
        });
    }

    /// The surface was dismissed (e.g. a click outside it): clear the query
    /// and all result state immediately. An in-flight request is left to
    /// finish; its response compares stale and is discarded.
    pub fn dismiss(&self) {
        let inner = &self.inner;
        inner.cancel_timer();
        inner.seq.fetch_add(1, Ordering::SeqCst);
        inner.replace_state(SearchState::cleared());
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        // The timer must not fire after the surface is gone.
        self.inner.cancel_timer();
    }
}

impl Inner {
    fn cancel_timer(&self) {
        if let Some(token) = self.timer.lock().take() {
            token.cancel();
        }
    }

    fn replace_state(&self, state: SearchState) {
        self.state_tx.send_replace(state);
    }

    async fn run(&self, query: &str) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, query, "issuing search");
        let outcome = self.remote.search(query, self.scope).await;

        if self.seq.load(Ordering::SeqCst) != seq {
            debug!(seq, "discarding superseded search response");
            return;
        }

        let phase = match outcome {
            Ok(results) => SearchPhase::Loaded(results),
            Err(err) => {
                warn!(kind = err.error_kind(), "search failed: {err}");
                SearchPhase::Failed(err.to_string())
            }
        };
        self.state_tx.send_modify(|state| state.phase = phase);
    }
}
