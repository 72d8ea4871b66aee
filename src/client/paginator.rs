//! Accumulating pagination client

use super::source::PageSource;
use crate::error::Result;
use crate::types::{Page, Record};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Lifecycle of a paginated view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// First page in flight
    Loading,
    /// At least one page held, nothing in flight
    Ready,
    /// A further page in flight
    LoadingMore,
    /// Last fetch failed; earlier pages are kept
    Errored {
        /// Error message of the failed fetch
        message: String,
    },
}

impl FetchStatus {
    /// Whether a fetch is in flight
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }

    /// Whether the last fetch failed
    pub fn is_errored(&self) -> bool {
        matches!(self, Self::Errored { .. })
    }
}

/// Why `fetch_next` did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch is still in flight
    InFlight,
    /// The last page carried no cursor
    Exhausted,
}

/// Result of a `fetch_next` call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was fetched and appended
    Fetched {
        /// Records in the appended page
        items: usize,
        /// Whether another page can be fetched
        has_next: bool,
    },
    /// No request was made
    Skipped(SkipReason),
}

impl FetchOutcome {
    /// Whether a page was appended
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }
}

#[derive(Debug, Default)]
struct ClientState {
    pages: Vec<Page>,
    /// Status of the last completed fetch; never `Loading`/`LoadingMore`
    settled: FetchStatus,
}

/// Clears the in-flight flag when the fetch completes or its future is dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client that accumulates pages from a [`PageSource`].
///
/// All methods take `&self`; the in-flight guard rejects a second
/// `fetch_next` while one is pending instead of queueing it. The lock is never
/// held across the request. There is no cancellation API, but dropping a
/// pending `fetch_next` future (a caller timeout, `select!`) releases the
/// guard and leaves the status of the last completed fetch.
#[derive(Debug)]
pub struct PaginationClient<S> {
    source: S,
    state: RwLock<ClientState>,
    in_flight: AtomicBool,
}

impl<S: PageSource> PaginationClient<S> {
    /// Create an idle client
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RwLock::new(ClientState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the next page and append it.
    ///
    /// The first call (or a retry before any page arrived) starts from the
    /// beginning of the collection. Later calls resume from the last page's
    /// cursor. On failure the client moves to `Errored`, keeps its pages, and
    /// returns the error; calling again retries the same boundary.
    pub async fn fetch_next(&self) -> Result<FetchOutcome> {
        let (cursor, first, guard) = {
            let state = self.state.write().await;
            if self.in_flight.load(Ordering::Acquire) {
                debug!("fetch already in flight, skipping");
                return Ok(FetchOutcome::Skipped(SkipReason::InFlight));
            }

            let cursor = match state.pages.last() {
                None => None,
                Some(page) => match &page.next_cursor {
                    Some(cursor) => Some(cursor.clone()),
                    None => return Ok(FetchOutcome::Skipped(SkipReason::Exhausted)),
                },
            };

            // Set under the write lock so two callers cannot both pass the check
            self.in_flight.store(true, Ordering::Release);
            let guard = InFlightGuard {
                flag: &self.in_flight,
            };
            (cursor, state.pages.is_empty(), guard)
        };

        let result = self.source.fetch_page(cursor.as_deref()).await;

        let mut state = self.state.write().await;
        let outcome = match result {
            Ok(page) => {
                let outcome = FetchOutcome::Fetched {
                    items: page.items.len(),
                    has_next: page.has_next(),
                };
                state.pages.push(page);
                state.settled = FetchStatus::Ready;
                debug!(pages = state.pages.len(), first, "page appended");
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, first, "page fetch failed");
                state.settled = FetchStatus::Errored {
                    message: e.to_string(),
                };
                Err(e)
            }
        };
        drop(guard);
        outcome
    }

    /// Keep fetching until the collection is exhausted or `max_pages` pages
    /// are held. Returns the number of pages fetched by this call.
    pub async fn fetch_all(&self, max_pages: Option<usize>) -> Result<usize> {
        let mut fetched = 0;
        loop {
            if let Some(max) = max_pages {
                if self.page_count().await >= max {
                    return Ok(fetched);
                }
            }
            match self.fetch_next().await? {
                FetchOutcome::Fetched { .. } => fetched += 1,
                FetchOutcome::Skipped(_) => return Ok(fetched),
            }
        }
    }

    /// Every record across all pages, first page first
    pub async fn items(&self) -> Vec<Record> {
        self.state
            .read()
            .await
            .pages
            .iter()
            .flat_map(|page| page.items.iter().cloned())
            .collect()
    }

    /// Pages in the order they were fetched
    pub async fn pages(&self) -> Vec<Page> {
        self.state.read().await.pages.clone()
    }

    /// Number of pages held
    pub async fn page_count(&self) -> usize {
        self.state.read().await.pages.len()
    }

    /// Cursor that the next fetch would use
    pub async fn next_cursor(&self) -> Option<String> {
        self.state
            .read()
            .await
            .pages
            .last()
            .and_then(|page| page.next_cursor.clone())
    }

    /// Whether the last page carries a cursor
    pub async fn has_next_page(&self) -> bool {
        self.next_cursor().await.is_some()
    }

    /// Whether a fetch is in flight
    pub async fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Current status
    pub async fn status(&self) -> FetchStatus {
        let state = self.state.read().await;
        if !self.in_flight.load(Ordering::Acquire) {
            state.settled.clone()
        } else if state.pages.is_empty() {
            FetchStatus::Loading
        } else {
            FetchStatus::LoadingMore
        }
    }
}
