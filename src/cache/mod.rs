//! Cached queries keyed by record kind.
//!
//! Each kind has a generation counter in [`QueryClient`]. A [`Query`] remembers the generation
//! its data was fetched under; invalidating a kind bumps the counter, so the next read refetches.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::RecordKind;

/// Shared invalidation state for all cached queries.
#[derive(Debug, Default)]
pub struct QueryClient {
    generations: [AtomicU64; RecordKind::COUNT],
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self, kind: RecordKind) -> u64 {
        self.generations[kind.index()].load(Ordering::SeqCst)
    }

    /// Mark every cached value of `kind` stale.
    pub fn invalidate(&self, kind: RecordKind) {
        let next = self.generations[kind.index()].fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(kind = %kind, generation = next, "Invalidated query");
    }
}

/// Lifecycle of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryStatus {
    /// Never fetched, or invalidated since the last fetch
    Stale,
    Loading,
    Fresh,
    Error,
}

/// What a consumer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryView<T> {
    pub data: T,
    pub is_loading: bool,
    pub is_error: bool,
}

struct QueryState<T> {
    data: Option<T>,
    generation: u64,
    status: QueryStatus,
}

/// One cached value for one record kind.
pub struct Query<T> {
    kind: RecordKind,
    client: Arc<QueryClient>,
    state: RwLock<QueryState<T>>,
}

impl<T> Query<T>
where
    T: Clone + Default + Send + Sync,
{
    pub fn new(kind: RecordKind, client: Arc<QueryClient>) -> Self {
        Self {
            kind,
            client,
            state: RwLock::new(QueryState {
                data: None,
                generation: 0,
                status: QueryStatus::Stale,
            }),
        }
    }

    #[cfg(test)]
    pub async fn status(&self) -> QueryStatus {
        let state = self.state.read().await;
        self.effective_status(&state)
    }

    /// Current view without triggering a fetch.
    #[cfg(test)]
    pub async fn peek(&self) -> QueryView<T> {
        let state = self.state.read().await;
        self.view(&state)
    }

    /// Return the cached value if fresh, otherwise run `fetch` and cache its result.
    ///
    /// A failed fetch keeps the previous data and flags the error. Invalidations that land
    /// while `fetch` runs leave the result stale, so the next read fetches again.
    pub async fn read<F, Fut>(&self, fetch: F) -> QueryView<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let generation = self.client.generation(self.kind);
        {
            let mut state = self.state.write().await;
            if state.status == QueryStatus::Fresh && state.generation == generation {
                return self.view(&state);
            }
            state.status = QueryStatus::Loading;
        }

        let result = fetch().await;

        let mut state = self.state.write().await;
        state.generation = generation;
        match result {
            Ok(data) => {
                state.data = Some(data);
                state.status = QueryStatus::Fresh;
            }
            Err(e) => {
                tracing::error!(kind = %self.kind, error = %e, "Query fetch failed");
                state.status = QueryStatus::Error;
            }
        }
        self.view(&state)
    }

    fn effective_status(&self, state: &QueryState<T>) -> QueryStatus {
        if state.status == QueryStatus::Fresh
            && state.generation != self.client.generation(self.kind)
        {
            QueryStatus::Stale
        } else {
            state.status
        }
    }

    fn view(&self, state: &QueryState<T>) -> QueryView<T> {
        let status = self.effective_status(state);
        QueryView {
            data: state.data.clone().unwrap_or_default(),
            is_loading: status == QueryStatus::Loading,
            is_error: status == QueryStatus::Error,
        }
    }
}
