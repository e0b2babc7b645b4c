use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::types::SportPredictions;

/// Anything a page can render as a list. Drives the empty/populated split.
pub trait Payload {
    fn is_empty(&self) -> bool;
}

impl<T> Payload for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl Payload for SportPredictions {
    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FetchState
// ---------------------------------------------------------------------------

/// Page-local `(data, is_loading, error, last_updated)` tuple.
///
/// At rest `is_loading` is false. `last_updated` only moves on success. A
/// failed cycle drops the previous payload so the page never shows stale
/// data next to an error.
#[derive(Debug, Clone, Serialize)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
            last_updated: None,
        }
    }
}

/// What a page should render for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageView {
    /// First load in flight, nothing to show yet.
    Loading,
    /// Last cycle failed and there is nothing to show; offer a retry.
    Error,
    /// Settled successfully with zero entries.
    Empty,
    /// Data present, a refresh is in flight.
    Refreshing,
    Populated,
}

impl std::fmt::Display for PageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PageView::Loading => "loading",
            PageView::Error => "error",
            PageView::Empty => "empty",
            PageView::Refreshing => "refreshing",
            PageView::Populated => "populated",
        };
        write!(f, "{s}")
    }
}

impl<T: Payload> FetchState<T> {
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, data: T, at: DateTime<Utc>) {
        self.data = Some(data);
        self.is_loading = false;
        self.error = None;
        self.last_updated = Some(at);
    }

    pub fn fail(&mut self, message: String) {
        self.data = None;
        self.is_loading = false;
        self.error = Some(message);
    }

    pub fn settle(&mut self, result: Result<T>, at: DateTime<Utc>) {
        match result {
            Ok(data) => self.succeed(data, at),
            Err(e) => self.fail(e.to_string()),
        }
    }

    pub fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty())
    }

    pub fn view(&self) -> PageView {
        match (self.is_loading, self.has_data(), self.error.is_some()) {
            (true, true, _) => PageView::Refreshing,
            (true, false, _) => PageView::Loading,
            (false, true, _) => PageView::Populated,
            (false, false, true) => PageView::Error,
            (false, false, false) => PageView::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// Slot — shared, lock-guarded FetchState
// ---------------------------------------------------------------------------

/// One page's state, shared between its poller and the API handlers.
/// A poisoned lock is recovered rather than propagated: the state is plain
/// data and every writer leaves it consistent.
#[derive(Debug, Default)]
pub struct Slot<T> {
    inner: RwLock<FetchState<T>>,
}

impl<T: Payload + Clone> Slot<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(FetchState::default()),
        }
    }

    pub fn begin(&self) {
        self.inner.write().unwrap_or_else(|e| e.into_inner()).begin();
    }

    /// Settle the current cycle. Returns true on success.
    pub fn settle(&self, result: Result<T>) -> bool {
        let ok = result.is_ok();
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .settle(result, Utc::now());
        ok
    }

    /// Install data obtained without a fetch (e.g. from the cache) with its
    /// original timestamp.
    pub fn restore(&self, data: T, at: DateTime<Utc>) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .succeed(data, at);
    }

    pub fn snapshot(&self) -> FetchState<T> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn view(&self) -> PageView {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).view()
    }

    pub fn with<R>(&self, f: impl FnOnce(&FetchState<T>) -> R) -> R {
        f(&self.inner.read().unwrap_or_else(|e| e.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn first_load_then_success() {
        let mut s: FetchState<Vec<u32>> = FetchState::default();
        assert_eq!(s.view(), PageView::Empty);

        s.begin();
        assert_eq!(s.view(), PageView::Loading);

        let at = Utc::now();
        s.settle(Ok(vec![1, 2]), at);
        assert!(!s.is_loading);
        assert_eq!(s.last_updated, Some(at));
        assert_eq!(s.view(), PageView::Populated);

        s.begin();
        assert_eq!(s.view(), PageView::Refreshing);
    }

    #[test]
    fn failure_clears_data_and_keeps_timestamp() {
        let mut s: FetchState<Vec<u32>> = FetchState::default();
        let at = Utc::now();
        s.settle(Ok(vec![1]), at);

        s.begin();
        s.settle(Err(AppError::Parse("eof".into())), Utc::now());
        assert!(!s.is_loading);
        assert!(s.data.is_none());
        assert_eq!(s.error.as_deref(), Some("Invalid response: eof"));
        assert_eq!(s.last_updated, Some(at));
        assert_eq!(s.view(), PageView::Error);

        s.begin();
        assert!(s.error.is_none());
        assert_eq!(s.view(), PageView::Loading);
    }

    #[test]
    fn empty_success_renders_empty() {
        let mut s: FetchState<Vec<u32>> = FetchState::default();
        s.begin();
        s.settle(Ok(Vec::new()), Utc::now());
        assert_eq!(s.view(), PageView::Empty);
        assert!(s.last_updated.is_some());
    }

    #[test]
    fn slot_settle_reports_outcome() {
        let slot: Slot<Vec<u32>> = Slot::new();
        slot.begin();
        assert!(slot.with(|s| s.is_loading));
        assert!(!slot.settle(Err(AppError::Validation("nope".into()))));
        assert_eq!(slot.snapshot().error.as_deref(), Some("nope"));
        assert!(slot.settle(Ok(vec![7])));
        assert_eq!(slot.view(), PageView::Populated);
    }
}
