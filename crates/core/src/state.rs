//! Store plumbing shared by every domain store: the loading/error status
//! slot, request sequence tokens and poison-tolerant lock access.

use log::{debug, error, warn};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{Error, Result};

/// Snapshot of a store's loading flag and error slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Loading counter plus error slot.
///
/// `is_loading` stays true while at least one action holds a
/// [`LoadingGuard`], so nested actions (a mutation that reloads) do not clear
/// the flag early.
#[derive(Debug, Default)]
pub(crate) struct StatusCell {
    in_flight: AtomicUsize,
    error: RwLock<Option<String>>,
}

/// Decrements the in-flight counter when dropped, including on early return.
pub(crate) struct LoadingGuard<'a> {
    cell: &'a StatusCell,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.cell.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StatusCell {
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { cell: self }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn error(&self) -> Option<String> {
        read_lock(&self.error).clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        *write_lock(&self.error) = Some(message.into());
    }

    pub fn clear_error(&self) {
        *write_lock(&self.error) = None;
    }

    pub fn snapshot(&self) -> StoreStatus {
        StoreStatus {
            is_loading: self.is_loading(),
            error: self.error(),
        }
    }

    /// Records a primary-action failure and hands the error back for `?`.
    pub fn fail(&self, err: Error, fallback: &str) -> Error {
        let message = err.user_message(fallback);
        error!("{}: {}", fallback, err);
        self.set_error(message);
        err
    }
}

/// Resolves an auxiliary read: failures are logged and replaced by `default`.
pub(crate) fn or_default<T>(result: Result<T>, default: T, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{}: {}", context, e);
            default
        }
    }
}

/// Monotonic token source. Only the most recently issued token is current.
#[derive(Debug, Default)]
pub(crate) struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, token: u64) -> bool {
        let current = self.latest.load(Ordering::SeqCst);
        if current != token {
            debug!("Discarding stale response (token {} < {})", token, current);
            return false;
        }
        true
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_flag_tracks_nested_guards() {
        let cell = StatusCell::default();
        assert!(!cell.is_loading());
        {
            let _outer = cell.begin();
            {
                let _inner = cell.begin();
                assert!(cell.is_loading());
            }
            assert!(cell.is_loading());
        }
        assert!(!cell.is_loading());
    }

    #[test]
    fn test_fail_records_user_message() {
        let cell = StatusCell::default();
        let err = cell.fail(Error::api(400, Some("bad".into())), "Failed to load data");
        assert_eq!(err.status(), Some(400));
        assert_eq!(cell.error().as_deref(), Some("bad"));

        cell.fail(Error::Network("refused".into()), "Failed to load data");
        assert_eq!(cell.snapshot().error.as_deref(), Some("Failed to load data"));
    }

    #[test]
    fn test_only_latest_token_is_current() {
        let seq = RequestSequence::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn test_or_default_swallows_errors() {
        let value: Vec<String> = or_default(Err(Error::NotFound("x".into())), vec![], "lookup");
        assert!(value.is_empty());
        assert_eq!(or_default(Ok(3), 0, "lookup"), 3);
    }
}
