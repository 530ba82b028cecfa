//! Active-run registry: per-command admission bookkeeping.
//!
//! This is the one place in the dispatcher where correctness depends on
//! mutual exclusion: the membership check and the insertion happen inside a
//! single critical section, so two overlapping events for the same user can
//! never both observe "not running" before either inserts. Release is the
//! [`RunGuard`]'s `Drop`, which makes the acquire/release pairing structural
//! rather than a discipline handler code has to uphold.

use gatehouse_core::{AdmissionError, ScopeId, UserId};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunEntry {
    user: UserId,
    scope: Option<ScopeId>,
}

/// Registry of currently-executing (user, scope) pairs, bucketed per command
/// code.
///
/// The lock is held only for map operations, never across an await.
#[derive(Debug, Default)]
pub struct ActiveRunRegistry {
    buckets: Mutex<HashMap<String, Vec<RunEntry>>>,
}

impl ActiveRunRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to register a run of the command with `code`.
    ///
    /// `exclusive` refuses the acquisition when the user already holds any
    /// run of this command, whatever its scope. `ceiling` caps simultaneous
    /// runs within the same scope bucket; an omitted scope is its own single
    /// global bucket. The exclusivity check is read first, then capacity,
    /// and the insertion shares their critical section.
    ///
    /// The returned guard releases the slot when dropped.
    pub fn try_acquire(
        &self,
        code: &str,
        user: UserId,
        scope: Option<ScopeId>,
        ceiling: Option<NonZeroU32>,
        exclusive: bool,
    ) -> Result<RunGuard<'_>, AdmissionError> {
        let mut buckets = self.lock();
        let bucket = buckets.entry(code.to_owned()).or_default();

        if exclusive && bucket.iter().any(|entry| entry.user == user) {
            return Err(AdmissionError::AlreadyRunning);
        }
        if let Some(limit) = ceiling {
            let occupancy = bucket.iter().filter(|entry| entry.scope == scope).count();
            if occupancy >= limit.get() as usize {
                return Err(AdmissionError::ScopeAtCapacity { limit: limit.get() });
            }
        }

        let entry = RunEntry { user, scope };
        bucket.push(entry);
        Ok(RunGuard {
            registry: self,
            code: code.to_owned(),
            entry,
        })
    }

    /// Removes one (user, scope) entry from the command's bucket.
    ///
    /// No-op when absent: failure paths may race with normal completion, so
    /// a double release must never raise.
    pub fn release(&self, code: &str, user: UserId, scope: Option<ScopeId>) {
        self.release_entry(code, RunEntry { user, scope });
    }

    /// Number of runs of `code` currently held within the given scope bucket.
    pub fn occupancy(&self, code: &str, scope: Option<ScopeId>) -> usize {
        self.lock()
            .get(code)
            .map(|bucket| bucket.iter().filter(|entry| entry.scope == scope).count())
            .unwrap_or(0)
    }

    /// Whether the user holds any run of `code`, in any scope.
    pub fn is_user_active(&self, code: &str, user: UserId) -> bool {
        self.lock()
            .get(code)
            .is_some_and(|bucket| bucket.iter().any(|entry| entry.user == user))
    }

    fn release_entry(&self, code: &str, entry: RunEntry) {
        let mut buckets = self.lock();
        if let Some(bucket) = buckets.get_mut(code) {
            if let Some(position) = bucket.iter().position(|held| *held == entry) {
                bucket.swap_remove(position);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<RunEntry>>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof of admission for one run. Dropping it releases the slot, whatever
/// the handler's outcome — success, error or panic.
#[derive(Debug)]
pub struct RunGuard<'a> {
    registry: &'a ActiveRunRegistry,
    code: String,
    entry: RunEntry,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.registry.release_entry(&self.code, self.entry);
    }
}

#[cfg(test)]
mod tests {
    use super::ActiveRunRegistry;
    use gatehouse_core::{AdmissionError, ScopeId, UserId};
    use std::num::NonZeroU32;

    const U1: UserId = UserId(1);
    const U2: UserId = UserId(2);
    const U3: UserId = UserId(3);
    const SCOPE: Option<ScopeId> = Some(ScopeId(10));

    fn ceiling(n: u32) -> Option<NonZeroU32> {
        NonZeroU32::new(n)
    }

    #[test]
    fn exclusive_refuses_second_run_for_same_user() {
        let registry = ActiveRunRegistry::new();
        let _guard = registry.try_acquire("cmd", U1, SCOPE, None, true).unwrap();
        let second = registry.try_acquire("cmd", U1, SCOPE, None, true);
        assert_eq!(second.unwrap_err(), AdmissionError::AlreadyRunning);
    }

    #[test]
    fn exclusivity_spans_scopes() {
        let registry = ActiveRunRegistry::new();
        let _guard = registry.try_acquire("cmd", U1, SCOPE, None, true).unwrap();
        let elsewhere = registry.try_acquire("cmd", U1, Some(ScopeId(11)), None, true);
        assert_eq!(elsewhere.unwrap_err(), AdmissionError::AlreadyRunning);
    }

    #[test]
    fn exclusivity_outranks_capacity_for_the_same_user() {
        let registry = ActiveRunRegistry::new();
        let _guard = registry.try_acquire("cmd", U1, SCOPE, ceiling(1), true).unwrap();
        // Both refusals apply; the caller-specific one wins.
        let second = registry.try_acquire("cmd", U1, SCOPE, ceiling(1), true);
        assert_eq!(second.unwrap_err(), AdmissionError::AlreadyRunning);
    }

    #[test]
    fn ceiling_applies_per_scope_bucket() {
        let registry = ActiveRunRegistry::new();
        let _a = registry.try_acquire("cmd", U1, SCOPE, ceiling(2), true).unwrap();
        let _b = registry.try_acquire("cmd", U2, SCOPE, ceiling(2), true).unwrap();
        let third = registry.try_acquire("cmd", U3, SCOPE, ceiling(2), true);
        assert_eq!(
            third.unwrap_err(),
            AdmissionError::ScopeAtCapacity { limit: 2 }
        );
        // A different scope bucket is unaffected.
        let other = registry.try_acquire("cmd", U3, Some(ScopeId(11)), ceiling(2), true);
        assert!(other.is_ok());
    }

    #[test]
    fn dropping_the_guard_frees_the_slot() {
        let registry = ActiveRunRegistry::new();
        let guard = registry.try_acquire("cmd", U1, SCOPE, ceiling(1), true).unwrap();
        assert_eq!(registry.occupancy("cmd", SCOPE), 1);
        drop(guard);
        assert_eq!(registry.occupancy("cmd", SCOPE), 0);
        assert!(registry.try_acquire("cmd", U1, SCOPE, ceiling(1), true).is_ok());
    }

    #[test]
    fn double_release_is_a_noop() {
        let registry = ActiveRunRegistry::new();
        let guard = registry.try_acquire("cmd", U1, SCOPE, None, true).unwrap();
        registry.release("cmd", U1, SCOPE);
        assert_eq!(registry.occupancy("cmd", SCOPE), 0);
        // The guard's own drop finds nothing to remove and must not panic.
        drop(guard);
        registry.release("cmd", U1, SCOPE);
        assert_eq!(registry.occupancy("cmd", SCOPE), 0);
    }

    #[test]
    fn non_exclusive_allows_repeat_runs_by_one_user() {
        let registry = ActiveRunRegistry::new();
        let _a = registry.try_acquire("cmd", U1, SCOPE, None, false).unwrap();
        let _b = registry.try_acquire("cmd", U1, SCOPE, None, false).unwrap();
        assert_eq!(registry.occupancy("cmd", SCOPE), 2);
        assert!(registry.is_user_active("cmd", U1));
    }

    #[test]
    fn global_bucket_when_scope_is_omitted() {
        let registry = ActiveRunRegistry::new();
        let _a = registry.try_acquire("cmd", U1, None, ceiling(1), true).unwrap();
        let second = registry.try_acquire("cmd", U2, None, ceiling(1), true);
        assert_eq!(
            second.unwrap_err(),
            AdmissionError::ScopeAtCapacity { limit: 1 }
        );
    }
}
