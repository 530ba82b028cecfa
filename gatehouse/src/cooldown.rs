//! Per-user, per-command cooldown ledger.

use gatehouse_core::UserId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Timestamp ledger of command cooldowns.
///
/// One expiry instant per (user, command code). Entries are overwritten on
/// each new run and never removed: an expired entry reads as no cooldown, so
/// stale entries are harmless. Last write wins; no invariant depends on
/// anything stronger than individual map operations.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    entries: Mutex<HashMap<UserId, HashMap<String, Instant>>>,
}

impl CooldownTracker {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before `user` may run the command with `code` again.
    /// Zero when no entry exists or the entry has expired.
    pub fn remaining(&self, user: UserId, code: &str) -> Duration {
        self.lock()
            .get(&user)
            .and_then(|per_user| per_user.get(code))
            .map(|expiry| expiry.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    /// Sets or overwrites the expiry to `now + duration`.
    pub fn arm(&self, user: UserId, code: &str, duration: Duration) {
        let expiry = Instant::now() + duration;
        self.lock()
            .entry(user)
            .or_default()
            .insert(code.to_owned(), expiry);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, HashMap<String, Instant>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
