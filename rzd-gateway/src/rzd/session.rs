//! Session token ("RID") cache.
//!
//! The service answers a fresh query with a challenge carrying a short-lived
//! token; the same query must then be resent with that token attached. The
//! cache holds at most one token and its expiry instant.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Start at the current real instant.
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub expires_at: Instant,
}

/// Holds the current session token, if any.
///
/// A token is valid while `now < expires_at`. Every operation takes the lock
/// once and releases it before returning.
#[derive(Debug)]
pub struct TokenCache {
    slot: Mutex<Option<SessionToken>>,
    clock: Arc<dyn Clock>,
}

impl TokenCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            clock,
        }
    }

    /// The cached token, or `None` if there is none or it has expired.
    pub fn get(&self) -> Option<String> {
        let slot = self.slot();
        let now = self.clock.now();
        slot.as_ref()
            .filter(|token| now < token.expires_at)
            .map(|token| token.value.clone())
    }

    /// Replace the cached token.
    pub fn set(&self, value: impl Into<String>, ttl: Duration) {
        let mut slot = self.slot();
        let now = self.clock.now();
        *slot = Some(SessionToken {
            value: value.into(),
            // An unrepresentable expiry counts as already expired.
            expires_at: now.checked_add(ttl).unwrap_or(now),
        });
    }

    /// Drop the cached token.
    pub fn expire(&self) {
        *self.slot() = None;
    }

    /// Drop the cached token only if it is still `value`.
    ///
    /// Returns whether a token was dropped. A token issued to another caller
    /// in the meantime is left in place.
    pub fn expire_if(&self, value: &str) -> bool {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|token| token.value == value) {
            *slot = None;
            true
        } else {
            false
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<SessionToken>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
