// src/backend/utils/rate_limit.rs
use crate::error::KeepsakeError;
use crate::utils::time::{get_current_time_ns, NANOS_PER_SEC};
use candid::Principal;
use std::cell::RefCell;
use std::collections::HashMap;

// --- Configuration ---
const RATE_LIMIT_CAPACITY: u32 = 10; // Burst capacity per principal
const RATE_LIMIT_REFILL_RATE_PER_SEC: f64 = 0.2; // One outcall every five seconds sustained

struct TokenBucket {
    tokens: f64,
    last_refill_time_ns: u64,
}

impl TokenBucket {
    fn new(now_ns: u64) -> Self {
        TokenBucket { tokens: RATE_LIMIT_CAPACITY as f64, last_refill_time_ns: now_ns }
    }

    fn refill(&mut self, now_ns: u64) {
        let elapsed_secs =
            now_ns.saturating_sub(self.last_refill_time_ns) as f64 / NANOS_PER_SEC as f64;
        let tokens_to_add = elapsed_secs * RATE_LIMIT_REFILL_RATE_PER_SEC;

        self.tokens = (self.tokens + tokens_to_add).min(RATE_LIMIT_CAPACITY as f64);
        self.last_refill_time_ns = now_ns;
    }

    fn is_full(&self, now_ns: u64) -> bool {
        let elapsed_secs =
            now_ns.saturating_sub(self.last_refill_time_ns) as f64 / NANOS_PER_SEC as f64;
        self.tokens + elapsed_secs * RATE_LIMIT_REFILL_RATE_PER_SEC >= RATE_LIMIT_CAPACITY as f64
    }

    fn take(&mut self, now_ns: u64) -> bool {
        self.refill(now_ns);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-principal token buckets. Held on the heap, so limits reset on upgrade.
#[derive(Default)]
pub struct RateLimiter {
    buckets: HashMap<Principal, TokenBucket>,
}

impl RateLimiter {
    pub fn check(&mut self, caller: Principal, now_ns: u64) -> Result<(), KeepsakeError> {
        let bucket = self
            .buckets
            .entry(caller)
            .or_insert_with(|| TokenBucket::new(now_ns));
        if bucket.take(now_ns) {
            Ok(())
        } else {
            Err(KeepsakeError::RateLimitExceeded(format!(
                "Too many searches from {}. Please try again later.",
                caller
            )))
        }
    }

    /// Drops buckets that have refilled to capacity. A dropped caller starts
    /// over with a full bucket, so limits are unchanged. Returns how many went.
    pub fn prune_idle(&mut self, now_ns: u64) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_full(now_ns));
        before - self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

thread_local! {
    static SEARCH_LIMITER: RefCell<RateLimiter> = RefCell::new(RateLimiter::default());
}

/// Guard for the endpoints that spend cycles on outcalls.
pub fn rate_guard() -> Result<(), String> {
    let caller = ic_cdk::caller();
    SEARCH_LIMITER.with(|limiter| {
        limiter
            .borrow_mut()
            .check(caller, get_current_time_ns())
            .map_err(|e| e.to_string())
    })
}

/// Forgets callers whose search bucket is full again.
pub fn prune_idle_buckets(now_ns: u64) -> usize {
    SEARCH_LIMITER.with(|limiter| limiter.borrow_mut().prune_idle(now_ns))
}

#[cfg(test)]
pub(crate) fn with_search_limiter<T>(f: impl FnOnce(&mut RateLimiter) -> T) -> T {
    SEARCH_LIMITER.with(|limiter| f(&mut limiter.borrow_mut()))
}
