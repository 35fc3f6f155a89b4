// src/backend/services/scheduler.rs
// Periodic housekeeping, driven by an ic-cdk timer registered at init/upgrade.

use crate::storage::SessionStore;
use crate::utils::rate_limit::prune_idle_buckets;
use ic_stable_structures::Memory;
use std::time::Duration;

pub const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Purges expired sessions and forgets idle rate-limit buckets. Returns how many
/// sessions were dropped.
pub fn perform_daily_maintenance<M: Memory>(sessions: &SessionStore<M>, now: u64) -> usize {
    log_scheduler!("Starting daily maintenance at {}", now);
    let purged = sessions.purge_expired(now);
    crate::metrics::sessions_purged(purged as u64);
    let pruned = prune_idle_buckets(now);
    log_scheduler!(
        "Daily maintenance completed, {} expired session(s) purged, {} idle rate-limit bucket(s) dropped.",
        purged,
        pruned
    );
    purged
}
