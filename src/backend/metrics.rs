// src/backend/metrics.rs
use crate::storage::update_metrics;
use candid::{CandidType, Deserialize};
use serde::Serialize;

/// Canister-wide counters, kept in stable memory.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct KeepsakeMetrics {
    pub records_created: u64,
    pub records_deleted: u64,
    pub favorite_toggles: u64,
    pub proxy_calls: u64,
    pub proxy_failures: u64,
    pub storage_write_failures: u64,
    pub sessions_opened: u64,
    pub sessions_purged: u64,
}

/// Snapshot returned by `get_metrics`, including live storage figures.
#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct MetricsReport {
    pub counters: KeepsakeMetrics,
    pub collection_bytes: Vec<(String, u64)>,
    pub blob_bytes: u64,
    pub open_sessions: u64,
    pub cycle_balance: u128,
}

// Metrics are best effort; a failed counter update is logged and otherwise ignored.
fn bump<F: FnOnce(&mut KeepsakeMetrics)>(f: F) {
    if let Err(e) = update_metrics(f) {
        log_warn!("{}", e);
    }
}

pub fn record_created(count: u64) {
    bump(|m| m.records_created = m.records_created.saturating_add(count));
}

pub fn record_deleted() {
    bump(|m| m.records_deleted = m.records_deleted.saturating_add(1));
}

pub fn favorite_toggled() {
    bump(|m| m.favorite_toggles = m.favorite_toggles.saturating_add(1));
}

pub fn proxy_call(succeeded: bool) {
    bump(|m| {
        m.proxy_calls = m.proxy_calls.saturating_add(1);
        if !succeeded {
            m.proxy_failures = m.proxy_failures.saturating_add(1);
        }
    });
}

pub fn storage_write_failed() {
    bump(|m| m.storage_write_failures = m.storage_write_failures.saturating_add(1));
}

pub fn session_opened() {
    bump(|m| m.sessions_opened = m.sessions_opened.saturating_add(1));
}

pub fn sessions_purged(count: u64) {
    bump(|m| m.sessions_purged = m.sessions_purged.saturating_add(count));
}
