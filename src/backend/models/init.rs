// src/backend/models/init.rs
use candid::{CandidType, Principal};
use serde::Deserialize;

/// Arguments for `init` and (optionally) `post_upgrade`.
#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct InitArgs {
    pub admin_principal: Principal,
    /// SHA-256 hex digest of the access passphrase. `None` leaves the gate open.
    pub passphrase_sha256: Option<String>,
    pub session_ttl_secs: Option<u64>,
    pub youtube_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub max_video_results: Option<u32>,
    pub min_cycles_threshold: Option<u128>,
    pub collection_quota_bytes: Option<u64>,
}
