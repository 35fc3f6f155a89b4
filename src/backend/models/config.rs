// src/backend/models/config.rs
use crate::models::init::InitArgs;
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60; // 30 days
pub const DEFAULT_MAX_VIDEO_RESULTS: u32 = 10;
pub const MAX_VIDEO_RESULTS_LIMIT: u32 = 50;
pub const DEFAULT_MIN_CYCLES_THRESHOLD: u128 = 10_000_000_000; // 10B cycles
/// A whole collection is returned by one list call, so it has to fit a reply.
pub const DEFAULT_COLLECTION_QUOTA_BYTES: u64 = 1_536 * 1024;
pub const MAX_COLLECTION_QUOTA_BYTES: u64 = 1_800_000;

/// Runtime configuration persisted in stable memory.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub admin: Principal,
    pub passphrase_sha256: Option<String>,
    pub session_ttl_secs: u64,
    pub youtube_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub max_video_results: u32,
    pub min_cycles_threshold: u128,
    pub collection_quota_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin: Principal::management_canister(),
            passphrase_sha256: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            youtube_api_key: None,
            google_api_key: None,
            google_search_engine_id: None,
            max_video_results: DEFAULT_MAX_VIDEO_RESULTS,
            min_cycles_threshold: DEFAULT_MIN_CYCLES_THRESHOLD,
            collection_quota_bytes: DEFAULT_COLLECTION_QUOTA_BYTES,
        }
    }
}

impl From<InitArgs> for AppConfig {
    fn from(args: InitArgs) -> Self {
        let defaults = AppConfig::default();
        Self {
            admin: args.admin_principal,
            passphrase_sha256: non_blank(args.passphrase_sha256),
            session_ttl_secs: args.session_ttl_secs.unwrap_or(defaults.session_ttl_secs),
            youtube_api_key: non_blank(args.youtube_api_key),
            google_api_key: non_blank(args.google_api_key),
            google_search_engine_id: non_blank(args.google_search_engine_id),
            max_video_results: args
                .max_video_results
                .unwrap_or(defaults.max_video_results)
                .clamp(1, MAX_VIDEO_RESULTS_LIMIT),
            min_cycles_threshold: args.min_cycles_threshold.unwrap_or(defaults.min_cycles_threshold),
            collection_quota_bytes: args
                .collection_quota_bytes
                .unwrap_or(defaults.collection_quota_bytes)
                .clamp(1, MAX_COLLECTION_QUOTA_BYTES),
        }
    }
}

/// What the admin sees: which credentials are present, never their values.
#[derive(CandidType, Deserialize, Clone, Debug, PartialEq)]
pub struct ConfigSummary {
    pub admin: Principal,
    pub access_gate_enabled: bool,
    pub session_ttl_secs: u64,
    pub video_search_configured: bool,
    pub web_search_configured: bool,
    pub max_video_results: u32,
    pub collection_quota_bytes: u64,
}

impl From<&AppConfig> for ConfigSummary {
    fn from(config: &AppConfig) -> Self {
        Self {
            admin: config.admin,
            access_gate_enabled: config.passphrase_sha256.is_some(),
            session_ttl_secs: config.session_ttl_secs,
            video_search_configured: config.youtube_api_key.is_some(),
            web_search_configured: config.google_api_key.is_some()
                && config.google_search_engine_id.is_some(),
            max_video_results: config.max_video_results,
            collection_quota_bytes: config.collection_quota_bytes,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> InitArgs {
        InitArgs {
            admin_principal: Principal::anonymous(),
            passphrase_sha256: Some("  ".into()),
            session_ttl_secs: None,
            youtube_api_key: Some("yt-key".into()),
            google_api_key: Some("g-key".into()),
            google_search_engine_id: None,
            max_video_results: Some(500),
            min_cycles_threshold: None,
            collection_quota_bytes: None,
        }
    }

    #[test]
    fn init_args_fill_defaults_and_drop_blanks() {
        let config = AppConfig::from(args());
        assert_eq!(config.passphrase_sha256, None);
        assert_eq!(config.session_ttl_secs, DEFAULT_SESSION_TTL_SECS);
        assert_eq!(config.max_video_results, MAX_VIDEO_RESULTS_LIMIT);
        assert_eq!(config.collection_quota_bytes, DEFAULT_COLLECTION_QUOTA_BYTES);
    }

    #[test]
    fn collection_quota_is_capped() {
        let config = AppConfig::from(InitArgs {
            collection_quota_bytes: Some(5 * 1024 * 1024),
            ..args()
        });
        assert_eq!(config.collection_quota_bytes, MAX_COLLECTION_QUOTA_BYTES);
    }

    #[test]
    fn summary_hides_credentials() {
        let summary = ConfigSummary::from(&AppConfig::from(args()));
        assert!(summary.video_search_configured);
        assert!(!summary.web_search_configured);
        assert!(!summary.access_gate_enabled);
    }
}
