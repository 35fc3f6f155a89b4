// src/backend/services/auth_service.rs
// Soft access gate. A shared passphrase unlocks the canister for the calling
// principal for a while. Convenience for a private, non-adversarial setup; it is
// not an access-control boundary.

use crate::error::KeepsakeError;
use crate::models::common::TimestampNs;
use crate::models::config::AppConfig;
use crate::storage::SessionStore;
use crate::utils::crypto::passphrase_matches;
use crate::utils::time::NANOS_PER_SEC;
use candid::{CandidType, Principal};
use ic_stable_structures::Memory;
use serde::Deserialize;

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionInfo {
    pub gate_enabled: bool,
    pub authenticated: bool,
    pub expires_at: Option<TimestampNs>,
}

pub fn login<M: Memory>(
    sessions: &SessionStore<M>,
    config: &AppConfig,
    caller: Principal,
    passphrase: &str,
    now: TimestampNs,
) -> Result<SessionInfo, KeepsakeError> {
    let Some(expected) = config.passphrase_sha256.as_deref() else {
        return Ok(status(sessions, config, caller, now));
    };
    if caller == Principal::anonymous() {
        return Err(KeepsakeError::NotAuthorized(
            "Anonymous callers cannot open a session".to_string(),
        ));
    }
    if !passphrase_matches(passphrase, expected) {
        log_warn!("Rejected passphrase from {}", caller);
        return Err(KeepsakeError::NotAuthorized("Wrong passphrase".to_string()));
    }

    let ttl_ns = config.session_ttl_secs.saturating_mul(NANOS_PER_SEC);
    let expires_at = now.saturating_add(ttl_ns);
    sessions.open(caller, expires_at);
    crate::metrics::session_opened();
    log_info!("Session opened for {} until {}", caller, expires_at);
    Ok(SessionInfo { gate_enabled: true, authenticated: true, expires_at: Some(expires_at) })
}

pub fn logout<M: Memory>(sessions: &SessionStore<M>, caller: Principal) -> bool {
    sessions.close(caller)
}

pub fn status<M: Memory>(
    sessions: &SessionStore<M>,
    config: &AppConfig,
    caller: Principal,
    now: TimestampNs,
) -> SessionInfo {
    if config.passphrase_sha256.is_none() {
        return SessionInfo { gate_enabled: false, authenticated: true, expires_at: None };
    }
    let expires_at = sessions.expiry(caller, now);
    SessionInfo { gate_enabled: true, authenticated: expires_at.is_some(), expires_at }
}

/// Whether `caller` may use the memory endpoints right now.
pub fn is_admitted<M: Memory>(
    sessions: &SessionStore<M>,
    config: &AppConfig,
    caller: Principal,
    now: TimestampNs,
) -> bool {
    caller == config.admin || status(sessions, config, caller, now).authenticated
}
