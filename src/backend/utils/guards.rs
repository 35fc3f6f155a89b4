// src/backend/utils/guards.rs
use crate::error::KeepsakeError;
use crate::services::auth_service;
use crate::state;
use crate::storage::get_config;
use crate::utils::time::get_current_time_ns;
use candid::Principal;
use ic_cdk::api::canister_balance128;

/// Checks if the canister has sufficient cycles for an outcall.
///
/// # Errors
///
/// Returns `KeepsakeError::CycleLow` if the balance is below the configured threshold.
pub fn check_cycles() -> Result<(), KeepsakeError> {
    ensure_cycles(canister_balance128(), get_config().min_cycles_threshold)
}

pub fn ensure_cycles(balance: u128, threshold: u128) -> Result<(), KeepsakeError> {
    if balance < threshold {
        log_warn!("Cycle balance low: {} cycles, threshold: {}", balance, threshold);
        Err(KeepsakeError::CycleLow)
    } else {
        Ok(())
    }
}

/// Checks if `caller` is the configured admin principal.
///
/// # Errors
///
/// Returns `KeepsakeError::NotAuthorized` otherwise.
pub fn check_admin(caller: Principal, admin: Principal) -> Result<(), KeepsakeError> {
    if caller == admin {
        Ok(())
    } else {
        Err(KeepsakeError::NotAuthorized("Caller is not the admin".to_string()))
    }
}

/// Guard for every memory endpoint: the caller needs an open session unless
/// the access gate is disabled.
pub fn session_guard() -> Result<(), String> {
    let caller = ic_cdk::caller();
    let config = get_config();
    let keepsake = state::keepsake();
    if auth_service::is_admitted(&keepsake.sessions, &config, caller, get_current_time_ns()) {
        Ok(())
    } else {
        Err(KeepsakeError::NotAuthorized("Log in first".to_string()).to_string())
    }
}

pub fn admin_guard() -> Result<(), String> {
    check_admin(ic_cdk::caller(), get_config().admin).map_err(|e| e.to_string())
}
