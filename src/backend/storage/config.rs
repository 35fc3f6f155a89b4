// src/backend/storage/config.rs
use crate::error::KeepsakeError;
use crate::models::config::AppConfig;
use crate::storage::memory::{get_config_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

thread_local! {
    /// Stable cell holding the whole runtime configuration.
    static CONFIG: RefCell<StableCell<Cbor<AppConfig>, Memory>> = RefCell::new(
        StableCell::init(get_config_memory(), Cbor(AppConfig::default()))
            .expect("Failed to initialize config stable cell")
    );
}

/// Replaces the configuration. Called from `init`, `post_upgrade` and `update_config`.
pub fn set_config(config: AppConfig) -> Result<(), KeepsakeError> {
    CONFIG.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(config))
            .map(|_| ())
            .map_err(|e| KeepsakeError::StorageWrite(format!("Failed to set config: {:?}", e)))
    })
}

pub fn get_config() -> AppConfig {
    CONFIG.with(|cell| cell.borrow().get().0.clone())
}
