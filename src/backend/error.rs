// src/backend/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum KeepsakeError {
    /// Stored collection text could not be decoded. Callers of `load` never see this;
    /// it only surfaces from the raw decoding helpers.
    #[error("Stored data could not be parsed: {0}")]
    StorageParse(String),

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    /// A required external credential is missing from the configuration.
    #[error("Search is not configured: {0}")]
    Configuration(String),

    /// The third-party API answered with a failure status or no results.
    #[error("No results, try again later: {0}")]
    Upstream(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Canister cycle balance too low for operation")]
    CycleLow,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal canister error: {0}")]
    Internal(String),
}

impl KeepsakeError {
    /// Whether the condition is worth showing a "try again" hint for.
    /// Nothing here is ever retried automatically.
    pub fn is_user_retryable(&self) -> bool {
        matches!(
            self,
            KeepsakeError::Upstream(_) | KeepsakeError::RateLimitExceeded(_)
        )
    }
}
