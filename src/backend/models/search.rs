// src/backend/models/search.rs
use crate::models::common::EntityKind;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// A cross-content search request. An empty `kinds` list searches every kind.
#[derive(CandidType, Deserialize, Clone, Debug, Default)]
pub struct SearchQuery {
    pub text: String,
    pub kinds: Vec<EntityKind>,
}

impl SearchQuery {
    pub fn is_enabled(&self, kind: EntityKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}

/// Normalised hit from the third-party video search.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct VideoSearchHit {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub channel: String,
}
