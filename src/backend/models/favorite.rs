// src/backend/models/favorite.rs
use crate::models::common::{deserialize_record_id, EntityKind, RecordId, TimestampNs};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Composite key of a favorites entry.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FavoriteKey {
    pub kind: EntityKind,
    pub id: RecordId,
}

impl FavoriteKey {
    pub fn new(kind: EntityKind, id: impl Into<RecordId>) -> Self {
        FavoriteKey { kind, id: id.into() }
    }
}

/// One persisted favorites entry. Only the reference is stored; display fields
/// are looked up in the source collection when favorites are listed.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: RecordId,
    #[serde(default)]
    pub favorited_at_ns: TimestampNs,
}

impl FavoriteEntry {
    pub fn key(&self) -> FavoriteKey {
        FavoriteKey::new(self.kind, self.id.clone())
    }
}
