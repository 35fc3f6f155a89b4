// src/backend/models/record.rs
use crate::models::common::{EntityKind, RecordId, TimestampNs};
use candid::CandidType;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Display card shared by search results and the favorites view.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct MemorySummary {
    pub kind: EntityKind,
    pub id: RecordId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub date: String,
}

/// A persisted memory of one kind.
///
/// `is_favorite` is a cached flag; the favorites index is authoritative and
/// repositories recompute the flag every time they list.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// User-submitted payload the record is created from.
    type Draft;

    fn from_draft(id: RecordId, now: TimestampNs, draft: Self::Draft) -> Self;

    fn id(&self) -> &str;

    fn is_favorite(&self) -> bool;

    fn set_favorite(&mut self, favorite: bool);

    /// Fields the cross-content search matches against.
    fn search_fields(&self) -> Vec<&str>;

    fn summary(&self) -> MemorySummary;

    fn matches(&self, needle_lowercase: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}
