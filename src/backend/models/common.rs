// src/backend/models/common.rs
use candid::CandidType;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical string form of a record id.
pub type RecordId = String;
pub type TimestampNs = u64; // Nanoseconds since epoch

/// The four kinds of memories kept by the canister.
#[derive(
    CandidType, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Photo,
    Video,
    Diary,
    Letter,
}

impl EntityKind {
    /// Search and listing order across kinds.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Photo,
        EntityKind::Video,
        EntityKind::Diary,
        EntityKind::Letter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Photo => "photo",
            EntityKind::Video => "video",
            EntityKind::Diary => "diary",
            EntityKind::Letter => "letter",
        }
    }

    /// Storage key of the collection holding records of this kind.
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Photo => GALLERY_PHOTOS_KEY,
            EntityKind::Video => VIDEOS_KEY,
            EntityKind::Diary => DIARY_ENTRIES_KEY,
            EntityKind::Letter => LETTERS_KEY,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Persisted state layout, one JSON array per key.
pub const DIARY_ENTRIES_KEY: &str = "diary-entries";
pub const GALLERY_PHOTOS_KEY: &str = "gallery-photos";
pub const VIDEOS_KEY: &str = "videos";
pub const LETTERS_KEY: &str = "letters";
pub const FAVORITES_KEY: &str = "favorites";

/// Accepts ids stored as strings or as JSON numbers (older gallery data used
/// millisecond timestamps, sometimes with a fractional part) and yields the
/// canonical string form.
pub fn deserialize_record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(u64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_record_id")]
        id: RecordId,
    }

    fn id_of(json: &str) -> String {
        serde_json::from_str::<Holder>(json).unwrap().id
    }

    #[test]
    fn numeric_ids_become_canonical_strings() {
        assert_eq!(id_of(r#"{"id":"1717171717"}"#), "1717171717");
        assert_eq!(id_of(r#"{"id":1717171717}"#), "1717171717");
        assert_eq!(id_of(r#"{"id":1717171717000.25}"#), "1717171717000.25");
    }

    #[test]
    fn kinds_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&EntityKind::Diary).unwrap(), "\"diary\"");
        let kind: EntityKind = serde_json::from_str("\"letter\"").unwrap();
        assert_eq!(kind, EntityKind::Letter);
        assert_eq!(EntityKind::Photo.storage_key(), "gallery-photos");
    }
}
