// src/backend/models/letter.rs
use crate::models::common::{deserialize_record_id, EntityKind, RecordId, TimestampNs};
use crate::models::record::{MemorySummary, Record};
use crate::utils::time::format_date_time;
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub created_at_ns: TimestampNs,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct NewLetter {
    pub title: String,
    pub content: String,
}

impl Record for Letter {
    const KIND: EntityKind = EntityKind::Letter;
    type Draft = NewLetter;

    fn from_draft(id: RecordId, now: TimestampNs, draft: NewLetter) -> Self {
        Letter {
            id,
            title: draft.title,
            content: draft.content,
            date: format_date_time(now),
            created_at_ns: now,
            is_favorite: false,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    fn set_favorite(&mut self, favorite: bool) {
        self.is_favorite = favorite;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.content]
    }

    fn summary(&self) -> MemorySummary {
        MemorySummary {
            kind: Self::KIND,
            id: self.id.clone(),
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            url: None,
            date: self.date.clone(),
        }
    }
}
