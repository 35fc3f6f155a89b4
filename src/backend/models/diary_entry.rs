// src/backend/models/diary_entry.rs
use crate::models::common::{deserialize_record_id, EntityKind, RecordId, TimestampNs};
use crate::models::record::{MemorySummary, Record};
use crate::utils::time::format_date_time;
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: RecordId,
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub created_at_ns: TimestampNs,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct NewDiaryEntry {
    pub content: String,
}

impl Record for DiaryEntry {
    const KIND: EntityKind = EntityKind::Diary;
    type Draft = NewDiaryEntry;

    fn from_draft(id: RecordId, now: TimestampNs, draft: NewDiaryEntry) -> Self {
        DiaryEntry {
            id,
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
        vec![&self.content]
    }

    fn summary(&self) -> MemorySummary {
        MemorySummary {
            kind: Self::KIND,
            id: self.id.clone(),
            title: None,
            content: Some(self.content.clone()),
            url: None,
            date: self.date.clone(),
        }
    }
}
