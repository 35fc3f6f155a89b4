// src/backend/models/video.rs
use crate::models::common::{deserialize_record_id, EntityKind, RecordId, TimestampNs};
use crate::models::record::{MemorySummary, Record};
use crate::utils::time::format_date_time;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Media types accepted for uploaded videos.
pub const ACCEPTED_VIDEO_TYPES: [&str; 2] = ["video/mp4", "video/webm"];

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: RecordId,
    /// Data URL or blob reference.
    pub url: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub created_at_ns: TimestampNs,
    /// Resume position in seconds.
    #[serde(default)]
    pub current_time: f64,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct NewVideo {
    pub url: String,
    pub title: String,
    pub media_type: String,
}

impl NewVideo {
    pub fn has_accepted_media_type(&self) -> bool {
        let media_type = self.media_type.trim().to_ascii_lowercase();
        ACCEPTED_VIDEO_TYPES.contains(&media_type.as_str())
    }
}

impl Record for Video {
    const KIND: EntityKind = EntityKind::Video;
    type Draft = NewVideo;

    fn from_draft(id: RecordId, now: TimestampNs, draft: NewVideo) -> Self {
        Video {
            id,
            url: draft.url,
            title: draft.title,
            date: format_date_time(now),
            created_at_ns: now,
            current_time: 0.0,
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
        vec![&self.title]
    }

    fn summary(&self) -> MemorySummary {
        MemorySummary {
            kind: Self::KIND,
            id: self.id.clone(),
            title: Some(self.title.clone()),
            content: None,
            url: Some(self.url.clone()),
            date: self.date.clone(),
        }
    }
}
