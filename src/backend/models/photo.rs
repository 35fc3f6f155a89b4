// src/backend/models/photo.rs
use crate::models::common::{deserialize_record_id, EntityKind, RecordId, TimestampNs};
use crate::models::record::{MemorySummary, Record};
use crate::utils::time::format_date;
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: RecordId,
    /// Data URL or external reference to the image bytes.
    pub url: String,
    pub title: String,
    /// Display date, `dd.mm.yyyy`.
    pub date: String,
    #[serde(default)]
    pub created_at_ns: TimestampNs,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct NewPhoto {
    pub url: String,
    /// Original file name; the title is the name up to the first dot.
    pub file_name: String,
}

impl NewPhoto {
    pub fn title(&self) -> String {
        let stem = self.file_name.split('.').next().unwrap_or_default();
        if stem.is_empty() {
            self.file_name.clone()
        } else {
            stem.to_string()
        }
    }
}

impl Record for Photo {
    const KIND: EntityKind = EntityKind::Photo;
    type Draft = NewPhoto;

    fn from_draft(id: RecordId, now: TimestampNs, draft: NewPhoto) -> Self {
        Photo {
            id,
            title: draft.title(),
            url: draft.url,
            date: format_date(now),
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

    // Photos are found by title only.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_file_stem() {
        let draft = NewPhoto { url: "data:image/png;base64,AA".into(), file_name: "sunset.beach.png".into() };
        assert_eq!(draft.title(), "sunset");
        let hidden = NewPhoto { url: String::new(), file_name: ".png".into() };
        assert_eq!(hidden.title(), ".png");
    }

    #[test]
    fn reads_legacy_gallery_json() {
        let json = r#"[{"id":1717171717000.5,"url":"data:x","title":"sea","date":"01.06.2024","isFavorite":true}]"#;
        let photos: Vec<Photo> = serde_json::from_str(json).unwrap();
        assert_eq!(photos[0].id, "1717171717000.5");
        assert!(photos[0].is_favorite);
        assert_eq!(photos[0].created_at_ns, 0);
    }
}
