// src/backend/services/search_service.rs
use crate::models::common::EntityKind;
use crate::models::record::{MemorySummary, Record};
use crate::models::search::SearchQuery;
use crate::models::{DiaryEntry, Letter, Photo, Video};

/// In-memory snapshot of every collection a search looks at. Kinds that are
/// filtered out may be left empty.
#[derive(Default, Clone, Debug)]
pub struct SearchCorpus {
    pub photos: Vec<Photo>,
    pub videos: Vec<Video>,
    pub diary: Vec<DiaryEntry>,
    pub letters: Vec<Letter>,
}

/// Case-insensitive substring search across kinds. Photos and videos match on
/// title only, diary entries on their text, letters on title and text.
///
/// A blank query yields nothing. Results come grouped by kind in
/// [`EntityKind::ALL`] order, each group in collection order.
pub fn search(query: &SearchQuery, corpus: &SearchCorpus) -> Vec<MemorySummary> {
    let needle = query.text.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for kind in EntityKind::ALL {
        if !query.is_enabled(kind) {
            continue;
        }
        match kind {
            EntityKind::Photo => collect(&corpus.photos, &needle, &mut hits),
            EntityKind::Video => collect(&corpus.videos, &needle, &mut hits),
            EntityKind::Diary => collect(&corpus.diary, &needle, &mut hits),
            EntityKind::Letter => collect(&corpus.letters, &needle, &mut hits),
        }
    }
    hits
}

fn collect<R: Record>(records: &[R], needle: &str, hits: &mut Vec<MemorySummary>) {
    hits.extend(
        records
            .iter()
            .filter(|r| r.matches(needle))
            .map(|r| r.summary()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str, title: &str) -> Photo {
        Photo {
            id: id.into(),
            url: format!("data:{}", id),
            title: title.into(),
            date: "01.06.2024".into(),
            created_at_ns: 0,
            is_favorite: false,
        }
    }

    fn diary(id: &str, content: &str) -> DiaryEntry {
        DiaryEntry {
            id: id.into(),
            content: content.into(),
            date: "01.06.2024, 20:00:00".into(),
            created_at_ns: 0,
            is_favorite: false,
        }
    }

    fn corpus() -> SearchCorpus {
        SearchCorpus {
            photos: vec![photo("1", "sunset")],
            diary: vec![diary("2", "sunset walk")],
            ..SearchCorpus::default()
        }
    }

    fn query(text: &str, kinds: &[EntityKind]) -> SearchQuery {
        SearchQuery { text: text.into(), kinds: kinds.to_vec() }
    }

    #[test]
    fn blank_query_returns_nothing() {
        assert!(search(&query("", &[]), &corpus()).is_empty());
        assert!(search(&query("   ", &[]), &corpus()).is_empty());
    }

    #[test]
    fn unmatched_query_returns_nothing() {
        assert!(search(&query("mountain", &[]), &corpus()).is_empty());
    }

    #[test]
    fn one_result_per_matching_kind() {
        let enabled = [EntityKind::Photo, EntityKind::Diary];
        let hits = search(&query("sunset", &enabled), &corpus());
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| h.kind == EntityKind::Photo && h.id == "1"));
        assert!(hits.iter().any(|h| h.kind == EntityKind::Diary && h.id == "2"));

        let photos_only = search(&query("sunset", &[EntityKind::Photo]), &corpus());
        assert_eq!(photos_only.len(), 1);
        assert_eq!(photos_only[0].kind, EntityKind::Photo);
    }

    #[test]
    fn full_diary_text_finds_the_entry() {
        let hits = search(&query("Sunset Walk", &[]), &corpus());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, EntityKind::Diary);
        assert_eq!(hits[0].content.as_deref(), Some("sunset walk"));
    }

    #[test]
    fn photos_do_not_match_on_url() {
        let corpus = SearchCorpus { photos: vec![photo("1", "beach")], ..SearchCorpus::default() };
        assert!(search(&query("data:", &[]), &corpus).is_empty());
    }

    #[test]
    fn letters_match_title_or_body() {
        let letter = Letter {
            id: "9".into(),
            title: "For the anniversary".into(),
            content: "Remember the lake?".into(),
            date: String::new(),
            created_at_ns: 0,
            is_favorite: false,
        };
        let corpus = SearchCorpus { letters: vec![letter], ..SearchCorpus::default() };
        assert_eq!(search(&query("anniversary", &[]), &corpus).len(), 1);
        assert_eq!(search(&query("LAKE", &[]), &corpus).len(), 1);
        assert!(search(&query("lake", &[EntityKind::Diary]), &corpus).is_empty());
    }
}
