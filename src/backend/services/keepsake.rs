// src/backend/services/keepsake.rs
use crate::error::KeepsakeError;
use crate::models::common::EntityKind;
use crate::models::record::{MemorySummary, Record};
use crate::models::search::SearchQuery;
use crate::models::{DiaryEntry, Letter, Photo, Video};
use crate::services::favorites_service::{self, FavoritesIndex};
use crate::services::reply_budget::{fit_reply, MAX_REPLY_BYTES};
use crate::services::repository::Repository;
use crate::services::search_service::{self, SearchCorpus};
use crate::services::video_service::VideoRepository;
use crate::storage::{BlobBackend, CollectionStore, IdAllocator, SessionStore};
use ic_stable_structures::Memory;
use std::collections::HashMap;
use std::rc::Rc;

/// Every collection of the canister, built once and shared by the endpoints.
pub struct Keepsake<M: Memory, B: BlobBackend> {
    pub store: Rc<CollectionStore<M>>,
    pub photos: Repository<Photo, M>,
    pub diary: Repository<DiaryEntry, M>,
    pub letters: Repository<Letter, M>,
    pub videos: VideoRepository<B, M>,
    pub sessions: SessionStore<M>,
}

impl<M: Memory, B: BlobBackend> Keepsake<M, B> {
    pub fn new(
        store: CollectionStore<M>,
        ids: IdAllocator<M>,
        backend: B,
        sessions: SessionStore<M>,
    ) -> Self {
        let store = Rc::new(store);
        let ids = Rc::new(ids);
        Self {
            photos: Repository::new(store.clone(), ids.clone()),
            diary: Repository::new(store.clone(), ids.clone()),
            letters: Repository::new(store.clone(), ids.clone()),
            videos: VideoRepository::new(backend, store.clone(), ids),
            sessions,
            store,
        }
    }

    /// Deletes a record of any kind, cascading to the favorites index.
    pub async fn remove(&self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Photo => self.photos.remove(id),
            EntityKind::Video => self.videos.remove(id).await,
            EntityKind::Diary => self.diary.remove(id),
            EntityKind::Letter => self.letters.remove(id),
        }
    }

    pub async fn toggle_favorite(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<MemorySummary, KeepsakeError> {
        Ok(match kind {
            EntityKind::Photo => self.photos.toggle_favorite(id)?.summary(),
            EntityKind::Video => self.videos.toggle_favorite(id).await?.summary(),
            EntityKind::Diary => self.diary.toggle_favorite(id)?.summary(),
            EntityKind::Letter => self.letters.toggle_favorite(id)?.summary(),
        })
    }

    /// Drops a favorites entry from the favorites view. The record itself stays.
    pub fn remove_favorite(&self, kind: EntityKind, id: &str) -> bool {
        favorites_service::forget(&self.store, kind, id)
    }

    pub fn is_favorite(&self, kind: EntityKind, id: &str) -> bool {
        FavoritesIndex::load(&self.store).contains(kind, id)
    }

    /// Favorites in the order they were marked, optionally of one kind, with
    /// display fields read from the live records. Entries whose record no
    /// longer exists are skipped. The reply is cut to [`MAX_REPLY_BYTES`].
    pub async fn list_favorites(&self, kind: Option<EntityKind>) -> Vec<MemorySummary> {
        let index = FavoritesIndex::load(&self.store);
        let wanted: Vec<EntityKind> = EntityKind::ALL
            .into_iter()
            .filter(|k| kind.map_or(true, |only| only == *k))
            .filter(|k| !index.list_by_type(*k).is_empty())
            .collect();

        let mut live: HashMap<(EntityKind, String), MemorySummary> = HashMap::new();
        for k in wanted {
            for summary in self.summaries_of(k).await {
                live.insert((k, summary.id.clone()), summary);
            }
        }

        let favorites = index
            .entries()
            .iter()
            .filter(|entry| kind.map_or(true, |only| only == entry.kind))
            .filter_map(|entry| {
                let found = live.remove(&(entry.kind, entry.id.clone()));
                if found.is_none() {
                    log_warn!("Favorite {}/{} points at a missing record", entry.kind, entry.id);
                }
                found
            })
            .collect();
        fit_reply(favorites, MAX_REPLY_BYTES, "favorites")
    }

    /// Videos newest first, cut to [`MAX_REPLY_BYTES`].
    pub async fn list_videos(&self) -> Vec<Video> {
        fit_reply(self.videos.list().await, MAX_REPLY_BYTES, "videos")
    }

    async fn summaries_of(&self, kind: EntityKind) -> Vec<MemorySummary> {
        match kind {
            EntityKind::Photo => summaries(self.photos.list()),
            EntityKind::Video => summaries(self.videos.list().await),
            EntityKind::Diary => summaries(self.diary.list()),
            EntityKind::Letter => summaries(self.letters.list()),
        }
    }

    /// Loads the enabled collections and runs the cross-content search over them.
    /// Each collection fits a reply on its own; several together may not, so
    /// the hits are cut to [`MAX_REPLY_BYTES`].
    pub async fn search(&self, query: &SearchQuery) -> Vec<MemorySummary> {
        if query.text.trim().is_empty() {
            return Vec::new();
        }
        let mut corpus = SearchCorpus::default();
        if query.is_enabled(EntityKind::Photo) {
            corpus.photos = self.photos.list();
        }
        if query.is_enabled(EntityKind::Video) {
            corpus.videos = self.videos.list().await;
        }
        if query.is_enabled(EntityKind::Diary) {
            corpus.diary = self.diary.list();
        }
        if query.is_enabled(EntityKind::Letter) {
            corpus.letters = self.letters.list();
        }
        fit_reply(search_service::search(query, &corpus), MAX_REPLY_BYTES, "search")
    }
}

fn summaries<R: Record>(records: Vec<R>) -> Vec<MemorySummary> {
    records.iter().map(|r| r.summary()).collect()
}


#[cfg(test)]
mod tests {
    use super::test_util::{keepsake, keepsake_with_quota};
    use super::*;
    use crate::models::config::DEFAULT_COLLECTION_QUOTA_BYTES;
    use crate::models::{NewDiaryEntry, NewLetter, NewPhoto, NewVideo};
    use futures::executor::block_on;

    // Largest reply the replica returns from a query call.
    const QUERY_REPLY_LIMIT: usize = 3 * 1024 * 1024;

    fn large_photo(name: &str) -> NewPhoto {
        NewPhoto {
            url: format!("data:image/png;base64,{}", "A".repeat(700_000)),
            file_name: format!("{}.png", name),
        }
    }

    #[test]
    fn full_gallery_under_default_quota_fits_one_reply() {
        let ks = keepsake_with_quota(DEFAULT_COLLECTION_QUOTA_BYTES);
        for name in ["sea", "hills", "city"] {
            ks.photos.add(large_photo(name)).unwrap();
        }
        // The third photo did not fit the quota and was never stored.
        let gallery = ks.photos.list();
        assert_eq!(gallery.len(), 2);
        let reply = candid::encode_one(&gallery).unwrap();
        assert!(reply.len() <= MAX_REPLY_BYTES);
        assert!(reply.len() <= QUERY_REPLY_LIMIT);
    }

    #[test]
    fn search_across_full_collections_is_cut_to_the_reply_budget() {
        let ks = keepsake_with_quota(DEFAULT_COLLECTION_QUOTA_BYTES);
        ks.photos.add(large_photo("sunset one")).unwrap();
        ks.photos.add(large_photo("sunset two")).unwrap();
        for _ in 0..2 {
            let content = format!("sunset {}", "x".repeat(700_000));
            ks.diary.add(NewDiaryEntry { content }).unwrap();
        }
        assert_eq!(ks.diary.list().len(), 2);

        let hits = block_on(ks.search(&SearchQuery { text: "sunset".into(), kinds: vec![] }));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.kind == EntityKind::Photo));
        assert!(candid::encode_one(&hits).unwrap().len() <= QUERY_REPLY_LIMIT);
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let ks = keepsake();
        let photo = ks.photos.add(NewPhoto { url: "u".into(), file_name: "a.png".into() }).unwrap();
        let entry = ks.diary.add(NewDiaryEntry { content: "c".into() }).unwrap();
        assert_ne!(photo.id, entry.id);
    }

    #[test]
    fn favorites_resolve_live_fields_in_marking_order() {
        let ks = keepsake();
        block_on(async {
            let letter = ks.letters.add(NewLetter { title: "draft".into(), content: "hi".into() }).unwrap();
            let video = ks
                .videos
                .add(NewVideo { url: "blob:v".into(), title: "dance".into(), media_type: "video/webm".into() })
                .await
                .unwrap();
            ks.toggle_favorite(EntityKind::Video, &video.id).await.unwrap();
            ks.toggle_favorite(EntityKind::Letter, &letter.id).await.unwrap();

            let favorites = ks.list_favorites(None).await;
            assert_eq!(favorites.len(), 2);
            assert_eq!(favorites[0].kind, EntityKind::Video);
            assert_eq!(favorites[1].title.as_deref(), Some("draft"));

            let only_letters = ks.list_favorites(Some(EntityKind::Letter)).await;
            assert_eq!(only_letters.len(), 1);
            assert_eq!(only_letters[0].id, letter.id);
        });
    }

    #[test]
    fn favorites_skip_entries_without_a_record() {
        let ks = keepsake();
        block_on(async {
            let entry = ks.diary.add(NewDiaryEntry { content: "kept".into() }).unwrap();
            ks.toggle_favorite(EntityKind::Diary, &entry.id).await.unwrap();
            favorites_service::modify_favorites(&ks.store, |index| {
                index.toggle(EntityKind::Photo, "ghost", 0)
            });
            let favorites = ks.list_favorites(None).await;
            assert_eq!(favorites.len(), 1);
            assert_eq!(favorites[0].content.as_deref(), Some("kept"));
        });
    }

    #[test]
    fn removing_a_favorite_clears_the_record_flag() {
        let ks = keepsake();
        block_on(async {
            let photo = ks.photos.add(NewPhoto { url: "u".into(), file_name: "sea.png".into() }).unwrap();
            ks.toggle_favorite(EntityKind::Photo, &photo.id).await.unwrap();
            assert!(ks.remove_favorite(EntityKind::Photo, &photo.id));
            assert!(!ks.photos.list()[0].is_favorite);
            assert!(!ks.is_favorite(EntityKind::Photo, &photo.id));
        });
    }

    #[test]
    fn search_spans_string_and_binary_collections() {
        let ks = keepsake();
        block_on(async {
            ks.photos.add(NewPhoto { url: "u".into(), file_name: "sunset.png".into() }).unwrap();
            ks.diary.add(NewDiaryEntry { content: "sunset walk".into() }).unwrap();
            ks.videos
                .add(NewVideo { url: "blob:s".into(), title: "Sunset timelapse".into(), media_type: "video/mp4".into() })
                .await
                .unwrap();

            let all = ks.search(&SearchQuery { text: "sunset".into(), kinds: vec![] }).await;
            let kinds: Vec<_> = all.iter().map(|h| h.kind).collect();
            assert_eq!(kinds, vec![EntityKind::Photo, EntityKind::Video, EntityKind::Diary]);

            let no_diary = ks
                .search(&SearchQuery { text: "sunset".into(), kinds: vec![EntityKind::Photo] })
                .await;
            assert_eq!(no_diary.len(), 1);
        });
    }

    #[test]
    fn remove_dispatches_by_kind() {
        let ks = keepsake();
        block_on(async {
            let entry = ks.diary.add(NewDiaryEntry { content: "bye".into() }).unwrap();
            assert!(!ks.remove(EntityKind::Letter, &entry.id).await);
            assert!(ks.remove(EntityKind::Diary, &entry.id).await);
            assert!(ks.diary.list().is_empty());
        });
    }
}
