// src/backend/services/video_service.rs
use crate::error::KeepsakeError;
use crate::models::common::{EntityKind, VIDEOS_KEY};
use crate::models::record::Record;
use crate::models::video::{NewVideo, Video};
use crate::services::favorites_service::{self, FavoritesIndex};
use crate::services::repository::annotate;
use crate::storage::{BinaryStore, BlobBackend, CollectionStore, IdAllocator};
use crate::utils::time::get_current_time_ns;
use ic_stable_structures::Memory;
use std::rc::Rc;

/// Videos live in the binary store; their favorites entries live in the
/// string-backed favorites index like every other kind.
pub struct VideoRepository<B: BlobBackend, M: Memory> {
    blobs: BinaryStore<B>,
    store: Rc<CollectionStore<M>>,
    ids: Rc<IdAllocator<M>>,
}

impl<B: BlobBackend, M: Memory> VideoRepository<B, M> {
    pub fn new(backend: B, store: Rc<CollectionStore<M>>, ids: Rc<IdAllocator<M>>) -> Self {
        Self { blobs: BinaryStore::new(backend), store, ids }
    }

    pub fn backend(&self) -> &B {
        self.blobs.backend()
    }

    pub async fn list(&self) -> Vec<Video> {
        let videos = self.blobs.load_all::<Video>(VIDEOS_KEY).await;
        annotate(videos, &FavoritesIndex::load(&self.store))
    }

    pub async fn get(&self, id: &str) -> Option<Video> {
        let mut video = self.blobs.get::<Video>(id).await?;
        video.set_favorite(FavoritesIndex::load(&self.store).contains(EntityKind::Video, id));
        Some(video)
    }

    pub async fn add(&self, draft: NewVideo) -> Result<Video, KeepsakeError> {
        if !draft.has_accepted_media_type() {
            return Err(KeepsakeError::InvalidInput(format!(
                "Unsupported video type '{}', only MP4 and WebM are accepted",
                draft.media_type
            )));
        }
        let video = Video::from_draft(self.ids.next_id()?, get_current_time_ns(), draft);
        match self.blobs.insert(VIDEOS_KEY, &video.id, &video).await {
            Ok(()) => log_info!("Stored video {}", video.id),
            Err(e) => {
                log_error!("Video {} not persisted: {}", video.id, e);
                crate::metrics::storage_write_failed();
            }
        }
        Ok(video)
    }

    /// Deletes the video and cascades to the favorites index. Unknown ids are a no-op.
    pub async fn remove(&self, id: &str) -> bool {
        let existed = match self.blobs.delete(VIDEOS_KEY, id).await {
            Ok(existed) => existed,
            Err(e) => {
                log_error!("Video {} not deleted: {}", id, e);
                crate::metrics::storage_write_failed();
                false
            }
        };
        favorites_service::forget(&self.store, EntityKind::Video, id);
        existed
    }

    pub async fn toggle_favorite(&self, id: &str) -> Result<Video, KeepsakeError> {
        let store = &self.store;
        let now = get_current_time_ns();
        // The index flip runs inside the queued update so concurrent toggles
        // of one video observe each other.
        let updated = self
            .blobs
            .update::<Video, _>(VIDEOS_KEY, id, |video| {
                let favorite = favorites_service::modify_favorites(store, |index| {
                    index.toggle(EntityKind::Video, id, now)
                });
                video.set_favorite(favorite);
            })
            .await?;
        updated.ok_or_else(|| KeepsakeError::NotFound(format!("{}/{}", EntityKind::Video, id)))
    }

    /// Persists the resume position, in seconds.
    pub async fn update_playback_position(
        &self,
        id: &str,
        seconds: f64,
    ) -> Result<Video, KeepsakeError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(KeepsakeError::InvalidInput(format!(
                "Playback position must be a non-negative number of seconds, got {}",
                seconds
            )));
        }
        let updated = self
            .blobs
            .update::<Video, _>(VIDEOS_KEY, id, |video| video.current_time = seconds)
            .await?;
        let mut video =
            updated.ok_or_else(|| KeepsakeError::NotFound(format!("{}/{}", EntityKind::Video, id)))?;
        video.set_favorite(FavoritesIndex::load(&self.store).contains(EntityKind::Video, id));
        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::blob_store::test_util::SlowBackend;
    use futures::executor::block_on;
    use ic_stable_structures::DefaultMemoryImpl;

    fn repo() -> VideoRepository<SlowBackend, DefaultMemoryImpl> {
        VideoRepository::new(
            SlowBackend::new(),
            Rc::new(CollectionStore::init(DefaultMemoryImpl::default(), 1 << 20)),
            Rc::new(IdAllocator::init(DefaultMemoryImpl::default()).unwrap()),
        )
    }

    fn clip(title: &str) -> NewVideo {
        NewVideo { url: format!("blob:{}", title), title: title.into(), media_type: "video/mp4".into() }
    }

    #[test]
    fn concurrent_adds_are_both_retained() {
        let repo = repo();
        block_on(async {
            let (a, b) = futures::join!(repo.add(clip("lake")), repo.add(clip("city")));
            let (a, b) = (a.unwrap(), b.unwrap());
            assert_ne!(a.id, b.id);
            let listed = repo.list().await;
            assert_eq!(listed.len(), 2);
            assert!(listed.iter().any(|v| v.id == a.id));
            assert!(listed.iter().any(|v| v.id == b.id));
        });
    }

    #[test]
    fn rejects_unsupported_media_type() {
        let repo = repo();
        let mut draft = clip("mov");
        draft.media_type = "video/quicktime".into();
        let err = block_on(repo.add(draft)).unwrap_err();
        assert!(matches!(err, KeepsakeError::InvalidInput(_)));
    }

    #[test]
    fn playback_position_is_persisted() {
        let repo = repo();
        block_on(async {
            let video = repo.add(clip("concert")).await.unwrap();
            let updated = repo.update_playback_position(&video.id, 93.5).await.unwrap();
            assert_eq!(updated.current_time, 93.5);
            assert_eq!(repo.get(&video.id).await.unwrap().current_time, 93.5);
            assert!(matches!(
                repo.update_playback_position(&video.id, -1.0).await,
                Err(KeepsakeError::InvalidInput(_))
            ));
            assert!(matches!(
                repo.update_playback_position("missing", 1.0).await,
                Err(KeepsakeError::NotFound(_))
            ));
        });
    }

    #[test]
    fn concurrent_toggles_cancel_out() {
        let repo = repo();
        block_on(async {
            let video = repo.add(clip("birthday")).await.unwrap();
            let (first, second) =
                futures::join!(repo.toggle_favorite(&video.id), repo.toggle_favorite(&video.id));
            assert_ne!(first.unwrap().is_favorite, second.unwrap().is_favorite);
            assert!(!repo.get(&video.id).await.unwrap().is_favorite);
            assert!(FavoritesIndex::load(&repo.store).is_empty());
        });
    }

    #[test]
    fn remove_cascades_to_favorites() {
        let repo = repo();
        block_on(async {
            let video = repo.add(clip("beach")).await.unwrap();
            assert!(repo.toggle_favorite(&video.id).await.unwrap().is_favorite);
            assert!(repo.remove(&video.id).await);
            assert!(!repo.remove(&video.id).await);
            assert!(repo.list().await.is_empty());
            assert!(!FavoritesIndex::load(&repo.store).contains(EntityKind::Video, &video.id));
        });
    }
}
