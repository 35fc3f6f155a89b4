// src/backend/services/repository.rs
use crate::error::KeepsakeError;
use crate::models::record::Record;
use crate::services::favorites_service::{self, FavoritesIndex};
use crate::storage::{CollectionStore, IdAllocator};
use crate::utils::time::get_current_time_ns;
use ic_stable_structures::Memory;
use std::marker::PhantomData;
use std::rc::Rc;

/// CRUD over one string-backed collection (photos, diary entries, letters).
/// Every mutation is a full read-modify-write of the collection.
pub struct Repository<R: Record, M: Memory> {
    store: Rc<CollectionStore<M>>,
    ids: Rc<IdAllocator<M>>,
    _record: PhantomData<R>,
}

impl<R: Record, M: Memory> Repository<R, M> {
    pub fn new(store: Rc<CollectionStore<M>>, ids: Rc<IdAllocator<M>>) -> Self {
        Self { store, ids, _record: PhantomData }
    }

    fn key(&self) -> &'static str {
        R::KIND.storage_key()
    }

    fn load(&self) -> Vec<R> {
        self.store.load(self.key())
    }

    // Write failures leave the returned in-memory state ahead of what is stored
    // until the next successful write.
    fn persist(&self, records: &[R]) {
        if let Err(e) = self.store.save(self.key(), records) {
            log_error!("Collection '{}' not persisted: {}", self.key(), e);
            crate::metrics::storage_write_failed();
        }
    }

    /// Current records, newest first, with `is_favorite` taken from the favorites index.
    pub fn list(&self) -> Vec<R> {
        let index = FavoritesIndex::load(&self.store);
        annotate(self.load(), &index)
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.list().into_iter().find(|r| r.id() == id)
    }

    pub fn add(&self, draft: R::Draft) -> Result<R, KeepsakeError> {
        let mut added = self.add_many(vec![draft])?;
        added
            .pop()
            .ok_or_else(|| KeepsakeError::Internal("Insert produced no record".to_string()))
    }

    /// Adds a batch in one write. The batch keeps its order at the front of the collection.
    pub fn add_many(&self, drafts: Vec<R::Draft>) -> Result<Vec<R>, KeepsakeError> {
        let now = get_current_time_ns();
        let mut added = Vec::with_capacity(drafts.len());
        for draft in drafts {
            added.push(R::from_draft(self.ids.next_id()?, now, draft));
        }
        if added.is_empty() {
            return Ok(added);
        }

        let mut records = added.clone();
        records.extend(self.load());
        self.persist(&records);
        log_info!("Added {} record(s) to '{}'", added.len(), self.key());
        Ok(added)
    }

    /// Deletes the record and any favorites entry pointing at it. Unknown ids are a no-op.
    pub fn remove(&self, id: &str) -> bool {
        let mut records = self.load();
        let before = records.len();
        records.retain(|r| r.id() != id);
        let existed = records.len() != before;
        if existed {
            self.persist(&records);
        }
        favorites_service::forget(&self.store, R::KIND, id);
        existed
    }

    /// Flips the favorite state of the record and mirrors it in the favorites index.
    pub fn toggle_favorite(&self, id: &str) -> Result<R, KeepsakeError> {
        let mut records = self.load();
        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| KeepsakeError::NotFound(format!("{}/{}", R::KIND, id)))?;

        let now = get_current_time_ns();
        let favorite =
            favorites_service::modify_favorites(&self.store, |index| index.toggle(R::KIND, id, now));
        records[position].set_favorite(favorite);
        self.persist(&records);
        Ok(records.swap_remove(position))
    }
}

pub(crate) fn annotate<R: Record>(mut records: Vec<R>, index: &FavoritesIndex) -> Vec<R> {
    for record in records.iter_mut() {
        let favorite = index.contains(R::KIND, record.id());
        record.set_favorite(favorite);
    }
    records
}
