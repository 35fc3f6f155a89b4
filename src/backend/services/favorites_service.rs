// src/backend/services/favorites_service.rs
use crate::error::KeepsakeError;
use crate::models::common::{EntityKind, TimestampNs, FAVORITES_KEY};
use crate::models::favorite::{FavoriteEntry, FavoriteKey};
use crate::storage::CollectionStore;
use ic_stable_structures::Memory;
use std::collections::HashSet;

/// The single cross-kind favorites collection, held in memory with a key set
/// for constant-time membership checks. Insertion order is preserved.
#[derive(Debug, Default, Clone)]
pub struct FavoritesIndex {
    entries: Vec<FavoriteEntry>,
    keys: HashSet<FavoriteKey>,
}

impl FavoritesIndex {
    /// Loads the persisted index. Duplicate `(type, id)` pairs left by older data
    /// are collapsed to the first occurrence.
    pub fn load<M: Memory>(store: &CollectionStore<M>) -> Self {
        let mut index = FavoritesIndex::default();
        for entry in store.load::<FavoriteEntry>(FAVORITES_KEY) {
            if index.keys.insert(entry.key()) {
                index.entries.push(entry);
            }
        }
        index
    }

    pub fn save<M: Memory>(&self, store: &CollectionStore<M>) -> Result<(), KeepsakeError> {
        store.save(FAVORITES_KEY, &self.entries)
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.keys.contains(&FavoriteKey::new(kind, id))
    }

    /// Inserts `entry`, silently replacing an existing entry with the same key.
    pub fn add(&mut self, entry: FavoriteEntry) {
        if self.keys.insert(entry.key()) {
            self.entries.push(entry);
        } else if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.kind == entry.kind && e.id == entry.id)
        {
            *existing = entry;
        }
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, kind: EntityKind, id: &str) -> bool {
        if !self.keys.remove(&FavoriteKey::new(kind, id)) {
            return false;
        }
        self.entries.retain(|e| !(e.kind == kind && e.id == id));
        true
    }

    /// Flips membership and returns the new state.
    pub fn toggle(&mut self, kind: EntityKind, id: &str, now: TimestampNs) -> bool {
        if self.remove(kind, id) {
            false
        } else {
            self.add(FavoriteEntry { kind, id: id.to_string(), favorited_at_ns: now });
            true
        }
    }

    pub fn list_by_type(&self, kind: EntityKind) -> Vec<FavoriteEntry> {
        self.entries.iter().filter(|e| e.kind == kind).cloned().collect()
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load, modify and persist the index in one synchronous step. A failed write
/// is logged and counted; the modified index is returned either way.
pub fn modify_favorites<M, F, T>(store: &CollectionStore<M>, modify: F) -> T
where
    M: Memory,
    F: FnOnce(&mut FavoritesIndex) -> T,
{
    let mut index = FavoritesIndex::load(store);
    let result = modify(&mut index);
    if let Err(e) = index.save(store) {
        log_error!("Favorites index not persisted: {}", e);
        crate::metrics::storage_write_failed();
    }
    result
}

/// Cascade used when a source record is deleted.
pub fn forget<M: Memory>(store: &CollectionStore<M>, kind: EntityKind, id: &str) -> bool {
    let index = FavoritesIndex::load(store);
    if !index.contains(kind, id) {
        return false;
    }
    modify_favorites(store, |index| index.remove(kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;

    fn entry(kind: EntityKind, id: &str, at: TimestampNs) -> FavoriteEntry {
        FavoriteEntry { kind, id: id.into(), favorited_at_ns: at }
    }

    #[test]
    fn add_is_idempotent_per_key() {
        let mut index = FavoritesIndex::default();
        index.add(entry(EntityKind::Photo, "1", 1));
        index.add(entry(EntityKind::Photo, "1", 2));
        index.add(entry(EntityKind::Diary, "1", 3));
        assert_eq!(index.len(), 2);
        assert_eq!(index.list_by_type(EntityKind::Photo)[0].favorited_at_ns, 2);
        assert!(index.contains(EntityKind::Diary, "1"));
        assert!(!index.contains(EntityKind::Letter, "1"));
    }

    #[test]
    fn remove_absent_is_a_no_op() {
        let mut index = FavoritesIndex::default();
        assert!(!index.remove(EntityKind::Video, "9"));
        assert!(index.is_empty());
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut index = FavoritesIndex::default();
        index.add(entry(EntityKind::Letter, "4", 0));
        assert!(index.toggle(EntityKind::Photo, "2", 5));
        assert!(!index.toggle(EntityKind::Photo, "2", 6));
        assert_eq!(index.entries(), &[entry(EntityKind::Letter, "4", 0)]);
    }

    #[test]
    fn duplicates_in_stored_data_collapse_on_load() {
        let store = CollectionStore::init(DefaultMemoryImpl::default(), 1 << 16);
        store.put_raw(
            FAVORITES_KEY,
            r#"[{"type":"photo","id":1},{"type":"photo","id":"1"},{"type":"diary","id":"1"}]"#,
        );
        let index = FavoritesIndex::load(&store);
        assert_eq!(index.len(), 2);
        assert!(index.contains(EntityKind::Photo, "1"));
    }

    #[test]
    fn modify_persists_and_forget_cascades() {
        let store = CollectionStore::init(DefaultMemoryImpl::default(), 1 << 16);
        modify_favorites(&store, |index| index.add(entry(EntityKind::Video, "3", 1)));
        assert!(FavoritesIndex::load(&store).contains(EntityKind::Video, "3"));

        assert!(forget(&store, EntityKind::Video, "3"));
        assert!(!forget(&store, EntityKind::Video, "3"));
        assert!(FavoritesIndex::load(&store).is_empty());
    }
}
