// src/backend/storage/collection_store.rs
use crate::error::KeepsakeError;
use ic_stable_structures::{Memory, StableBTreeMap};
use serde::{de::DeserializeOwned, Serialize};
use std::cell::{Cell, RefCell};

/// Key-scoped store of whole collections. Each key holds one JSON array; every
/// save replaces the full array.
pub struct CollectionStore<M: Memory> {
    collections: RefCell<StableBTreeMap<String, String, M>>,
    quota_bytes: Cell<u64>,
}

impl<M: Memory> CollectionStore<M> {
    pub fn init(memory: M, quota_bytes: u64) -> Self {
        Self {
            collections: RefCell::new(StableBTreeMap::init(memory)),
            quota_bytes: Cell::new(quota_bytes),
        }
    }

    /// Returns the persisted list for `key`. Missing or unparsable data is
    /// treated as an empty collection and never reported to the caller.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.collections.borrow().get(&key.to_string()) else {
            return Vec::new();
        };
        match decode_collection(&raw) {
            Ok(records) => records,
            Err(e) => {
                log_warn!("Collection '{}' could not be parsed, treating as empty: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Replaces the entire persisted list for `key`.
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), KeepsakeError> {
        let raw = serde_json::to_string(records)
            .map_err(|e| KeepsakeError::StorageWrite(format!("Failed to encode '{}': {}", key, e)))?;
        let quota = self.quota_bytes.get();
        if raw.len() as u64 > quota {
            return Err(KeepsakeError::StorageWrite(format!(
                "Collection '{}' needs {} bytes, quota is {}",
                key,
                raw.len(),
                quota
            )));
        }
        self.collections.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }

    /// Applies to later saves only; oversized collections already stored are kept.
    pub fn set_quota(&self, quota_bytes: u64) {
        self.quota_bytes.set(quota_bytes);
    }

    /// Stored size of every collection, for metrics.
    pub fn usage(&self) -> Vec<(String, u64)> {
        self.collections
            .borrow()
            .iter()
            .map(|(key, raw)| (key, raw.len() as u64))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, raw: &str) {
        self.collections.borrow_mut().insert(key.to_string(), raw.to_string());
    }
}

pub fn decode_collection<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, KeepsakeError> {
    serde_json::from_str(raw).map_err(|e| KeepsakeError::StorageParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiaryEntry, DIARY_ENTRIES_KEY};
    use ic_stable_structures::DefaultMemoryImpl;

    fn store() -> CollectionStore<DefaultMemoryImpl> {
        CollectionStore::init(DefaultMemoryImpl::default(), 64 * 1024)
    }

    fn entry(id: &str, content: &str) -> DiaryEntry {
        DiaryEntry {
            id: id.into(),
            content: content.into(),
            date: "01.01.2025, 10:00:00".into(),
            created_at_ns: 0,
            is_favorite: false,
        }
    }

    #[test]
    fn missing_key_loads_empty() {
        let loaded: Vec<DiaryEntry> = store().load(DIARY_ENTRIES_KEY);
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let store = store();
        let records = vec![entry("3", "c"), entry("1", "a"), entry("2", "b")];
        store.save(DIARY_ENTRIES_KEY, &records).unwrap();
        let loaded: Vec<DiaryEntry> = store.load(DIARY_ENTRIES_KEY);
        assert_eq!(loaded, records);
    }

    #[test]
    fn corrupt_data_loads_empty() {
        let store = store();
        store.put_raw(DIARY_ENTRIES_KEY, "{not json");
        let loaded: Vec<DiaryEntry> = store.load(DIARY_ENTRIES_KEY);
        assert!(loaded.is_empty());

        store.put_raw(DIARY_ENTRIES_KEY, r#"{"id":"1"}"#);
        let loaded: Vec<DiaryEntry> = store.load(DIARY_ENTRIES_KEY);
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_over_quota_fails_and_keeps_previous_value() {
        let store = CollectionStore::init(DefaultMemoryImpl::default(), 150);
        store.save(DIARY_ENTRIES_KEY, &[entry("1", "short")]).unwrap();

        let big = entry("2", &"x".repeat(200));
        let err = store.save(DIARY_ENTRIES_KEY, &[big]).unwrap_err();
        assert!(matches!(err, KeepsakeError::StorageWrite(_)));

        let loaded: Vec<DiaryEntry> = store.load(DIARY_ENTRIES_KEY);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "1");
    }

    #[test]
    fn keys_are_independent() {
        let store = store();
        store.save("a", &[entry("1", "a")]).unwrap();
        store.save("b", &Vec::<DiaryEntry>::new()).unwrap();
        assert_eq!(store.load::<DiaryEntry>("a").len(), 1);
        assert_eq!(store.usage(), vec![("a".to_string(), 91), ("b".to_string(), 2)]);
    }

    #[test]
    fn raised_quota_admits_larger_collections() {
        let store = CollectionStore::init(DefaultMemoryImpl::default(), 10);
        assert!(store.save("a", &[entry("1", "a")]).is_err());
        store.set_quota(1024);
        assert!(store.save("a", &[entry("1", "a")]).is_ok());
    }
}
