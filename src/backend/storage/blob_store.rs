// src/backend/storage/blob_store.rs
use crate::error::KeepsakeError;
use crate::storage::keyed_queue::KeyedQueue;
use crate::storage::storable::{decode_cbor, encode_cbor, Cbor};
use ic_stable_structures::{Memory, StableBTreeMap};
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;

/// Asynchronous object store for large payloads. Objects are keyed by record
/// id; each collection keeps a manifest of its ids, newest first.
#[allow(async_fn_in_trait)]
pub trait BlobBackend {
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, KeepsakeError>;

    async fn put(&self, id: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError>;

    async fn delete(&self, id: &str) -> Result<(), KeepsakeError>;

    async fn read_manifest(&self, collection: &str) -> Result<Vec<String>, KeepsakeError>;

    async fn write_manifest(&self, collection: &str, ids: Vec<String>) -> Result<(), KeepsakeError>;
}

/// Stable-memory backend. Every call completes immediately, but callers must
/// not rely on that: other backends suspend between steps.
pub struct StableBlobBackend<M: Memory> {
    objects: RefCell<StableBTreeMap<String, Vec<u8>, M>>,
    manifests: RefCell<StableBTreeMap<String, Cbor<Vec<String>>, M>>,
}

impl<M: Memory> StableBlobBackend<M> {
    pub fn init(objects_memory: M, manifests_memory: M) -> Self {
        Self {
            objects: RefCell::new(StableBTreeMap::init(objects_memory)),
            manifests: RefCell::new(StableBTreeMap::init(manifests_memory)),
        }
    }

    pub fn stored_bytes(&self) -> u64 {
        self.objects
            .borrow()
            .iter()
            .map(|(_, bytes)| bytes.len() as u64)
            .sum()
    }
}

impl<M: Memory> BlobBackend for StableBlobBackend<M> {
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, KeepsakeError> {
        Ok(self.objects.borrow().get(&id.to_string()))
    }

    async fn put(&self, id: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError> {
        self.objects.borrow_mut().insert(id.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), KeepsakeError> {
        self.objects.borrow_mut().remove(&id.to_string());
        Ok(())
    }

    async fn read_manifest(&self, collection: &str) -> Result<Vec<String>, KeepsakeError> {
        Ok(self
            .manifests
            .borrow()
            .get(&collection.to_string())
            .map(|c| c.0)
            .unwrap_or_default())
    }

    async fn write_manifest(&self, collection: &str, ids: Vec<String>) -> Result<(), KeepsakeError> {
        self.manifests.borrow_mut().insert(collection.to_string(), Cbor(ids));
        Ok(())
    }
}

/// Typed collections on top of a [`BlobBackend`]. All writes to one collection
/// go through a per-key queue, so concurrent callers cannot lose updates.
pub struct BinaryStore<B: BlobBackend> {
    backend: B,
    queue: KeyedQueue,
}

impl<B: BlobBackend> BinaryStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, queue: KeyedQueue::new() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Every readable record of `collection` in manifest order. Objects that
    /// are missing or fail to decode are skipped.
    pub async fn load_all<T: DeserializeOwned>(&self, collection: &str) -> Vec<T> {
        let ids = match self.backend.read_manifest(collection).await {
            Ok(ids) => ids,
            Err(e) => {
                log_warn!("Manifest for '{}' unavailable, treating as empty: {}", collection, e);
                return Vec::new();
            }
        };
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get(&id).await {
                records.push(record);
            }
        }
        records
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Option<T> {
        match self.backend.get(id).await {
            Ok(Some(bytes)) => match decode_cbor(&bytes) {
                Ok(record) => Some(record),
                Err(e) => {
                    log_warn!("Object '{}' could not be decoded, skipping: {}", id, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log_warn!("Object '{}' could not be read: {}", id, e);
                None
            }
        }
    }

    /// Stores `record` and puts its id at the front of the manifest.
    pub async fn insert<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        record: &T,
    ) -> Result<(), KeepsakeError> {
        let bytes = encode_cbor(record).map_err(KeepsakeError::Serialization)?;
        self.queue
            .run(collection, || async {
                let mut ids = self.backend.read_manifest(collection).await?;
                self.backend.put(id, bytes).await?;
                ids.retain(|existing| existing != id);
                ids.insert(0, id.to_string());
                self.backend.write_manifest(collection, ids).await
            })
            .await
    }

    /// Applies `update` to the stored record. Returns `None` when the id is not
    /// part of the collection.
    pub async fn update<T, F>(
        &self,
        collection: &str,
        id: &str,
        update: F,
    ) -> Result<Option<T>, KeepsakeError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        self.queue
            .run(collection, || async {
                let Some(mut record) = self.get::<T>(id).await else {
                    return Ok(None);
                };
                update(&mut record);
                let bytes = encode_cbor(&record).map_err(KeepsakeError::Serialization)?;
                self.backend.put(id, bytes).await?;
                Ok(Some(record))
            })
            .await
    }

    /// Removes the record and its manifest entry. Returns whether it existed.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<bool, KeepsakeError> {
        self.queue
            .run(collection, || async {
                let mut ids = self.backend.read_manifest(collection).await?;
                let before = ids.len();
                ids.retain(|existing| existing != id);
                let existed = ids.len() != before;
                self.backend.delete(id).await?;
                if existed {
                    self.backend.write_manifest(collection, ids).await?;
                }
                Ok(existed)
            })
            .await
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::storage::keyed_queue::test_util::yield_now;
    use ic_stable_structures::DefaultMemoryImpl;

    /// Stable backend that suspends before every step, like a browser object store.
    pub struct SlowBackend(pub StableBlobBackend<DefaultMemoryImpl>);

    impl SlowBackend {
        pub fn new() -> Self {
            SlowBackend(StableBlobBackend::init(
                DefaultMemoryImpl::default(),
                DefaultMemoryImpl::default(),
            ))
        }
    }

    impl BlobBackend for SlowBackend {
        async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, KeepsakeError> {
            yield_now().await;
            self.0.get(id).await
        }

        async fn put(&self, id: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError> {
            yield_now().await;
            self.0.put(id, bytes).await
        }

        async fn delete(&self, id: &str) -> Result<(), KeepsakeError> {
            yield_now().await;
            self.0.delete(id).await
        }

        async fn read_manifest(&self, collection: &str) -> Result<Vec<String>, KeepsakeError> {
            yield_now().await;
            self.0.read_manifest(collection).await
        }

        async fn write_manifest(&self, collection: &str, ids: Vec<String>) -> Result<(), KeepsakeError> {
            yield_now().await;
            self.0.write_manifest(collection, ids).await
        }
    }
}
