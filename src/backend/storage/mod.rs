// src/backend/storage/mod.rs
// Stable memory layout and the persistence primitives built on ic-stable-structures.

pub mod blob_store;
pub mod collection_store;
pub mod config;
pub mod ids;
pub mod keyed_queue;
pub mod memory;
pub mod metrics;
pub mod sessions;
pub mod storable;

pub use blob_store::{BinaryStore, BlobBackend, StableBlobBackend};
pub use collection_store::CollectionStore;
pub use config::{get_config, set_config};
pub use ids::IdAllocator;
pub use keyed_queue::KeyedQueue;
pub use memory::Memory;
pub use metrics::{get_metrics, update_metrics};
pub use sessions::SessionStore;
pub use storable::Cbor;
