// src/backend/state.rs
// Process-lifetime instances built once per canister instance and handed to the
// endpoints explicitly.

use crate::adapter::SearchClient;
use crate::error::KeepsakeError;
use crate::models::config::AppConfig;
use crate::services::Keepsake;
use crate::storage::memory::{
    get_blob_manifests_memory, get_blob_objects_memory, get_collections_memory,
    get_id_counter_memory, get_sessions_memory,
};
use crate::storage::{get_config, set_config, CollectionStore, IdAllocator, Memory, SessionStore, StableBlobBackend};
use std::cell::RefCell;
use std::rc::Rc;

pub type CanisterKeepsake = Keepsake<Memory, StableBlobBackend<Memory>>;

thread_local! {
    static KEEPSAKE: Rc<CanisterKeepsake> = Rc::new(Keepsake::new(
        CollectionStore::init(get_collections_memory(), get_config().collection_quota_bytes),
        IdAllocator::init(get_id_counter_memory()).expect("Failed to initialize id counter"),
        StableBlobBackend::init(get_blob_objects_memory(), get_blob_manifests_memory()),
        SessionStore::init(get_sessions_memory()),
    ));

    static SEARCH_CLIENT: RefCell<Rc<SearchClient>> =
        RefCell::new(Rc::new(SearchClient::from_config(&get_config())));
}

pub fn keepsake() -> Rc<CanisterKeepsake> {
    KEEPSAKE.with(Rc::clone)
}

pub fn search_client() -> Rc<SearchClient> {
    SEARCH_CLIENT.with(|client| client.borrow().clone())
}

/// Persists `config` and pushes it into the live instances.
pub fn apply_config(config: AppConfig) -> Result<(), KeepsakeError> {
    set_config(config.clone())?;
    keepsake().store.set_quota(config.collection_quota_bytes);
    SEARCH_CLIENT.with(|client| *client.borrow_mut() = Rc::new(SearchClient::from_config(&config)));
    Ok(())
}
