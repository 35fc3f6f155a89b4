// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// Memory IDs for stable structures. Never reuse or renumber an ID once deployed.
const COLLECTIONS_MEM_ID: MemoryId = MemoryId::new(0);
const BLOB_OBJECTS_MEM_ID: MemoryId = MemoryId::new(1);
const BLOB_MANIFESTS_MEM_ID: MemoryId = MemoryId::new(2);
const ID_COUNTER_MEM_ID: MemoryId = MemoryId::new(3);
const CONFIG_MEM_ID: MemoryId = MemoryId::new(4);
const SESSIONS_MEM_ID: MemoryId = MemoryId::new(5);
const METRICS_MEM_ID: MemoryId = MemoryId::new(6);

// Define memory type alias
pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> = RefCell::new(
        MemoryManager::init(DefaultMemoryImpl::default())
    );
}

/// Get memory instance for a specific MemoryId.
pub fn get_memory(id: MemoryId) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(id))
}

pub fn get_collections_memory() -> Memory {
    get_memory(COLLECTIONS_MEM_ID)
}

pub fn get_blob_objects_memory() -> Memory {
    get_memory(BLOB_OBJECTS_MEM_ID)
}

pub fn get_blob_manifests_memory() -> Memory {
    get_memory(BLOB_MANIFESTS_MEM_ID)
}

pub fn get_id_counter_memory() -> Memory {
    get_memory(ID_COUNTER_MEM_ID)
}

pub fn get_config_memory() -> Memory {
    get_memory(CONFIG_MEM_ID)
}

pub fn get_sessions_memory() -> Memory {
    get_memory(SESSIONS_MEM_ID)
}

pub fn get_metrics_memory() -> Memory {
    get_memory(METRICS_MEM_ID)
}
