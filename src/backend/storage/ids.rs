// src/backend/storage/ids.rs
use crate::error::KeepsakeError;
use crate::models::common::RecordId;
use ic_stable_structures::{Memory, StableCell};
use std::cell::RefCell;

/// Monotonic id source shared by every collection. Survives upgrades, so ids
/// are never reused even after records are deleted.
pub struct IdAllocator<M: Memory> {
    counter: RefCell<StableCell<u64, M>>,
}

impl<M: Memory> IdAllocator<M> {
    pub fn init(memory: M) -> Result<Self, KeepsakeError> {
        let cell = StableCell::init(memory, 1)
            .map_err(|e| KeepsakeError::Internal(format!("Failed to initialize id counter: {:?}", e)))?;
        Ok(Self { counter: RefCell::new(cell) })
    }

    /// Returns the next id and advances the counter.
    pub fn next_id(&self) -> Result<RecordId, KeepsakeError> {
        let mut cell = self.counter.borrow_mut();
        let current = *cell.get();
        let next = current
            .checked_add(1)
            .ok_or_else(|| KeepsakeError::Internal("Id counter overflow".to_string()))?;
        cell.set(next)
            .map_err(|e| KeepsakeError::StorageWrite(format!("Failed to update id counter: {:?}", e)))?;
        Ok(current.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_under_rapid_creation() {
        let ids = IdAllocator::init(DefaultMemoryImpl::default()).unwrap();
        let issued: HashSet<_> = (0..1_000).map(|_| ids.next_id().unwrap()).collect();
        assert_eq!(issued.len(), 1_000);
    }

    #[test]
    fn counter_resumes_from_stable_memory() {
        let memory = DefaultMemoryImpl::default();
        let first = IdAllocator::init(memory.clone()).unwrap();
        assert_eq!(first.next_id().unwrap(), "1");
        assert_eq!(first.next_id().unwrap(), "2");
        drop(first);

        let reopened = IdAllocator::init(memory).unwrap();
        assert_eq!(reopened.next_id().unwrap(), "3");
    }
}
