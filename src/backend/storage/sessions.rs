// src/backend/storage/sessions.rs
use crate::models::common::TimestampNs;
use candid::Principal;
use ic_stable_structures::{Memory, StableBTreeMap};
use std::cell::RefCell;

type PrincipalBytes = Vec<u8>;

/// Open sessions of the soft access gate: caller principal → expiry time.
pub struct SessionStore<M: Memory> {
    sessions: RefCell<StableBTreeMap<PrincipalBytes, TimestampNs, M>>,
}

impl<M: Memory> SessionStore<M> {
    pub fn init(memory: M) -> Self {
        Self { sessions: RefCell::new(StableBTreeMap::init(memory)) }
    }

    pub fn open(&self, principal: Principal, expires_at: TimestampNs) {
        self.sessions
            .borrow_mut()
            .insert(principal.as_slice().to_vec(), expires_at);
    }

    /// Returns true if a session was open.
    pub fn close(&self, principal: Principal) -> bool {
        self.sessions
            .borrow_mut()
            .remove(&principal.as_slice().to_vec())
            .is_some()
    }

    pub fn expiry(&self, principal: Principal, now: TimestampNs) -> Option<TimestampNs> {
        self.sessions
            .borrow()
            .get(&principal.as_slice().to_vec())
            .filter(|expires_at| *expires_at > now)
    }

    /// Drops every session that expired at or before `now`. Returns how many were dropped.
    pub fn purge_expired(&self, now: TimestampNs) -> usize {
        let expired: Vec<PrincipalBytes> = self
            .sessions
            .borrow()
            .iter()
            .filter(|(_, expires_at)| *expires_at <= now)
            .map(|(key, _)| key)
            .collect();
        let mut sessions = self.sessions.borrow_mut();
        for key in &expired {
            sessions.remove(key);
        }
        expired.len()
    }

    pub fn len(&self) -> u64 {
        self.sessions.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;

    fn principal(n: u8) -> Principal {
        Principal::from_slice(&[n; 10])
    }

    #[test]
    fn session_is_active_until_expiry() {
        let store = SessionStore::init(DefaultMemoryImpl::default());
        store.open(principal(1), 100);
        assert_eq!(store.expiry(principal(1), 99), Some(100));
        assert_eq!(store.expiry(principal(1), 100), None);
        assert_eq!(store.expiry(principal(2), 0), None);
    }

    #[test]
    fn purge_drops_only_expired_sessions() {
        let store = SessionStore::init(DefaultMemoryImpl::default());
        store.open(principal(1), 10);
        store.open(principal(2), 50);
        assert_eq!(store.purge_expired(20), 1);
        assert_eq!(store.len(), 1);
        assert!(store.close(principal(2)));
        assert!(!store.close(principal(2)));
    }
}
