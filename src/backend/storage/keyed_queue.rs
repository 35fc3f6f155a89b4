// src/backend/storage/keyed_queue.rs
use futures::lock::Mutex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

/// Serialises asynchronous read-modify-write sequences per collection key.
/// Operations on different keys still interleave freely.
#[derive(Default)]
pub struct KeyedQueue {
    locks: RefCell<HashMap<String, Rc<Mutex<()>>>>,
}

impl KeyedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, key: &str) -> Rc<Mutex<()>> {
        self.locks
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(|| Rc::new(Mutex::new(())))
            .clone()
    }

    /// Runs `op` once every earlier operation queued on `key` has finished.
    pub async fn run<F, Fut, T>(&self, key: &str, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lock = self.lock_for(key);
        let _turn = lock.lock().await;
        op().await
    }
}
