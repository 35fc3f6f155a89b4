// src/backend/adapter/mod.rs
pub mod search_adapter;

pub use search_adapter::SearchClient;
