// src/backend/services/mod.rs
pub mod auth_service;
pub mod favorites_service;
pub mod keepsake;
pub mod reply_budget;
pub mod repository;
pub mod scheduler;
pub mod search_service;
pub mod video_service;

pub use keepsake::Keepsake;
