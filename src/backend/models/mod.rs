pub mod common;
pub mod config;
pub mod diary_entry;
pub mod favorite;
pub mod init;
pub mod letter;
pub mod photo;
pub mod record;
pub mod search;
pub mod video;

// Re-export common types/enums for easier access
pub use common::*;
pub use diary_entry::{DiaryEntry, NewDiaryEntry};
pub use favorite::{FavoriteEntry, FavoriteKey};
pub use letter::{Letter, NewLetter};
pub use photo::{NewPhoto, Photo};
pub use record::{MemorySummary, Record};
pub use video::{NewVideo, Video};
