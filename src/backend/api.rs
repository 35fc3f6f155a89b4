// src/backend/api.rs
// Candid endpoints. Memory endpoints sit behind the session guard; search
// proxies additionally pass the rate limiter and the cycle check.

use crate::{
    adapter::search_adapter::strip_headers,
    error::KeepsakeError,
    metrics::{self, MetricsReport},
    models::config::{AppConfig, ConfigSummary},
    models::init::InitArgs,
    models::search::{SearchQuery, VideoSearchHit},
    models::{
        DiaryEntry, EntityKind, Letter, MemorySummary, NewDiaryEntry, NewLetter, NewPhoto,
        NewVideo, Photo, RecordId, Video,
    },
    services::auth_service::{self, SessionInfo},
    state,
    storage::{get_config, get_metrics as get_stored_metrics},
    utils::guards::{admin_guard, check_admin, check_cycles, session_guard},
    utils::rate_limit::rate_guard,
    utils::time::get_current_time_ns,
};
use candid::CandidType;
use ic_cdk::api::canister_balance128;
use ic_cdk::api::management_canister::http_request::{HttpResponse, TransformArgs};
use ic_cdk_macros::{query, update};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// --- Validation Helper ---
fn validate_request<T: Validate>(req: &T) -> Result<(), KeepsakeError> {
    req.validate().map_err(|e| KeepsakeError::InvalidInput(e.to_string()))
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn proxy_guard() -> Result<(), String> {
    session_guard()?;
    rate_guard()
}

// --- Request Structs ---

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Validate)]
pub struct PhotoUpload {
    #[validate(length(min = 1, max = 1_500_000))]
    pub url: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddPhotosRequest {
    #[validate(length(min = 1, max = 50))]
    pub photos: Vec<PhotoUpload>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddVideoRequest {
    #[validate(length(min = 1, max = 1_500_000))]
    pub url: String,
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub media_type: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddDiaryEntryRequest {
    #[validate(custom(function = "not_blank"), length(max = 100_000))]
    pub content: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddLetterRequest {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub title: String,
    #[validate(custom(function = "not_blank"), length(max = 100_000))]
    pub content: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct MemoryRef {
    pub kind: EntityKind,
    #[validate(length(min = 1, max = 40))]
    pub id: RecordId,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct UpdateVideoTimeRequest {
    #[validate(length(min = 1, max = 40))]
    pub id: RecordId,
    #[validate(range(min = 0.0))]
    pub seconds: f64,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SearchMemoriesRequest {
    #[validate(length(max = 500))]
    pub query: String,
    pub kinds: Vec<EntityKind>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ExternalSearchRequest {
    #[validate(custom(function = "not_blank"), length(max = 500))]
    pub query: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 256))]
    pub passphrase: String,
}

// --- Photos ---

#[query(guard = "session_guard")]
fn list_photos() -> Vec<Photo> {
    state::keepsake().photos.list()
}

#[update(guard = "session_guard")]
fn add_photos(req: AddPhotosRequest) -> Result<Vec<Photo>, KeepsakeError> {
    validate_request(&req)?;
    for upload in &req.photos {
        validate_request(upload)?;
    }
    let drafts = req
        .photos
        .into_iter()
        .map(|p| NewPhoto { url: p.url, file_name: p.file_name })
        .collect();
    let added = state::keepsake().photos.add_many(drafts)?;
    metrics::record_created(added.len() as u64);
    Ok(added)
}

// --- Videos ---

#[query(guard = "session_guard")]
async fn list_videos() -> Vec<Video> {
    state::keepsake().list_videos().await
}

#[update(guard = "session_guard")]
async fn add_video(req: AddVideoRequest) -> Result<Video, KeepsakeError> {
    validate_request(&req)?;
    let draft = NewVideo { url: req.url, title: req.title.trim().to_string(), media_type: req.media_type };
    let video = state::keepsake().videos.add(draft).await?;
    metrics::record_created(1);
    Ok(video)
}

#[update(guard = "session_guard")]
async fn update_video_time(req: UpdateVideoTimeRequest) -> Result<Video, KeepsakeError> {
    validate_request(&req)?;
    state::keepsake()
        .videos
        .update_playback_position(&req.id, req.seconds)
        .await
}

// --- Diary ---

#[query(guard = "session_guard")]
fn list_diary_entries() -> Vec<DiaryEntry> {
    state::keepsake().diary.list()
}

#[update(guard = "session_guard")]
fn add_diary_entry(req: AddDiaryEntryRequest) -> Result<DiaryEntry, KeepsakeError> {
    validate_request(&req)?;
    let entry = state::keepsake().diary.add(NewDiaryEntry { content: req.content })?;
    metrics::record_created(1);
    Ok(entry)
}

// --- Letters ---

#[query(guard = "session_guard")]
fn list_letters() -> Vec<Letter> {
    state::keepsake().letters.list()
}

#[update(guard = "session_guard")]
fn add_letter(req: AddLetterRequest) -> Result<Letter, KeepsakeError> {
    validate_request(&req)?;
    let letter = state::keepsake().letters.add(NewLetter {
        title: req.title.trim().to_string(),
        content: req.content,
    })?;
    metrics::record_created(1);
    Ok(letter)
}

// --- Any kind ---

/// Deletes a memory of any kind. Unknown ids return `false`.
#[update(guard = "session_guard")]
async fn remove_memory(req: MemoryRef) -> Result<bool, KeepsakeError> {
    validate_request(&req)?;
    let removed = state::keepsake().remove(req.kind, &req.id).await;
    if removed {
        metrics::record_deleted();
    }
    Ok(removed)
}

#[update(guard = "session_guard")]
async fn toggle_favorite(req: MemoryRef) -> Result<MemorySummary, KeepsakeError> {
    validate_request(&req)?;
    let summary = state::keepsake().toggle_favorite(req.kind, &req.id).await?;
    metrics::favorite_toggled();
    Ok(summary)
}

// --- Favorites ---

#[query(guard = "session_guard")]
async fn list_favorites(kind: Option<EntityKind>) -> Vec<MemorySummary> {
    state::keepsake().list_favorites(kind).await
}

#[update(guard = "session_guard")]
fn remove_favorite(req: MemoryRef) -> Result<bool, KeepsakeError> {
    validate_request(&req)?;
    Ok(state::keepsake().remove_favorite(req.kind, &req.id))
}

// --- Search ---

#[query(guard = "session_guard")]
async fn search_memories(req: SearchMemoriesRequest) -> Result<Vec<MemorySummary>, KeepsakeError> {
    validate_request(&req)?;
    let query = SearchQuery { text: req.query, kinds: req.kinds };
    Ok(state::keepsake().search(&query).await)
}

#[update(guard = "proxy_guard")]
async fn search_videos(req: ExternalSearchRequest) -> Result<Vec<VideoSearchHit>, KeepsakeError> {
    validate_request(&req)?;
    check_cycles()?;
    let client = state::search_client();
    let result = client.search_videos(&req.query).await;
    metrics::proxy_call(result.is_ok());
    result
}

#[update(guard = "proxy_guard")]
async fn web_search(req: ExternalSearchRequest) -> Result<String, KeepsakeError> {
    validate_request(&req)?;
    check_cycles()?;
    let client = state::search_client();
    let result = client.web_search(&req.query).await;
    metrics::proxy_call(result.is_ok());
    result
}

#[query]
fn transform_search_response(args: TransformArgs) -> HttpResponse {
    strip_headers(args.response)
}

// --- Session ---

#[update]
fn login(req: LoginRequest) -> Result<SessionInfo, KeepsakeError> {
    validate_request(&req)?;
    let keepsake = state::keepsake();
    auth_service::login(
        &keepsake.sessions,
        &get_config(),
        ic_cdk::caller(),
        &req.passphrase,
        get_current_time_ns(),
    )
}

#[update]
fn logout() -> bool {
    auth_service::logout(&state::keepsake().sessions, ic_cdk::caller())
}

#[query]
fn session_status() -> SessionInfo {
    auth_service::status(
        &state::keepsake().sessions,
        &get_config(),
        ic_cdk::caller(),
        get_current_time_ns(),
    )
}

// --- Admin ---

#[query(guard = "admin_guard")]
fn get_metrics() -> MetricsReport {
    let keepsake = state::keepsake();
    MetricsReport {
        counters: get_stored_metrics(),
        collection_bytes: keepsake.store.usage(),
        blob_bytes: keepsake.videos.backend().stored_bytes(),
        open_sessions: keepsake.sessions.len(),
        cycle_balance: canister_balance128(),
    }
}

#[query(guard = "admin_guard")]
fn get_config_summary() -> ConfigSummary {
    ConfigSummary::from(&get_config())
}

/// Replaces the configuration. The admin principal in `args` takes effect immediately.
#[update]
fn update_config(args: InitArgs) -> Result<ConfigSummary, KeepsakeError> {
    check_admin(ic_cdk::caller(), get_config().admin)?;
    let config = AppConfig::from(args);
    state::apply_config(config.clone())?;
    log_info!("Configuration updated by admin");
    Ok(ConfigSummary::from(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_diary_content_is_rejected() {
        let req = AddDiaryEntryRequest { content: " \n ".into() };
        assert!(matches!(validate_request(&req), Err(KeepsakeError::InvalidInput(_))));
        assert!(validate_request(&AddDiaryEntryRequest { content: "today".into() }).is_ok());
    }

    #[test]
    fn letters_need_title_and_content() {
        let req = AddLetterRequest { title: "to you".into(), content: "".into() };
        assert!(validate_request(&req).is_err());
        let req = AddLetterRequest { title: "".into(), content: "hello".into() };
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn photo_batches_are_bounded() {
        assert!(validate_request(&AddPhotosRequest { photos: vec![] }).is_err());
        let upload = PhotoUpload { url: "data:x".into(), file_name: "a.png".into() };
        assert!(validate_request(&AddPhotosRequest { photos: vec![upload.clone()] }).is_ok());
        assert!(validate_request(&AddPhotosRequest { photos: vec![upload; 51] }).is_err());
    }

    #[test]
    fn negative_playback_position_is_rejected() {
        let req = UpdateVideoTimeRequest { id: "3".into(), seconds: -2.0 };
        assert!(validate_request(&req).is_err());
    }
}
