// src/backend/adapter/search_adapter.rs
use crate::error::KeepsakeError;
use crate::models::config::AppConfig;
use crate::models::search::VideoSearchHit;
use ic_cdk::api::management_canister::http_request::{
    http_request, CanisterHttpRequestArgument, HttpHeader, HttpMethod, HttpResponse,
    TransformContext,
};
use num::ToPrimitive;
use serde::Deserialize;
use url::Url;

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Name of the query method that strips volatile headers from outcall responses.
pub const TRANSFORM_METHOD: &str = "transform_search_response";

const HTTP_OUTCALL_CYCLES: u128 = 2_000_000_000;
const MAX_RESPONSE_BYTES: u64 = 256 * 1024;

/// Credentials and limits for the third-party search APIs. Rebuilt whenever the
/// configuration changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchClient {
    youtube_api_key: Option<String>,
    google_api_key: Option<String>,
    google_search_engine_id: Option<String>,
    max_video_results: u32,
}

impl SearchClient {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            youtube_api_key: config.youtube_api_key.clone(),
            google_api_key: config.google_api_key.clone(),
            google_search_engine_id: config.google_search_engine_id.clone(),
            max_video_results: config.max_video_results,
        }
    }

    pub fn build_video_search_url(&self, query: &str) -> Result<String, KeepsakeError> {
        let query = non_blank_query(query)?;
        let key = self
            .youtube_api_key
            .as_deref()
            .ok_or_else(|| KeepsakeError::Configuration("YouTube API key is not set".to_string()))?;
        let max_results = self.max_video_results.to_string();
        build_url(
            YOUTUBE_SEARCH_URL,
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("key", key),
            ],
        )
    }

    pub fn build_web_search_url(&self, query: &str) -> Result<String, KeepsakeError> {
        let query = non_blank_query(query)?;
        let (Some(key), Some(cx)) = (
            self.google_api_key.as_deref(),
            self.google_search_engine_id.as_deref(),
        ) else {
            return Err(KeepsakeError::Configuration(
                "Google API key and search engine id are required".to_string(),
            ));
        };
        build_url(CUSTOM_SEARCH_URL, &[("key", key), ("cx", cx), ("q", query)])
    }

    /// Searches YouTube and returns the normalised hits.
    pub async fn search_videos(&self, query: &str) -> Result<Vec<VideoSearchHit>, KeepsakeError> {
        let url = self.build_video_search_url(query)?;
        log_info!("🔗 Video search for '{}'", query.trim());
        let (status, body) = fetch(url).await?;
        parse_video_search_response(status, &body)
    }

    /// Runs a Google Custom Search and returns the upstream JSON verbatim.
    pub async fn web_search(&self, query: &str) -> Result<String, KeepsakeError> {
        let url = self.build_web_search_url(query)?;
        log_info!("🔗 Web search for '{}'", query.trim());
        let (status, body) = fetch(url).await?;
        check_web_search_response(status, body)
    }
}

fn non_blank_query(query: &str) -> Result<&str, KeepsakeError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(KeepsakeError::InvalidInput("Search query must not be empty".to_string()));
    }
    Ok(query)
}

fn build_url(base: &str, params: &[(&str, &str)]) -> Result<String, KeepsakeError> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| KeepsakeError::Internal(format!("Invalid search URL: {}", e)))
}

async fn fetch(url: String) -> Result<(u16, Vec<u8>), KeepsakeError> {
    let request = CanisterHttpRequestArgument {
        url,
        method: HttpMethod::GET,
        body: None,
        max_response_bytes: Some(MAX_RESPONSE_BYTES),
        transform: Some(TransformContext::from_name(TRANSFORM_METHOD.to_string(), vec![])),
        headers: vec![HttpHeader {
            name: "Accept".to_string(),
            value: "application/json".to_string(),
        }],
    };

    match http_request(request, HTTP_OUTCALL_CYCLES).await {
        Ok((response,)) => {
            let status = response.status.0.to_u16().unwrap_or(u16::MAX);
            log_info!("🔗 Search API answered with status {}", status);
            Ok((status, response.body))
        }
        Err((code, msg)) => {
            log_error!("🔗 Search outcall failed: {:?} - {}", code, msg);
            Err(KeepsakeError::Upstream(format!("Outcall failed: {:?} - {}", code, msg)))
        }
    }
}

/// Keeps only status and body so replicas agree on the response.
pub fn strip_headers(response: HttpResponse) -> HttpResponse {
    HttpResponse { status: response.status, headers: vec![], body: response.body }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[derive(Deserialize)]
struct YoutubeSearchResponse {
    #[serde(default)]
    items: Vec<YoutubeItem>,
}

#[derive(Deserialize)]
struct YoutubeItem {
    id: YoutubeItemId,
    snippet: YoutubeSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct YoutubeItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct YoutubeSnippet {
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: YoutubeThumbnails,
}

#[derive(Deserialize, Default)]
struct YoutubeThumbnails {
    medium: Option<YoutubeThumbnail>,
    default: Option<YoutubeThumbnail>,
}

#[derive(Deserialize)]
struct YoutubeThumbnail {
    url: String,
}

pub fn parse_video_search_response(
    status: u16,
    body: &[u8],
) -> Result<Vec<VideoSearchHit>, KeepsakeError> {
    if !is_success(status) {
        return Err(KeepsakeError::Upstream(format!("Video search returned status {}", status)));
    }
    let parsed: YoutubeSearchResponse = serde_json::from_slice(body)
        .map_err(|e| KeepsakeError::Serialization(format!("Unexpected video search payload: {}", e)))?;

    let hits: Vec<VideoSearchHit> = parsed
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            let thumbnails = item.snippet.thumbnails;
            let thumbnail_url = thumbnails
                .medium
                .or(thumbnails.default)
                .map(|t| t.url)
                .unwrap_or_default();
            Some(VideoSearchHit {
                id,
                title: item.snippet.title,
                thumbnail_url,
                channel: item.snippet.channel_title,
            })
        })
        .collect();

    if hits.is_empty() {
        return Err(KeepsakeError::Upstream("No videos found".to_string()));
    }
    Ok(hits)
}

pub fn check_web_search_response(status: u16, body: Vec<u8>) -> Result<String, KeepsakeError> {
    if !is_success(status) {
        return Err(KeepsakeError::Upstream(format!(
            "Failed to get results from Google (status {})",
            status
        )));
    }
    String::from_utf8(body)
        .map_err(|e| KeepsakeError::Serialization(format!("Web search body is not UTF-8: {}", e)))
}
