//! Video search against the YouTube Data API v3.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of results when the caller does not narrow the search.
/// The orchestrator overrides this to 1 per lesson.
pub const DEFAULT_MAX_RESULTS: u32 = 5;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Normalized video record, fields taken verbatim from the search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub title: String,
    pub video_id: String,
    pub url: String,
    pub channel: String,
    pub published_at: String,
}

/// Trait for video search backends
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<VideoRecord>>;
}

/// YouTube Data API client
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        // No request timeout: a slow search call delays the whole response.
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<VideoRecord>> {
        debug!("Searching videos for query: {}", query);

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .query(&[("maxResults", max_results)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("YouTube API error {}: {}", status, text));
        }

        let search: SearchResponse = response.json().await?;
        Ok(to_records(search))
    }
}

/// Map raw search items to video records. Items without a video id (the API
/// only returns those for non-video result types) are dropped; no filtering,
/// scoring, or deduplication beyond that.
fn to_records(response: SearchResponse) -> Vec<VideoRecord> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            Some(VideoRecord {
                title: item.snippet.title,
                url: format!("https://www.youtube.com/watch?v={}", video_id),
                channel: item.snippet.channel_title,
                published_at: item.snippet.published_at,
                video_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
      "items": [
        {
          "id": {"kind": "youtube#video", "videoId": "abc123"},
          "snippet": {
            "title": "Rust basics in 10 minutes",
            "channelTitle": "RustChannel",
            "publishedAt": "2024-05-01T12:00:00Z"
          }
        },
        {
          "id": {"kind": "youtube#channel"},
          "snippet": {
            "title": "A channel, not a video",
            "channelTitle": "Someone",
            "publishedAt": "2023-01-01T00:00:00Z"
          }
        }
      ]
    }"#;

    #[test]
    fn test_to_records_maps_snippet_fields() {
        let response: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();
        let records = to_records(response);

        assert_eq!(
            records,
            vec![VideoRecord {
                title: "Rust basics in 10 minutes".to_string(),
                video_id: "abc123".to_string(),
                url: "https://www.youtube.com/watch?v=abc123".to_string(),
                channel: "RustChannel".to_string(),
                published_at: "2024-05-01T12:00:00Z".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_response_yields_empty_sequence() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(to_records(response).is_empty());
    }
}
