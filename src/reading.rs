//! Best-effort reading-content lookup: web search, fetch, readability
//! extraction. Not used by the primary course flow; failures degrade to an
//! empty result instead of erroring.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Appended to every query to bias results towards written material.
const QUERY_BIAS: &str = "article tutorial research paper";

/// A candidate is skipped unless its title or snippet mentions one of these.
const RELEVANCE_KEYWORDS: &[&str] = &["tutorial", "guide", "research", "paper"];

/// Extracted content below this many characters is considered junk.
const MIN_CONTENT_CHARS: usize = 100;

/// Selectors tried in order when isolating the main article text.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "#content",
    ".post-content",
    ".entry-content",
    "body",
];

/// One piece of reading material with its extracted main content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingItem {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub content: String,
}

/// Google Custom Search client with per-page content extraction.
pub struct ReadingContentFinder {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    result_count: u32,
    fetch_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    link: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

impl ReadingContentFinder {
    pub fn new(
        api_key: String,
        engine_id: String,
        result_count: u32,
        fetch_timeout_seconds: u64,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            engine_id,
            result_count,
            fetch_timeout: Duration::from_secs(fetch_timeout_seconds),
        }
    }

    /// Search for reading content relevant to the query.
    ///
    /// Per-item fetch or extraction failures are logged and skipped; a failed
    /// search call yields an empty sequence.
    pub async fn fetch_reading_content(&self, query: &str) -> Vec<ReadingItem> {
        let candidates = match self.search(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Failed to fetch reading content for query {}: {}", query, e);
                return Vec::new();
            }
        };

        let mut reading = Vec::new();
        for item in candidates {
            let url = match item.link {
                Some(url) => url,
                None => continue,
            };

            if !is_relevant(&item.title, &item.snippet) {
                debug!("Skipping irrelevant result: {}", url);
                continue;
            }

            match self.fetch_and_extract(&url).await {
                Ok(Some((page_title, content))) => {
                    let title = if page_title.is_empty() {
                        item.title
                    } else {
                        page_title
                    };
                    reading.push(ReadingItem {
                        title,
                        url,
                        snippet: item.snippet,
                        content,
                    });
                }
                Ok(None) => debug!("Discarded thin or error-page content from {}", url),
                Err(e) => warn!("Error processing reading content from {}: {}", url, e),
            }
        }

        if reading.is_empty() {
            info!("No relevant reading content found for query: {}", query);
        }

        reading
    }

    async fn search(&self, query: &str) -> Result<Vec<CseItem>> {
        let search_query = format!("{} {}", query, QUERY_BIAS);

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", search_query.as_str()),
            ])
            .query(&[("num", self.result_count)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Web search API error {}: {}", status, text));
        }

        let cse: CseResponse = response.json().await?;
        Ok(cse.items)
    }

    /// Fetch a candidate page and extract its main content.
    ///
    /// Returns `Ok(None)` when the page loads but its content fails the
    /// acceptance checks. This is the only call in the system with an
    /// explicit request timeout.
    async fn fetch_and_extract(&self, url: &str) -> Result<Option<(String, String)>> {
        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let (title, content) = extract_main_content(&body);

        if !is_acceptable(&content) {
            return Ok(None);
        }

        Ok(Some((title, content)))
    }
}

fn is_relevant(title: &str, snippet: &str) -> bool {
    let title = title.to_lowercase();
    let snippet = snippet.to_lowercase();
    RELEVANCE_KEYWORDS
        .iter()
        .any(|keyword| title.contains(keyword) || snippet.contains(keyword))
}

/// Empty-ish pages and error pages masquerading as content are discarded.
fn is_acceptable(content: &str) -> bool {
    content.trim().chars().count() >= MIN_CONTENT_CHARS
        && !content.to_lowercase().contains("error")
}

/// Readability heuristic: take the text of the first content-bearing element,
/// preferring semantic containers over the raw body, and collapse whitespace.
fn extract_main_content(html: &str) -> (String, String) {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default();

    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = element.text().collect::<Vec<_>>().join(" ");
                let content = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !content.is_empty() {
                    return (title, content);
                }
            }
        }
    }

    (title, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_filter() {
        assert!(is_relevant("A Rust tutorial", ""));
        assert!(is_relevant("", "step-by-step guide to ownership"));
        assert!(is_relevant("Research Paper on Borrow Checking", ""));
        assert!(!is_relevant("Buy rust remover now", "great deals"));
    }

    #[test]
    fn test_acceptance_rejects_short_content() {
        assert!(!is_acceptable("too short"));
        assert!(is_acceptable(&"long enough content ".repeat(10)));
    }

    #[test]
    fn test_acceptance_rejects_error_pages() {
        let page = format!("{} Error 404: page not found", "padding ".repeat(20));
        assert!(!is_acceptable(&page));
    }

    #[test]
    fn test_extract_prefers_article_over_navigation() {
        let html = r#"
            <html>
              <head><title>Ownership explained</title></head>
              <body>
                <nav>Home About Contact</nav>
                <article>Ownership is Rust's most distinctive feature.</article>
              </body>
            </html>
        "#;
        let (title, content) = extract_main_content(html);
        assert_eq!(title, "Ownership explained");
        assert_eq!(content, "Ownership is Rust's most distinctive feature.");
    }

    #[test]
    fn test_extract_falls_back_to_body() {
        let html = "<html><body><p>Just a paragraph,  with   spaces.</p></body></html>";
        let (title, content) = extract_main_content(html);
        assert!(title.is_empty());
        assert_eq!(content, "Just a paragraph, with spaces.");
    }
}
