//! Web search and page fetch backend.
//!
//! [`SearchTool`] abstracts the search engine so the pipeline can be
//! tested against mocks. The production implementation,
//! [`HttpSearchTool`], talks to a SearxNG instance over its JSON API
//! and fetches pages with a plain HTTP client, reducing HTML to
//! readable text.

pub mod executor;

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AgentError;

/// A single ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result URL.
    pub url: String,
    /// Result title.
    pub title: String,
    /// Short excerpt from the result page.
    pub snippet: String,
}

/// Trait for search engine backends.
///
/// Implementations handle the transport to a concrete engine while
/// presenting a uniform interface to the tool executor.
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Searches the web, returning up to `max_results` ranked hits.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SearchTool`] on transport or decode failures.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AgentError>;

    /// Fetches a page and returns its readable text content.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SearchTool`] on transport failures or
    /// non-success HTTP status.
    async fn fetch(&self, url: &str) -> Result<String, AgentError>;
}

/// Returns `true` if the URL uses the http or https scheme.
///
/// Tool-facing guard: models occasionally hallucinate `file://` or
/// bare-path URLs, which must never reach the HTTP client.
#[must_use]
pub fn valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Upper bound on fetched page text returned to the model.
const MAX_PAGE_TEXT: usize = 20_000;

/// One result object in a SearxNG JSON response.
#[derive(Debug, Deserialize)]
struct SearxResult {
    url: String,
    title: String,
    #[serde(default)]
    content: String,
}

/// SearxNG JSON response envelope.
#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

/// Search backend using a SearxNG instance's JSON API.
#[derive(Debug, Clone)]
pub struct HttpSearchTool {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchTool {
    /// Creates a search tool against the given SearxNG base URL
    /// (e.g. `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SearchTool`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("websearch-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AgentError::SearchTool {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchTool for HttpSearchTool {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AgentError> {
        let url = format!("{}/search", self.base_url);
        debug!(query, max_results, "searching");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| AgentError::SearchTool {
                message: format!("search request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::SearchTool {
                message: format!("search engine returned HTTP {status}"),
            });
        }

        let body: SearxResponse = response.json().await.map_err(|e| AgentError::SearchTool {
            message: format!("failed to decode search response: {e}"),
        })?;

        Ok(body
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                snippet: r.content,
            })
            .collect())
    }

    async fn fetch(&self, url: &str) -> Result<String, AgentError> {
        if !valid_http_url(url) {
            return Err(AgentError::SearchTool {
                message: format!("invalid URL scheme (expected http or https): {url}"),
            });
        }
        debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AgentError::SearchTool {
                message: format!("fetch failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::SearchTool {
                message: format!("fetch returned HTTP {status} for {url}"),
            });
        }

        let html = response.text().await.map_err(|e| AgentError::SearchTool {
            message: format!("failed to read page body: {e}"),
        })?;

        let mut text = html_to_text(&html);
        if text.len() > MAX_PAGE_TEXT {
            let cut = truncation_boundary(&text, MAX_PAGE_TEXT);
            text.truncate(cut);
            text.push_str("\n[truncated]");
        }
        Ok(text)
    }
}

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)>")
        .unwrap_or_else(|_| unreachable!())
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap_or_else(|_| unreachable!()));
static BLANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap_or_else(|_| unreachable!()));

/// Reduces an HTML document to readable plain text.
///
/// Drops script/style/noscript blocks, strips tags, decodes the common
/// entities, and squeezes runs of blank lines.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_scripts, "\n");
    let decoded = html_decode(&without_tags);

    // Trim each line, drop empties down to at most one blank separator
    let trimmed: String = decoded
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_RE.replace_all(&trimmed, "\n\n").trim().to_string()
}

/// Basic HTML entity decoding.
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Largest index `<= max` that falls on a UTF-8 character boundary.
fn truncation_boundary(s: &str, max: usize) -> usize {
    let mut cut = max.min(s.len());
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_http_url() {
        assert!(valid_http_url("http://example.com"));
        assert!(valid_http_url("https://example.com/page?q=1"));
        assert!(!valid_http_url("ftp://example.com"));
        assert!(!valid_http_url("file:///etc/passwd"));
        assert!(!valid_http_url("example.com"));
        assert!(!valid_http_url(""));
    }

    #[test]
    fn test_html_to_text_strips_scripts_and_tags() {
        let html = "<html><head><style>body{color:red}</style>\
                    <script>alert('x')</script></head>\
                    <body><h1>Title</h1><p>Hello &amp; welcome</p></body></html>";
        let text = html_to_text(html);
        assert!(text.contains("Title"));
        assert!(text.contains("Hello & welcome"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color:red"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_html_to_text_squeezes_blank_lines() {
        let html = "<div>a</div><div></div><div></div><div></div><div>b</div>";
        let text = html_to_text(html);
        assert!(!text.contains("\n\n\n"));
        assert!(text.starts_with('a'));
        assert!(text.ends_with('b'));
    }

    #[test]
    fn test_html_decode() {
        assert_eq!(
            html_decode("&lt;a&gt; &quot;b&quot; &#39;c&#39;&nbsp;d"),
            "<a> \"b\" 'c' d"
        );
    }

    #[test]
    fn test_truncation_boundary_respects_utf8() {
        let s = "héllo";
        // Index 2 falls inside the two-byte 'é'
        let cut = truncation_boundary(s, 2);
        assert!(s.is_char_boundary(cut));
        assert!(cut <= 2);
    }

    #[test]
    fn test_searx_response_decoding() {
        let json = r#"{
            "query": "rust",
            "results": [
                {"url": "https://rust-lang.org", "title": "Rust", "content": "A language"},
                {"url": "https://docs.rs", "title": "Docs.rs"}
            ]
        }"#;
        let parsed: SearxResponse =
            serde_json::from_str(json).unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].content, "A language");
        assert!(parsed.results[1].content.is_empty());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let tool = HttpSearchTool::new("http://localhost:8080/", Duration::from_secs(5))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(tool.base_url, "http://localhost:8080");
    }
}
