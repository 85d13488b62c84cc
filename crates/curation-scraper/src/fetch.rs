//! HTML retrieval over HTTP.
//!
//! One GET per URL, no retries. Failures are classified into
//! [`FetchError`] kinds carrying the URL.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::error::FetchError;

/// A fetched HTML document.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// Whether the declared content type is HTML or XHTML.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let ct = ct.to_ascii_lowercase();
                ct.contains("text/html") || ct.contains("application/xhtml")
            })
            .unwrap_or(false)
    }
}

/// Source of raw HTML for a URL.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// [`HtmlFetcher`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    /// Build a client with the configured user agent and timeout.
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client {
                detail: e.to_string(),
            })?;
        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        info!(url, "fetching HTML");
        let classify = |e: reqwest::Error| FetchError::from_reqwest(url, self.timeout_secs, e);

        let resp = self.client.get(parsed).send().await.map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = resp.url().to_string();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await.map_err(classify)?;

        let response = HttpResponse {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        };
        if !response.is_html() {
            warn!(
                url,
                content_type = response.content_type.as_deref().unwrap_or(""),
                "unexpected content type"
            );
        }
        info!(url, chars = response.body.chars().count(), "fetched HTML");
        Ok(response)
    }
}
