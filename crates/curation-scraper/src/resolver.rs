//! Decide which URLs to scrape for an entity.
//!
//! Strategies are tried in a fixed order and the first non-empty result
//! wins: known entities, external URL suggestions, external contexts, then
//! caller-supplied fallbacks. An empty result means "synthesize a
//! placeholder page".

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::types::Entity;

/// Entities whose homepage is known up front.
pub const KNOWN_ENTITY_URLS: &[(&str, &str)] = &[
    (
        "Martha Ballard's Diary Online",
        "https://dohistory.org/diary/about.html",
    ),
    (
        "Atharvaveda Paippalāda",
        "https://www.atharvavedapaippalada.uzh.ch/en.html",
    ),
    (
        "Paippalāda Recension of the Atharvaveda",
        "https://www.atharvavedapaippalada.uzh.ch/en.html",
    ),
];

/// Property id of the "URL" field in the curation system.
pub const URL_PROPERTY_ID: i64 = 2;

/// Context types whose value is expected to be a URL.
const URL_CONTEXT_TYPES: &[&str] = &["website", "url", "link", "homepage"];

const MIN_URL_LEN: usize = 10;

#[allow(clippy::expect_used)]
static URL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("URL regex is valid")
});

/// A property-value suggestion from the curation system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub property_id: Option<i64>,
    #[serde(default)]
    pub custom_value: Option<String>,
}

/// A free-form piece of context attached to an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityContext {
    #[serde(rename = "type", default)]
    pub context_type: String,
    #[serde(default)]
    pub value: String,
}

/// The external curation API. Failures are logged by the resolver and
/// treated as "no result".
#[async_trait]
pub trait CurationClient: Send + Sync {
    async fn get_suggestions(&self) -> anyhow::Result<Vec<Suggestion>>;
    async fn get_contexts(&self, entity_id: i64) -> anyhow::Result<Vec<EntityContext>>;
}

/// Which strategy produced the URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlSource {
    KnownEntity,
    Suggestion,
    Context,
    Fallback,
    None,
}

/// Outcome of [`UrlResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrls {
    pub urls: Vec<String>,
    pub source: UrlSource,
}

impl ResolvedUrls {
    fn new(urls: Vec<String>, source: UrlSource) -> Self {
        Self { urls, source }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Resolves entity URLs, optionally consulting a [`CurationClient`].
#[derive(Clone, Default)]
pub struct UrlResolver {
    client: Option<Arc<dyn CurationClient>>,
}

impl UrlResolver {
    pub fn new(client: Option<Arc<dyn CurationClient>>) -> Self {
        Self { client }
    }

    pub fn with_client(client: Arc<dyn CurationClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub async fn resolve(&self, entity: &Entity, fallback_urls: &[String]) -> ResolvedUrls {
        let name = entity.entity_name.as_str();
        info!(entity = name, id = entity.id, "resolving URLs");

        if let Some(url) = known_entity_url(name) {
            info!(entity = name, url, "known entity URL");
            return ResolvedUrls::new(vec![url.to_string()], UrlSource::KnownEntity);
        }

        if let Some(client) = self.client.as_deref().filter(|_| !entity.is_dummy) {
            if let Some(url) = url_from_suggestions(client, entity.id).await {
                info!(entity = name, url = %url, "URL from suggestions");
                return ResolvedUrls::new(vec![url], UrlSource::Suggestion);
            }
            let urls = urls_from_contexts(client, entity.id).await;
            if !urls.is_empty() {
                info!(entity = name, count = urls.len(), "URLs from contexts");
                return ResolvedUrls::new(urls, UrlSource::Context);
            }
            warn!(entity = name, "no URLs in suggestions or contexts");
        }

        if !fallback_urls.is_empty() {
            info!(entity = name, urls = ?fallback_urls, "using fallback URLs");
            return ResolvedUrls::new(fallback_urls.to_vec(), UrlSource::Fallback);
        }

        warn!(entity = name, "no URLs found, placeholder content will be used");
        ResolvedUrls::new(Vec::new(), UrlSource::None)
    }
}

pub fn known_entity_url(name: &str) -> Option<&'static str> {
    KNOWN_ENTITY_URLS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, url)| *url)
}

async fn url_from_suggestions(client: &dyn CurationClient, entity_id: i64) -> Option<String> {
    let suggestions = match client.get_suggestions().await {
        Ok(s) => s,
        Err(e) => {
            error!(entity_id, error = %e, "failed to fetch suggestions");
            return None;
        }
    };
    suggestions
        .into_iter()
        .filter(|s| s.entity_id == Some(entity_id) && s.property_id == Some(URL_PROPERTY_ID))
        .filter_map(|s| s.custom_value)
        .find(|v| is_valid_url(v))
        .map(|v| v.trim().to_string())
}

async fn urls_from_contexts(client: &dyn CurationClient, entity_id: i64) -> Vec<String> {
    let contexts = match client.get_contexts(entity_id).await {
        Ok(c) => c,
        Err(e) => {
            error!(entity_id, error = %e, "failed to fetch contexts");
            return Vec::new();
        }
    };
    info!(entity_id, count = contexts.len(), "contexts fetched");
    contexts.iter().flat_map(urls_in_context).collect()
}

/// URLs carried by one context: its value when the type says it is a URL,
/// otherwise every URL found in the free text.
pub fn urls_in_context(ctx: &EntityContext) -> Vec<String> {
    let is_url_type = URL_CONTEXT_TYPES
        .iter()
        .any(|t| ctx.context_type.eq_ignore_ascii_case(t));
    if is_url_type && is_valid_url(&ctx.value) {
        return vec![ctx.value.trim().to_string()];
    }
    URL_IN_TEXT
        .find_iter(&ctx.value)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']))
        .filter(|url| is_valid_url(url))
        .map(str::to_string)
        .collect()
}

/// `http(s)://`, at least ten characters, no whitespace or angle brackets.
pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("http://") || url.starts_with("https://"))
        && url.chars().count() >= MIN_URL_LEN
        && !url.contains([' ', '\n', '\t', '<', '>'])
}
