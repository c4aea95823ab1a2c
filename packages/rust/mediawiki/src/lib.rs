//! MediaWiki Action API graph provider.
//!
//! Implements [`GraphProvider`] against any MediaWiki installation (Wikipedia
//! by default): full-text search for title resolution, and article links for
//! traversal. Disambiguation pages are detected through the `disambiguation`
//! page prop and their options are scraped from the rendered page.

mod api;
mod disambig;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use wikiracer_core::{GraphProvider, LinkFetch};
use wikiracer_shared::{ClientConfig, Result, Title, WikiracerError};

use crate::api::{ApiError, PagesResponse, ParseResponse, SearchResponse};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("Wikiracer/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow per request.
const MAX_REDIRECTS: usize = 5;

/// Upper bound on `continue` round-trips when listing one page's links.
const MAX_LINK_BATCHES: usize = 100;

// ---------------------------------------------------------------------------
// MediaWikiClient
// ---------------------------------------------------------------------------

/// HTTP client for the MediaWiki Action API.
pub struct MediaWikiClient {
    config: ClientConfig,
    client: Client,
}

impl MediaWikiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(USER_AGENT);
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WikiracerError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Issue one API GET and decode the JSON body.
    async fn get<T, Q>(&self, params: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized + Sync,
    {
        if self.config.rate_limit_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.rate_limit_ms)).await;
        }

        let endpoint = &self.config.endpoint;
        let response = self
            .client
            .get(endpoint.clone())
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| WikiracerError::Network(format!("{endpoint}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikiracerError::Network(format!(
                "{endpoint}: HTTP {status}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WikiracerError::parse(format!("{endpoint}: invalid JSON: {e}")))?;

        if let Some(error) = body.get("error") {
            let error: ApiError = serde_json::from_value(error.clone())
                .map_err(|e| WikiracerError::parse(format!("malformed API error: {e}")))?;
            return Err(WikiracerError::Network(format!(
                "API error {}: {}",
                error.code, error.info
            )));
        }

        serde_json::from_value(body)
            .map_err(|e| WikiracerError::parse(format!("unexpected API response: {e}")))
    }

    /// Classify a page and gather its outbound links.
    #[instrument(skip_all, fields(title = %title))]
    async fn fetch_links(&self, title: &Title) -> Result<LinkFetch> {
        let info: PagesResponse = self
            .get(&[
                ("action", "query"),
                ("prop", "pageprops"),
                ("ppprop", "disambiguation"),
                ("redirects", "1"),
                ("titles", title.as_str()),
            ])
            .await?;

        let page = info
            .query
            .and_then(|q| q.pages.into_iter().next())
            .ok_or_else(|| WikiracerError::parse(format!("no page returned for '{title}'")))?;

        if page.missing || page.invalid {
            return Ok(LinkFetch::Missing);
        }

        if page.is_disambiguation() {
            let options = self.disambiguation_options(&page.title).await?;
            debug!(canonical = %page.title, options = options.len(), "disambiguation page");
            return Ok(LinkFetch::Ambiguous(options));
        }

        let links = self.all_links(&page.title).await?;
        debug!(canonical = %page.title, links = links.len(), "links fetched");
        Ok(LinkFetch::Links(links))
    }

    /// Follow `continue` tokens until every namespace-0 link has been listed.
    async fn all_links(&self, title: &str) -> Result<HashSet<Title>> {
        let mut links = HashSet::new();
        let mut continuation: HashMap<String, String> = HashMap::new();

        for batch in 0..MAX_LINK_BATCHES {
            let mut params: Vec<(String, String)> = [
                ("action", "query"),
                ("prop", "links"),
                ("plnamespace", "0"),
                ("pllimit", "max"),
                ("titles", title),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
            params.extend(continuation.drain());

            let response: PagesResponse = self.get(params.as_slice()).await?;

            for page in response.query.map(|q| q.pages).unwrap_or_default() {
                links.extend(page.links.into_iter().map(|l| Title::from(l.title)));
            }

            match response.continuation {
                Some(next) => continuation = next,
                None => return Ok(links),
            }

            debug!(batch, so_far = links.len(), "continuing link listing");
        }

        warn!(title, batches = MAX_LINK_BATCHES, "link listing truncated");
        Ok(links)
    }

    /// Render the page and scrape its list of meanings.
    async fn disambiguation_options(&self, title: &str) -> Result<HashSet<Title>> {
        let parsed: ParseResponse = self
            .get(&[
                ("action", "parse"),
                ("prop", "text"),
                ("redirects", "1"),
                ("page", title),
            ])
            .await?;

        Ok(disambig::parse_options(&parsed.parse.text))
    }
}

#[async_trait]
impl GraphProvider for MediaWikiClient {
    #[instrument(skip(self))]
    async fn search(&self, term: &str) -> Result<Vec<Title>> {
        let limit = self.config.search_limit.to_string();
        let response: SearchResponse = self
            .get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", limit.as_str()),
                ("srprop", ""),
            ])
            .await?;

        let titles: Vec<Title> = response
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .map(|hit| Title::from(hit.title))
            .collect();

        debug!(candidates = titles.len(), "search complete");
        Ok(titles)
    }

    async fn links_of(&self, title: &Title) -> LinkFetch {
        match self.fetch_links(title).await {
            Ok(fetch) => fetch,
            Err(e) => LinkFetch::Failed(e.to_string()),
        }
    }
}
