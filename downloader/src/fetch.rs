use anyhow::{anyhow, Result};
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;
use tabcore::{DocumentFetcher, TabError};
use tracing::debug;

/// Fetches site pages over HTTP and decodes the JSON store embedded in them.
pub struct HttpFetcher {
    client: Client,
    store: Selector,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()?;
        let store = Selector::parse(".js-store").map_err(|e| anyhow!("bad store selector: {e:?}"))?;
        Ok(Self { client, store })
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> tabcore::Result<Value> {
        let failed = |e: reqwest::Error| TabError::Fetch { url: url.to_string(), message: e.to_string() };
        debug!(%url, "GET");
        let resp = self.client.get(url.clone()).send().await.map_err(failed)?;
        let body = resp.error_for_status().map_err(failed)?.text().await.map_err(failed)?;
        extract_store(&body, url.as_str(), &self.store)
    }
}

/// Parse the `data-content` JSON of the first element matching `store`.
pub fn extract_store(html: &str, url: &str, store: &Selector) -> tabcore::Result<Value> {
    let doc = Html::parse_document(html);
    let node = doc.select(store).next().ok_or_else(|| TabError::structure(url, "page has no .js-store element"))?;
    let raw = node
        .value()
        .attr("data-content")
        .ok_or_else(|| TabError::structure(url, "store element has no data-content"))?;
    serde_json::from_str(raw).map_err(|e| TabError::structure(url, format!("store is not valid JSON: {e}")))
}
