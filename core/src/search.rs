use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Result, TabError};
use crate::fetch::{page_data, DocumentFetcher};
use crate::filter::filter_page;
use crate::model::ResultCollection;

/// What happened to a single search page during aggregation.
#[derive(Debug)]
pub enum PageOutcome {
    /// Records appended to the collection.
    Merged(usize),
    /// Page did not have the shape of a results page (e.g. an album grouping).
    Skipped(TabError),
    /// Anything else: transport failure, I/O.
    Failed(TabError),
}

/// Build the search page URL: `{base}/search.php?page={page}&title=term1+term2`.
pub fn search_url(base: &Url, terms: &[String], page: u32) -> Url {
    let mut url = base.join("search.php").unwrap_or_else(|_| base.clone());
    let title = terms.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect::<Vec<_>>().join(" ");
    url.query_pairs_mut()
        .clear()
        .append_pair("page", &page.to_string())
        .append_pair("title", &title);
    url
}

/// Total number of result pages advertised by a search page.
pub fn page_count(doc: &Value) -> Option<u32> {
    page_data(doc)?.get("pagination")?.get("total")?.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// Filter one fetched page into `acc`, classifying any failure.
pub fn merge_page(doc: Result<Value>, url: &str, acc: &mut ResultCollection) -> PageOutcome {
    match doc.and_then(|d| filter_page(&d, url, acc)) {
        Ok(n) => PageOutcome::Merged(n),
        Err(e) if e.is_recoverable() => PageOutcome::Skipped(e),
        Err(e) => PageOutcome::Failed(e),
    }
}

/// Run a search across every result page and collect the relevant tabs.
///
/// Page 1 is fetched first to learn the page count; its document is reused
/// for the first iteration. Later pages that fail are logged and skipped.
pub async fn aggregate<F: DocumentFetcher>(fetcher: &F, base: &Url, terms: &[String]) -> Result<ResultCollection> {
    let query = terms.join(" ");
    let no_results = || TabError::NoResults { query: query.clone() };

    let first_url = search_url(base, terms, 1);
    let first = match fetcher.fetch(&first_url).await {
        Ok(doc) => doc,
        Err(TabError::PageStructure { .. }) => return Err(no_results()),
        Err(e) => return Err(e),
    };
    let total = page_count(&first).ok_or_else(no_results)?;
    debug!(%query, total, "search pages");

    let mut acc = ResultCollection::new();
    let mut bootstrap = Some(first);
    for page in 1..=total {
        let url = search_url(base, terms, page);
        let doc = match bootstrap.take() {
            Some(doc) => Ok(doc),
            None => fetcher.fetch(&url).await,
        };
        match merge_page(doc, url.as_str(), &mut acc) {
            PageOutcome::Merged(n) => debug!(page, kept = n, "merged search page"),
            PageOutcome::Skipped(e) => info!(page, error = %e, "skipping page without tab list"),
            PageOutcome::Failed(e) => warn!(page, error = %e, "search page failed"),
        }
    }
    Ok(acc)
}
