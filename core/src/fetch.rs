use serde_json::Value;
use std::future::Future;
use url::Url;

use crate::error::Result;

/// Source of parsed page stores. The binary backs this with HTTP; tests use a map.
///
/// Implementations report pages whose store cannot be located or parsed as
/// [`TabError::PageStructure`](crate::TabError::PageStructure) and transport
/// failures as [`TabError::Fetch`](crate::TabError::Fetch).
pub trait DocumentFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Value>>;
}

/// Walk `keys` into a nested JSON object.
pub fn lookup<'a>(doc: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(doc, |node, key| node.get(*key))
}

pub(crate) const PAGE_DATA: [&str; 3] = ["store", "page", "data"];

pub(crate) fn page_data(doc: &Value) -> Option<&Value> {
    lookup(doc, &PAGE_DATA)
}
