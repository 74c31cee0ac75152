use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, TabError};
use crate::fetch::page_data;
use crate::model::{ResultCollection, SearchResultRecord};

/// Result categories that are not plain-text guitar tabs.
pub const EXCLUDED_TYPES: [&str; 7] = ["Ukulele Chords", "Bass Tabs", "Pro", "Power", "Official", "Drum Tabs", "Video"];

/// Whether a raw search item should be shown: no promoted entries, no excluded categories.
pub fn is_relevant(item: &Value) -> bool {
    if item.get("marketing_type").is_some() { return false; }
    match item.get("type").and_then(Value::as_str) {
        Some(kind) => !EXCLUDED_TYPES.contains(&kind),
        None => false,
    }
}

/// Append the relevant results of one search page to `acc`, in page order.
/// Returns how many records were appended.
pub fn filter_page(page: &Value, url: &str, acc: &mut ResultCollection) -> Result<usize> {
    let items = page_data(page)
        .and_then(|d| d.get("results"))
        .and_then(Value::as_array)
        .ok_or_else(|| TabError::structure(url, "no results list in store"))?;

    let before = acc.len();
    for item in items.iter().filter(|i| is_relevant(i)) {
        match SearchResultRecord::deserialize(item) {
            Ok(rec) => acc.push(rec),
            Err(e) => warn!(%url, error = %e, "skipping malformed search result"),
        }
    }
    Ok(acc.len() - before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(song: &str, kind: &str) -> Value {
        json!({"artist_name": "Artist", "song_name": song, "type": kind, "version": 1,
               "rating": 4.2, "votes": 10, "tab_url": format!("https://tabs.example/{song}")})
    }

    fn page(items: Vec<Value>) -> Value {
        json!({"store": {"page": {"data": {"results": items}}}})
    }

    #[test]
    fn drops_marketing_and_excluded_types() {
        let mut promo = item("promo", "Chords");
        promo["marketing_type"] = json!("TabPro");
        let raw = page(vec![
            item("one", "Chords"),
            promo,
            item("bass", "Bass Tabs"),
            item("two", "Tabs"),
            item("vid", "Video"),
            item("three", "Chords"),
        ]);
        let mut acc = ResultCollection::new();
        let n = filter_page(&raw, "p1", &mut acc).unwrap();
        assert_eq!(n, 3);
        let songs: Vec<_> = acc.iter().map(|r| r.song_name.as_str()).collect();
        assert_eq!(songs, ["one", "two", "three"]);
    }

    #[test]
    fn appends_after_existing_entries() {
        let mut acc = ResultCollection::new();
        filter_page(&page(vec![item("a", "Tabs")]), "p1", &mut acc).unwrap();
        filter_page(&page(vec![item("b", "Tabs"), item("c", "Chords")]), "p2", &mut acc).unwrap();
        let songs: Vec<_> = acc.iter().map(|r| r.song_name.as_str()).collect();
        assert_eq!(songs, ["a", "b", "c"]);
    }

    #[test]
    fn item_without_url_does_not_drop_siblings() {
        let raw = page(vec![json!({"type": "Tabs", "song_name": "broken"}), item("ok", "Tabs")]);
        let mut acc = ResultCollection::new();
        assert_eq!(filter_page(&raw, "p1", &mut acc).unwrap(), 1);
    }

    #[test]
    fn keeps_items_with_sparse_display_fields() {
        let mut no_version = item("no-version", "Tabs");
        no_version.as_object_mut().unwrap().remove("version");
        let mut null_rating = item("null-rating", "Chords");
        null_rating["rating"] = Value::Null;
        let mut string_votes = item("string-votes", "Tabs");
        string_votes["votes"] = json!("12");
        let mut no_url = item("no-url", "Tabs");
        no_url.as_object_mut().unwrap().remove("tab_url");

        let raw = page(vec![no_version, null_rating, no_url, string_votes, item("ok", "Chords")]);
        let mut acc = ResultCollection::new();
        assert_eq!(filter_page(&raw, "p1", &mut acc).unwrap(), 4);
        let songs: Vec<_> = acc.iter().map(|r| r.song_name.as_str()).collect();
        assert_eq!(songs, ["no-version", "null-rating", "string-votes", "ok"]);
        assert_eq!(acc.get(2).unwrap().votes, 12);
    }

    #[test]
    fn missing_results_is_structure_error() {
        let raw = json!({"store": {"page": {"data": {"album": {}}}}});
        let err = filter_page(&raw, "p1", &mut ResultCollection::new()).unwrap_err();
        assert!(matches!(err, TabError::PageStructure { .. }));
    }
}
