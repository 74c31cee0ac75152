mod common;

use common::{item, search_page, MapFetcher};
use serde_json::json;
use tabcore::{aggregate, parse_selection, search_url, TabError};
use url::Url;

const BASE: &str = "https://tabs.example";

fn terms(q: &str) -> Vec<String> { q.split(' ').map(str::to_string).collect() }

fn page_url(q: &str, page: u32) -> String {
    search_url(&Url::parse(BASE).unwrap(), &terms(q), page).to_string()
}

#[tokio::test]
async fn merges_pages_in_order() {
    let q = "wish you were here";
    let fetcher = MapFetcher::default()
        .with(&page_url(q, 1), Ok(search_page(3, vec![item("a", "Chords"), item("promo-less bass", "Bass Tabs"), item("b", "Tabs")])))
        .with(&page_url(q, 2), Ok(search_page(3, vec![item("c", "Video"), item("d", "Chords")])))
        .with(&page_url(q, 3), Ok(search_page(3, vec![item("e", "Tabs")])));

    let results = aggregate(&fetcher, &Url::parse(BASE).unwrap(), &terms(q)).await.unwrap();
    let songs: Vec<_> = results.iter().map(|r| r.song_name.as_str()).collect();
    assert_eq!(songs, ["a", "b", "d", "e"]);
    // page 1 is fetched once and reused
    assert_eq!(fetcher.requests(), vec![page_url(q, 1), page_url(q, 2), page_url(q, 3)]);
}

#[tokio::test]
async fn skips_broken_pages_without_aborting() {
    let q = "beatles";
    let album = json!({"store": {"page": {"data": {"album": {"tabs": []}}}}});
    let fetcher = MapFetcher::default()
        .with(&page_url(q, 1), Ok(search_page(4, vec![item("a", "Chords")])))
        .with(&page_url(q, 2), Ok(album))
        .with(&page_url(q, 3), Err(TabError::structure("p3", "no store")))
        .with(&page_url(q, 5), Ok(search_page(4, vec![item("never", "Chords")])));
    // page 4 is absent from the map and fails as a transport error

    let results = aggregate(&fetcher, &Url::parse(BASE).unwrap(), &terms(q)).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(fetcher.requests().len(), 4);
}

#[tokio::test]
async fn first_page_without_pagination_is_no_results() {
    let q = "zzzz";
    let fetcher = MapFetcher::default().with(&page_url(q, 1), Ok(json!({"store": {"page": {"data": {"results": []}}}})));
    let err = aggregate(&fetcher, &Url::parse(BASE).unwrap(), &terms(q)).await.unwrap_err();
    assert!(matches!(err, TabError::NoResults { ref query } if query == "zzzz"));
}

#[tokio::test]
async fn first_page_without_store_is_no_results() {
    let q = "nothing";
    let fetcher = MapFetcher::default().with(&page_url(q, 1), Err(TabError::structure("p1", "no .js-store")));
    let err = aggregate(&fetcher, &Url::parse(BASE).unwrap(), &terms(q)).await.unwrap_err();
    assert!(matches!(err, TabError::NoResults { .. }));
}

#[tokio::test]
async fn first_page_transport_failure_propagates() {
    let fetcher = MapFetcher::default();
    let err = aggregate(&fetcher, &Url::parse(BASE).unwrap(), &terms("offline")).await.unwrap_err();
    assert!(matches!(err, TabError::Fetch { .. }));
}

#[tokio::test]
async fn selection_over_aggregated_results() {
    let q = "nirvana";
    let fetcher = MapFetcher::default()
        .with(&page_url(q, 1), Ok(search_page(2, vec![item("a", "Chords"), item("b", "Tabs")])))
        .with(&page_url(q, 2), Ok(search_page(2, vec![item("c", "Chords")])));
    let results = aggregate(&fetcher, &Url::parse(BASE).unwrap(), &terms(q)).await.unwrap();

    assert_eq!(parse_selection("3", &results).unwrap(), vec!["https://tabs.example/tab/c".to_string()]);
    assert_eq!(parse_selection("all", &results).unwrap().len(), 3);
}
