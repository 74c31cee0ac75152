#![allow(dead_code)]

use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use tabcore::{DocumentFetcher, Result, TabError};
use url::Url;

/// Serves canned stores by URL and records every request.
#[derive(Default)]
pub struct MapFetcher {
    pub pages: HashMap<String, Result<Value>>,
    pub requests: RefCell<Vec<String>>,
}

impl MapFetcher {
    pub fn with(mut self, url: &str, page: Result<Value>) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn requests(&self) -> Vec<String> { self.requests.borrow().clone() }
}

impl DocumentFetcher for MapFetcher {
    async fn fetch(&self, url: &Url) -> Result<Value> {
        self.requests.borrow_mut().push(url.to_string());
        match self.pages.get(url.as_str()) {
            Some(Ok(v)) => Ok(v.clone()),
            Some(Err(TabError::PageStructure { url, detail })) => Err(TabError::structure(url.as_str(), detail.as_str())),
            Some(Err(e)) => Err(TabError::Fetch { url: url.to_string(), message: e.to_string() }),
            None => Err(TabError::Fetch { url: url.to_string(), message: "404".into() }),
        }
    }
}

pub fn item(song: &str, kind: &str) -> Value {
    json!({"artist_name": "Artist", "song_name": song, "type": kind, "version": 1,
           "rating": 4.5, "votes": 10, "tab_url": format!("https://tabs.example/tab/{song}")})
}

pub fn search_page(total: u32, items: Vec<Value>) -> Value {
    json!({"store": {"page": {"data": {"pagination": {"current": 1, "total": total}, "results": items}}}})
}

pub fn tab_page(artist: &str, song: &str, content: Option<&str>) -> Value {
    let mut data = json!({"tab": {
        "artist_name": artist, "song_name": song, "type": "Chords", "version": 1,
        "rating": 4.8, "votes": 99, "date": 1_600_000_000, "song_id": 1, "artist_id": 2,
        "tab_access_type": "public", "tab_url": format!("https://tabs.example/tab/{song}")
    }});
    if let Some(c) = content {
        data["tab_view"] = json!({"wiki_tab": {"content": c}});
    }
    json!({"store": {"page": {"data": data}}})
}
