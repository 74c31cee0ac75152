use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::{Result, TabError};
use crate::fetch::{lookup, page_data};

/// One surviving entry from a search results page.
///
/// Only `tab_url` is required; the display fields fall back to empty or zero
/// when the site leaves them out or sends `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResultRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub artist_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub song_name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub version: String,
    /// Number text as the site wrote it (`5.0` stays `5.0`).
    #[serde(default = "zero", deserialize_with = "lenient_number_text")]
    pub rating: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub votes: u64,
    pub tab_url: String,
}

impl fmt::Display for SearchResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}) Version {}, rating: {}, votes: {}",
            self.artist_name, self.song_name, self.kind, self.version, self.rating, self.votes
        )
    }
}

fn zero() -> String { "0".to_string() }

fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_number_text<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    Ok(number_text(&Value::deserialize(de)?).unwrap_or_else(zero))
}

fn lenient_count<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<u64, D::Error> {
    Ok(count(&Value::deserialize(de)?).unwrap_or(0))
}

/// Raw text of a JSON number or numeric string.
fn number_text(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.trim().parse::<f64>().is_ok() => Some(s.trim().to_string()),
        _ => None,
    }
}

// Timestamps, ids and counts show up both as numbers and as numeric strings.
fn integer(v: &Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_f64().map(|f| f as i64))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn count(v: &Value) -> Option<u64> {
    integer(v).and_then(|n| u64::try_from(n).ok())
}

/// Search results in insertion order; position `i` is shown to the user as `i + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCollection {
    records: Vec<SearchResultRecord>,
}

impl ResultCollection {
    pub fn new() -> Self { Self::default() }
    pub fn push(&mut self, record: SearchResultRecord) { self.records.push(record); }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn get(&self, index: usize) -> Option<&SearchResultRecord> { self.records.get(index) }
    pub fn iter(&self) -> std::slice::Iter<'_, SearchResultRecord> { self.records.iter() }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a SearchResultRecord;
    type IntoIter = std::slice::Iter<'a, SearchResultRecord>;
    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}

impl FromIterator<SearchResultRecord> for ResultCollection {
    fn from_iter<I: IntoIterator<Item = SearchResultRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabMetadata {
    pub artist_name: String,
    pub song_name: String,
    pub kind: String,
    pub version: String,
    /// Number text as the site wrote it.
    pub rating: String,
    pub votes: u64,
    pub date: OffsetDateTime,
    pub song_id: u64,
    pub artist_id: u64,
    pub tab_access_type: String,
    pub tab_url: String,
}

impl TabMetadata {
    /// Read every metadata field from `store.page.data.tab`. Any absent field fails the tab.
    pub fn from_document(doc: &Value, url: &str) -> Result<Self> {
        let tab = page_data(doc)
            .and_then(|d| d.get("tab"))
            .ok_or_else(|| TabError::structure(url, "store has no tab object"))?;
        let date = OffsetDateTime::from_unix_timestamp(int_field(tab, "date", url)?)
            .map_err(|_| missing("date", url))?;

        Ok(Self {
            artist_name: text_field(tab, "artist_name", url)?,
            song_name: text_field(tab, "song_name", url)?,
            kind: text_field(tab, "type", url)?,
            version: text_field(tab, "version", url)?,
            rating: number_field(tab, "rating", url)?,
            votes: uint_field(tab, "votes", url)?,
            date,
            song_id: uint_field(tab, "song_id", url)?,
            artist_id: uint_field(tab, "artist_id", url)?,
            tab_access_type: text_field(tab, "tab_access_type", url)?,
            tab_url: text_field(tab, "tab_url", url)?,
        })
    }

    /// `(key, value)` pairs in the order they are written to disk.
    pub fn fields(&self) -> [(&'static str, String); 11] {
        let date_fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        [
            ("artist_name", self.artist_name.clone()),
            ("song_name", self.song_name.clone()),
            ("type", self.kind.clone()),
            ("version", self.version.clone()),
            ("rating", self.rating.clone()),
            ("votes", self.votes.to_string()),
            ("date", self.date.format(&date_fmt).unwrap_or_default()),
            ("song_id", self.song_id.to_string()),
            ("artist_id", self.artist_id.to_string()),
            ("tab_access_type", self.tab_access_type.clone()),
            ("tab_url", self.tab_url.clone()),
        ]
    }
}

fn missing(field: &'static str, url: &str) -> TabError {
    TabError::MissingField { field, url: url.to_string() }
}

fn field<'a>(tab: &'a Value, name: &'static str, url: &str) -> Result<&'a Value> {
    tab.get(name).filter(|v| !v.is_null()).ok_or_else(|| missing(name, url))
}

fn text_field(tab: &Value, name: &'static str, url: &str) -> Result<String> {
    Ok(match field(tab, name, url)? {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn int_field(tab: &Value, name: &'static str, url: &str) -> Result<i64> {
    integer(field(tab, name, url)?).ok_or_else(|| missing(name, url))
}

fn uint_field(tab: &Value, name: &'static str, url: &str) -> Result<u64> {
    count(field(tab, name, url)?).ok_or_else(|| missing(name, url))
}

fn number_field(tab: &Value, name: &'static str, url: &str) -> Result<String> {
    number_text(field(tab, name, url)?).ok_or_else(|| missing(name, url))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabDocument {
    pub metadata: TabMetadata,
    /// Raw body with site markup; `None` when the tab has no text content.
    pub content: Option<String>,
}

impl TabDocument {
    pub fn from_document(doc: &Value, url: &str) -> Result<Self> {
        let metadata = TabMetadata::from_document(doc, url)?;
        let content = page_data(doc)
            .and_then(|d| lookup(d, &["tab_view", "wiki_tab", "content"]))
            .and_then(Value::as_str)
            .map(str::to_owned);
        Ok(Self { metadata, content })
    }

    pub fn content(&self) -> Result<&str> {
        self.content.as_deref().ok_or_else(|| TabError::MissingContent { url: self.metadata.tab_url.clone() })
    }
}
