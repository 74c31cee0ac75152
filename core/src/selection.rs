//! Parsing of the download selection typed by the user.
//!
//! Accepted forms, checked in this order after spaces are turned into commas:
//! `1,2,5` (list), `2-7` (inclusive range), `4` (single), `all`.
//! Indices are 1-based positions in the [`ResultCollection`].

use std::collections::HashSet;

use crate::error::{Result, TabError};
use crate::model::ResultCollection;

/// Resolve `text` to the tab URLs it selects.
///
/// The result is deduplicated. Its order follows first occurrence but callers
/// should treat it as a set: downloads do not depend on order.
pub fn parse_selection(text: &str, results: &ResultCollection) -> Result<Vec<String>> {
    let selection = text.replace(' ', ",");
    let invalid = || TabError::InvalidSelection { input: text.to_string() };

    let indices: Vec<usize> = if selection.contains(',') {
        selection
            .trim_matches(',')
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| parse_index(s).ok_or_else(invalid))
            .collect::<Result<_>>()?
    } else if selection.contains('-') {
        let (lo, hi) = selection.split_once('-').ok_or_else(invalid)?;
        let (lo, hi) = (parse_index(lo).ok_or_else(invalid)?, parse_index(hi).ok_or_else(invalid)?);
        if lo <= hi && (lo == 0 || hi > results.len()) {
            let index = if lo == 0 { 0 } else { lo.max(results.len() + 1) };
            return Err(TabError::IndexOutOfRange { index, len: results.len() });
        }
        (lo..=hi).collect()
    } else if let Some(index) = parse_index(&selection) {
        vec![index]
    } else if !selection.is_empty() && selection.chars().all(char::is_alphabetic) && selection.eq_ignore_ascii_case("all") {
        (1..=results.len()).collect()
    } else {
        return Err(invalid());
    };

    let mut seen = HashSet::new();
    let mut urls = Vec::with_capacity(indices.len());
    for index in indices {
        let record = index
            .checked_sub(1)
            .and_then(|i| results.get(i))
            .ok_or(TabError::IndexOutOfRange { index, len: results.len() })?;
        if seen.insert(record.tab_url.as_str()) {
            urls.push(record.tab_url.clone());
        }
    }
    Ok(urls)
}

/// All-digit text as an index. Values too large for `usize` saturate so they
/// surface as out of range rather than as bad syntax.
fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) { return None; }
    Some(s.parse().unwrap_or(usize::MAX))
}
