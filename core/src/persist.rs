use std::fs::create_dir_all;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};
use url::Url;

use crate::error::{Result, TabError};
use crate::fetch::DocumentFetcher;
use crate::model::{TabDocument, TabMetadata};
use crate::sanitize::{clean_filename, strip_markup};

const EXTENSION: &str = "txt";

/// Where downloaded tabs are written.
#[derive(Debug, Clone)]
pub struct SaveConfig {
    pub root: PathBuf,
}

impl SaveConfig {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn tab_path(&self, meta: &TabMetadata) -> PathBuf {
        self.root.join(tab_filename(meta))
    }
}

/// `Artist_Song.txt` with filesystem-illegal characters removed.
pub fn tab_filename(meta: &TabMetadata) -> String {
    let stem = clean_filename(&format!("{}_{}", meta.artist_name, meta.song_name));
    format!("{stem}.{EXTENSION}")
}

/// File body: one `key: value` line per metadata field, a blank line, then the cleaned tab text.
pub fn render(doc: &TabDocument) -> String {
    let mut out = doc
        .metadata
        .fields()
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str("\n\n");
    if let Some(body) = &doc.content {
        out.push_str(&strip_markup(body));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Written(PathBuf),
    /// Written without a body because the tab has no text content.
    MetadataOnly(PathBuf),
    /// A file with this name was already there; left untouched.
    AlreadyExists(PathBuf),
}

impl Persisted {
    pub fn path(&self) -> &Path {
        match self {
            Persisted::Written(p) | Persisted::MetadataOnly(p) | Persisted::AlreadyExists(p) => p,
        }
    }
}

/// Write `doc` under `cfg.root`. Never overwrites an existing file.
///
/// The text goes to a temporary file in the same directory first and is moved
/// into place only once complete, so a failed write leaves nothing behind.
pub fn persist(doc: &TabDocument, cfg: &SaveConfig) -> Result<Persisted> {
    create_dir_all(&cfg.root)?;
    let path = cfg.tab_path(&doc.metadata);
    if path.exists() { return Ok(Persisted::AlreadyExists(path)); }

    let mut tmp = NamedTempFile::new_in(&cfg.root)?;
    tmp.write_all(render(doc).as_bytes())?;
    tmp.flush()?;
    match tmp.persist_noclobber(&path) {
        Ok(_) => {}
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => return Ok(Persisted::AlreadyExists(path)),
        Err(e) => return Err(e.error.into()),
    }
    Ok(match doc.content {
        Some(_) => Persisted::Written(path),
        None => Persisted::MetadataOnly(path),
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub written: usize,
    pub metadata_only: usize,
    pub already_present: usize,
    pub failed: usize,
}

async fn download_one<F: DocumentFetcher>(fetcher: &F, url: &str, cfg: &SaveConfig) -> Result<Persisted> {
    let parsed = Url::parse(url).map_err(|e| TabError::Fetch { url: url.to_string(), message: e.to_string() })?;
    let raw = fetcher.fetch(&parsed).await?;
    let doc = TabDocument::from_document(&raw, url)?;
    let saved = persist(&doc, cfg)?;
    if let (Persisted::MetadataOnly(_), Err(e)) = (&saved, doc.content()) {
        warn!(path = %saved.path().display(), "{e}");
    }
    Ok(saved)
}

/// Fetch and save each tab in turn. A failing tab is logged and counted; the rest still download.
pub async fn download_tabs<F: DocumentFetcher>(fetcher: &F, urls: &[String], cfg: &SaveConfig) -> DownloadSummary {
    let mut summary = DownloadSummary::default();
    for url in urls {
        match download_one(fetcher, url, cfg).await {
            Ok(Persisted::Written(path)) => {
                info!(path = %path.display(), "saved tab");
                summary.written += 1;
            }
            Ok(Persisted::MetadataOnly(_)) => summary.metadata_only += 1,
            Ok(Persisted::AlreadyExists(path)) => {
                info!(path = %path.display(), "already downloaded");
                summary.already_present += 1;
            }
            Err(e) => {
                warn!(%url, error = %e, "could not save tab");
                summary.failed += 1;
            }
        }
    }
    summary
}
