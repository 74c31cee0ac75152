pub mod error;
pub mod fetch;
pub mod filter;
pub mod model;
pub mod persist;
pub mod sanitize;
pub mod search;
pub mod selection;

pub use error::{Result, TabError};
pub use fetch::DocumentFetcher;
pub use model::{ResultCollection, SearchResultRecord, TabDocument, TabMetadata};
pub use persist::{download_tabs, persist, DownloadSummary, Persisted, SaveConfig};
pub use search::{aggregate, search_url, PageOutcome};
pub use selection::parse_selection;
