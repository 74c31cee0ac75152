use thiserror::Error;

pub type Result<T, E = TabError> = std::result::Result<T, E>;

const SELECTION_FORMS: &str = "examples:\n1\n1, 2, 3, 4, 5\n1-5\n3-10\nall";

#[derive(Debug, Error)]
pub enum TabError {
    /// The page was fetched but its store does not have the expected shape.
    #[error("unexpected page structure at {url}: {detail}")]
    PageStructure { url: String, detail: String },
    #[error("no results found for \"{query}\"")]
    NoResults { query: String },
    #[error("{input} entered. You must enter either a number, a range of numbers or \"all\"\n{}", SELECTION_FORMS)]
    InvalidSelection { input: String },
    #[error("selection {index} is out of range, pick between 1 and {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no tab content available for {url}")]
    MissingContent { url: String },
    #[error("tab at {url} is missing field `{field}`")]
    MissingField { field: &'static str, url: String },
    #[error("request to {url} failed: {message}")]
    Fetch { url: String, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TabError {
    pub fn structure(url: impl Into<String>, detail: impl Into<String>) -> Self {
        TabError::PageStructure { url: url.into(), detail: detail.into() }
    }

    /// Errors scoped to a single page or tab; the surrounding batch keeps going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TabError::PageStructure { .. } | TabError::MissingContent { .. } | TabError::MissingField { .. }
        )
    }

    /// Errors the user can fix by typing a different selection.
    pub fn is_selection(&self) -> bool {
        matches!(self, TabError::InvalidSelection { .. } | TabError::IndexOutOfRange { .. })
    }
}
