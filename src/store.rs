use async_trait::async_trait;
use thiserror::Error;

/// Only `Transport` is transient; the scheduler recovers from it with
/// credential re-acquisition and bounded retry. Everything else is fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("document error: {0}")]
    Document(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

/// Abstract tabular document store; documents addressed by URL, worksheets
/// by title (or by index for the source read). Rows are 1-based.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read_rows(&self, doc_url: &str, index: usize) -> Result<Vec<Vec<String>>, StoreError>;

    async fn sheet_titles(&self, doc_url: &str) -> Result<Vec<String>, StoreError>;

    async fn create_sheet(
        &self,
        doc_url: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), StoreError>;

    /// Plain ranged write; cells outside the written block are untouched.
    async fn write_range(
        &self,
        doc_url: &str,
        title: &str,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError>;

    /// Full-replace write of the data region: everything at and below
    /// `start_row` is cleared, then `rows` is written there. A smaller block
    /// than the previous cycle's therefore leaves no stale trailing rows.
    async fn replace_data(
        &self,
        doc_url: &str,
        title: &str,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError>;

    async fn autofit_columns(
        &self,
        doc_url: &str,
        title: &str,
        first_col: usize,
        last_col: usize,
    ) -> Result<(), StoreError>;
}

/// Invoked once at startup and again after every transport failure, so a
/// refreshed credential is picked up by the retry path.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    type Store: DocumentStore;

    async fn acquire(&self) -> Result<Self::Store, StoreError>;
}
