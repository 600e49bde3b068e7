//! Static info page loader.

use std::path::Path;

use tokio::fs;

use crate::error::ServerError;

/// Body served in place of the info page when it cannot be read.
pub const PAGE_ERROR_BODY: &str = "ERROR";

/// Load the HTML info page from disk.
pub async fn load_index_page(path: &Path) -> Result<String, ServerError> {
    fs::read_to_string(path)
        .await
        .map_err(|source| ServerError::IndexPage {
            path: path.display().to_string(),
            source,
        })
}
