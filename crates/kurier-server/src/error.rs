use thiserror::Error;

/// Errors produced by the server's collaborators.
///
/// Command handlers never fail: every command outcome, including unknown
/// commands, is reported inside a 200-status JSON envelope.  This enum only
/// covers the static page loader.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The info page could not be read from disk.
    #[error("Failed to read index page '{path}': {source}")]
    IndexPage {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
