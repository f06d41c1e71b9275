/// Infrastructure error types for sitecheck.
use std::path::PathBuf;

/// Failures of the machinery itself, as opposed to findings about the site
/// (those are `issue::Issue`). Only root resolution aborts a run; everything
/// else is downgraded to an accumulated issue by the orchestrator.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failure from one of the network passes.
    #[error("http: {0}")]
    Http(
        /// The wrapped reqwest error.
        #[from]
        reqwest::Error,
    ),

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON deserialization failure from the remote source response.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// Tree-sitter failed to parse an HTML file.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },
}
