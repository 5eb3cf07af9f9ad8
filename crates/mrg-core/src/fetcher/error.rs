//! Per-file download error type.

use thiserror::Error;

/// Error from a single file download attempt. One file's failure never halts
/// the batch; the file is marked `Error` and the rest continue.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Final response status was not 200.
    #[error("no file found at given url (HTTP {0})")]
    Http(u32),
    /// Curl-level failure: timeout, connection, TLS, etc.
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Local filesystem failure while streaming or finalizing the file.
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
}
