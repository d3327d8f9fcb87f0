use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Required multipart field absent. Carries the client-facing message.
    #[error("{0}")]
    MissingPart(&'static str),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
