//! Error taxonomy for upload ingestion.
//!
//! Every failure surfaced by the engine falls into one of four kinds, each
//! with a fixed HTTP mapping. None of them are retried inside the engine.

use std::io;

/// Stable classification of an [`IngestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The underlying stream or connection failed.
    Transport,
    /// Collected bytes exceeded the configured limit.
    SizeLimitExceeded,
    /// The multipart envelope could not be used.
    MalformedMultipart,
    /// The file's declared content type is not allowed.
    UnsupportedMediaType,
}

impl ErrorKind {
    /// Machine-readable name used in error payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport_error",
            Self::SizeLimitExceeded => "size_limit_exceeded",
            Self::MalformedMultipart => "malformed_multipart",
            Self::UnsupportedMediaType => "unsupported_media_type",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a multipart body was rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    /// No `boundary=` parameter in the Content-Type header.
    #[error("missing boundary in multipart Content-Type")]
    MissingBoundary,
    /// The boundary parameter was present but empty.
    #[error("empty multipart boundary")]
    EmptyBoundary,
    /// The boundary exceeds the RFC 2046 length limit.
    #[error("multipart boundary longer than {max} bytes")]
    BoundaryTooLong { max: usize },
    /// A file was required but no part carried one under the target field.
    #[error("no file found in field '{field}'")]
    MissingFile { field: String },
}

/// Errors produced while collecting or parsing an upload.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The byte stream failed before it ended.
    #[error("upload stream failed: {source}")]
    Transport {
        #[source]
        source: io::Error,
    },
    /// The body grew past `max` bytes.
    #[error("upload too large: {size} bytes exceeds limit of {max}")]
    SizeLimitExceeded { size: usize, max: usize },
    /// The multipart envelope was unusable.
    #[error("malformed multipart body: {0}")]
    MalformedMultipart(#[from] MalformedReason),
    /// The extracted file's content type is not on the allowlist.
    #[error("unsupported media type '{mime_type}'")]
    UnsupportedMediaType { mime_type: String },
}

impl IngestError {
    /// Wraps any stream failure as a transport error.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Transport {
            source: io::Error::other(err),
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::SizeLimitExceeded { .. } => ErrorKind::SizeLimitExceeded,
            Self::MalformedMultipart(_) => ErrorKind::MalformedMultipart,
            Self::UnsupportedMediaType { .. } => ErrorKind::UnsupportedMediaType,
        }
    }

    /// HTTP status code the host should answer with.
    ///
    /// Transport failures caused by the client (truncated or reset streams)
    /// are a 400; anything else on the transport side is a 500.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Transport { source } => match source.kind() {
                io::ErrorKind::UnexpectedEof
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted => 400,
                _ => 500,
            },
            Self::SizeLimitExceeded { .. } => 413,
            Self::MalformedMultipart(_) | Self::UnsupportedMediaType { .. } => 400,
        }
    }

    /// Whether the host should close the connection instead of draining it.
    #[must_use]
    pub fn closes_connection(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::SizeLimitExceeded { .. })
    }
}

impl From<io::Error> for IngestError {
    fn from(source: io::Error) -> Self {
        Self::Transport { source }
    }
}
