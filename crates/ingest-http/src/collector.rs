//! Bounded request body collection.
//!
//! This module accumulates request-body bytes up to a configured limit:
//! - A [`BodyCollector`] state machine fed chunk by chunk
//! - Blocking collection from any [`std::io::Read`]
//! - Async collection from any [`Stream`] of byte chunks
//! - Up-front rejection of oversized `Content-Length` declarations
//!
//! # Early Abort
//!
//! The limit is checked before a chunk is copied, so the buffer never holds
//! more than `max_size` bytes, not even transiently. On overflow the buffer
//! is freed and collection stops: the source is dropped without reading the
//! rest of the body, and the host is expected to close the connection.
//!
//! # Example
//!
//! ```ignore
//! use ingest_http::collector::collect_stream;
//!
//! let body = collect_stream(request_body_stream, 5 * 1024 * 1024).await?;
//! ```

use std::error::Error as StdError;
use std::io::{self, Read};
use std::pin::pin;

use futures_util::{Stream, StreamExt};
use ingest_core::IngestError;
use tracing::{debug, warn};

/// Initial buffer capacity when no size hint is known.
pub const DEFAULT_INITIAL_CAPACITY: usize = 4096;

/// Read size used when collecting from a blocking reader.
pub const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Collection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectState {
    /// Accepting bytes.
    Collecting,
    /// The source ended within the limit.
    Complete,
    /// The limit was exceeded; the buffer has been discarded.
    Overflow,
    /// The source failed; the buffer has been discarded.
    Failed,
}

/// Accumulates body bytes under a hard size limit.
#[derive(Debug)]
pub struct BodyCollector {
    buffer: Vec<u8>,
    max_size: usize,
    state: CollectState,
    /// Size the body would have reached when the limit was hit.
    overflow_size: usize,
    failure: Option<io::ErrorKind>,
}

impl BodyCollector {
    /// Create a collector with the default initial capacity.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self::with_size_hint(max_size, None)
    }

    /// Create a collector preallocating for a declared body size.
    ///
    /// The preallocation never exceeds `max_size`.
    #[must_use]
    pub fn with_size_hint(max_size: usize, hint: Option<usize>) -> Self {
        let capacity = hint.unwrap_or(DEFAULT_INITIAL_CAPACITY).min(max_size);
        Self {
            buffer: Vec::with_capacity(capacity),
            max_size,
            state: CollectState::Collecting,
            overflow_size: 0,
            failure: None,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CollectState {
        self.state
    }

    /// Returns the configured limit.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the number of bytes currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the allocated buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Append a chunk.
    ///
    /// # Errors
    ///
    /// Returns `SizeLimitExceeded` if the chunk would take the body past the
    /// limit. The chunk is not copied and the buffer is released.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), IngestError> {
        match self.state {
            CollectState::Collecting => {}
            CollectState::Overflow => return Err(self.overflow_error()),
            CollectState::Complete | CollectState::Failed => {
                return Err(IngestError::transport("body collector is closed"));
            }
        }

        let next = self.buffer.len().saturating_add(chunk.len());
        if next > self.max_size {
            self.overflow(next);
            return Err(self.overflow_error());
        }

        if next > self.buffer.capacity() {
            // Grow geometrically but never past the limit.
            let target = next
                .max(self.buffer.capacity().saturating_mul(2))
                .min(self.max_size);
            self.buffer.reserve_exact(target - self.buffer.len());
        }
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    /// Record a source failure and release the buffer.
    pub fn fail(&mut self, err: io::Error) -> IngestError {
        debug!(
            received = self.buffer.len(),
            error = %err,
            "upload stream failed"
        );
        self.buffer = Vec::new();
        self.state = CollectState::Failed;
        self.failure = Some(err.kind());
        IngestError::from(err)
    }

    /// Finish collection and return the body.
    pub fn finish(mut self) -> Result<Vec<u8>, IngestError> {
        match self.state {
            CollectState::Collecting => {
                self.state = CollectState::Complete;
                Ok(std::mem::take(&mut self.buffer))
            }
            CollectState::Overflow => Err(self.overflow_error()),
            CollectState::Complete => Err(IngestError::transport("body collector is closed")),
            CollectState::Failed => Err(IngestError::from(io::Error::from(
                self.failure.unwrap_or(io::ErrorKind::Other),
            ))),
        }
    }

    fn overflow(&mut self, size: usize) {
        warn!(
            received = self.buffer.len(),
            size,
            max = self.max_size,
            "upload body exceeds limit, aborting"
        );
        self.buffer = Vec::new();
        self.state = CollectState::Overflow;
        self.overflow_size = size;
    }

    fn overflow_error(&self) -> IngestError {
        IngestError::SizeLimitExceeded {
            size: self.overflow_size,
            max: self.max_size,
        }
    }
}

// ============================================================================
// Content-Length
// ============================================================================

/// Parse a `Content-Length` header value.
#[must_use]
pub fn parse_content_length(value: &[u8]) -> Option<usize> {
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}

/// Reject a declared body size before reading any of it.
///
/// # Errors
///
/// Returns `SizeLimitExceeded` if `declared` exceeds `max_size`.
pub fn check_content_length(declared: Option<usize>, max_size: usize) -> Result<(), IngestError> {
    match declared {
        Some(size) if size > max_size => {
            debug!(size, max = max_size, "declared Content-Length over limit");
            Err(IngestError::SizeLimitExceeded {
                size,
                max: max_size,
            })
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Collect a body from a blocking reader.
///
/// Reading stops at the first chunk that would exceed `max_size`.
pub fn collect_reader<R: Read>(mut reader: R, max_size: usize) -> Result<Vec<u8>, IngestError> {
    let mut collector = BodyCollector::new(max_size);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return collector.finish(),
            Ok(n) => collector.push(&chunk[..n])?,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(collector.fail(err)),
        }
    }
}

/// Collect a body from an async stream of byte chunks.
///
/// The stream is dropped as soon as a chunk would exceed `max_size`, so no
/// further chunks are polled.
pub async fn collect_stream<S, B, E>(stream: S, max_size: usize) -> Result<Vec<u8>, IngestError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    collect_stream_with_hint(stream, max_size, None).await
}

/// Like [`collect_stream`], preallocating for a declared body size.
pub async fn collect_stream_with_hint<S, B, E>(
    stream: S,
    max_size: usize,
    hint: Option<usize>,
) -> Result<Vec<u8>, IngestError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let mut stream = pin!(stream);
    let mut collector = BodyCollector::with_size_hint(max_size, hint);
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => collector.push(chunk.as_ref())?,
            Err(err) => return Err(collector.fail(into_io_error(err.into()))),
        }
    }
    collector.finish()
}

fn into_io_error(err: Box<dyn StdError + Send + Sync>) -> io::Error {
    match err.downcast::<io::Error>() {
        Ok(io_err) => *io_err,
        Err(other) => io::Error::other(other),
    }
}

// ============================================================================
// Tests
// ============================================================================
