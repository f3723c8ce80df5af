//! Single-file multipart upload ingestion.
//!
//! `ingest` reads one uploaded file out of a `multipart/form-data` request:
//!
//! - **Bounded collection**: the body is read under a hard size limit and
//!   reading stops at the first byte past it
//! - **Binary-safe parsing**: boundaries are located on raw bytes, payloads
//!   are never decoded
//! - **MIME allowlists**: presets for images, documents and both
//! - **Host-agnostic**: the core is a pure function; the middleware works on
//!   a minimal request type any server can fill in
//!
//! # Quick Start
//!
//! ```
//! use ingest::Upload;
//!
//! let body = b"--X\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n\
//! Content-Type: image/png\r\n\r\n\x89PNG\r\n--X--\r\n";
//!
//! let file = Upload::image()
//!     .parse(body, "multipart/form-data; boundary=X")?
//!     .expect("file part");
//! assert_eq!(file.mime_type(), "image/png");
//! assert_eq!(file.size(), 4);
//! # Ok::<(), ingest::IngestError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`ingest_core`]: boundary splitting, part parsing, allowlists, errors
//! - [`ingest_http`]: body collection, request/response types, middleware

#![forbid(unsafe_code)]

mod upload;

// Re-export crates
pub use ingest_core as core;
pub use ingest_http as http;

pub use upload::Upload;

// Re-export commonly used types
pub use ingest_core::{
    Boundary, ErrorKind, IngestError, MalformedReason, ParsedFile, Preset, UnknownPreset,
    UploadConfig, UploadedFile, parse,
};
pub use ingest_http::{
    Body, BodyCollector, Request, Response, StatusCode, UploadMiddleware, collect_reader,
    collect_stream,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Body, IngestError, ParsedFile, Preset, Request, Response, StatusCode, Upload,
        UploadConfig, UploadMiddleware, UploadedFile,
    };
}
