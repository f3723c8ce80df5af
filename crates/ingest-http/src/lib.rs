//! Bounded body collection and upload middleware.
//!
//! This crate connects the pure extraction in `ingest_core` to a running
//! HTTP server. It reads request bodies under a hard size limit and turns
//! ingestion failures into HTTP responses.
//!
//! # Features
//!
//! - Body collection from byte streams and readers with an exact size cap
//! - Early rejection from a declared `Content-Length`
//! - Upload middleware that attaches the extracted file to the request
//! - JSON error responses with status codes per failure kind
//!
//! # Example
//!
//! ```ignore
//! use ingest_http::{Body, Request, UploadMiddleware};
//! use ingest_core::Preset;
//!
//! let uploads = UploadMiddleware::new(Preset::Document.config()).require_file(true);
//! let mut req = Request::new("POST", "/documents")
//!     .with_header("content-type", content_type)
//!     .with_body(Body::stream(chunks));
//! let file = uploads.ingest(&mut req).await?;
//! ```

#![forbid(unsafe_code)]

pub mod collector;
mod middleware;
mod request;
mod response;

pub use collector::{
    BodyCollector, CollectState, DEFAULT_INITIAL_CAPACITY, READ_CHUNK_SIZE, check_content_length,
    collect_reader, collect_stream, collect_stream_with_hint, parse_content_length,
};
pub use middleware::UploadMiddleware;
pub use request::{Body, BodyStream, Headers, Request};
pub use response::{Response, StatusCode};
