//! Core extraction engine for ingest.
//!
//! This crate pulls one uploaded file out of a raw `multipart/form-data`
//! body without any multipart library and without any HTTP framework:
//!
//! - [`Boundary`] parsing and binary-safe splitting of the body into candidate parts
//! - Part parsing with an explicit header tokenizer ([`part`])
//! - MIME allowlist checks ([`mime`])
//! - [`UploadConfig`] and the named [`Preset`]s
//! - The [`IngestError`] taxonomy with its HTTP status mapping
//!
//! The entry point is [`parse`], a pure function of the collected body and the
//! configuration. Collecting the body under a size limit is the job of the
//! host adapter (`ingest-http`).
//!
//! # Example
//!
//! ```
//! use ingest_core::{UploadConfig, parse};
//!
//! let body = b"--X\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
//! Content-Type: text/plain\r\n\r\nhello\r\n--X--\r\n";
//! let file = parse(body, "multipart/form-data; boundary=X", &UploadConfig::default())?
//!     .expect("file part");
//! assert_eq!(file.original_name(), "a.txt");
//! assert_eq!(file.content(), b"hello");
//! # Ok::<(), ingest_core::IngestError>(())
//! ```

#![forbid(unsafe_code)]

pub mod boundary;
pub mod config;
pub mod error;
mod extract;
mod file;
pub mod mime;
pub mod part;

pub use boundary::{Boundary, MAX_BOUNDARY_LEN, Parts, is_multipart};
pub use config::{DEFAULT_FIELD_NAME, DEFAULT_MAX_FILE_SIZE, Preset, UnknownPreset, UploadConfig};
pub use error::{ErrorKind, IngestError, MalformedReason};
pub use extract::{extract, find_file, parse, require_file};
pub use file::{ParsedFile, UploadedFile};
pub use mime::check_allowed;
pub use part::{ContentDisposition, DEFAULT_CONTENT_TYPE, SkipReason};
