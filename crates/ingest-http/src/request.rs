//! Minimal host-facing request type.
//!
//! Hosts translate their own request into this shape before running the
//! upload middleware, and read the extracted upload back out of its
//! extensions afterwards.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::pin::Pin;

use futures_util::Stream;
use ingest_core::{ParsedFile, UploadedFile};

/// Streaming request body.
pub type BodyStream = Pin<Box<dyn Stream<Item = io::Result<Vec<u8>>> + Send>>;

/// HTTP headers collection.
#[derive(Debug, Default, Clone)]
pub struct Headers {
    inner: HashMap<String, Vec<u8>>,
}

impl Headers {
    /// Create empty headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a header value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// Get a header value as text, if it is valid UTF-8.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Insert a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.inner
            .insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Request body.
pub enum Body {
    /// Empty body.
    Empty,
    /// Fully buffered body.
    Bytes(Vec<u8>),
    /// Body still arriving from the connection.
    Stream(BodyStream),
}

impl Body {
    /// Wrap a chunk stream as a body.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Vec<u8>>> + Send + 'static,
    {
        Self::Stream(Box::pin(stream))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// HTTP request as seen by the upload middleware.
pub struct Request {
    method: String,
    path: String,
    headers: Headers,
    body: Body,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Request {
    /// Create a new request.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Headers::new(),
            body: Body::Empty,
            extensions: HashMap::new(),
        }
    }

    /// Builder-style header insertion.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Builder-style body assignment.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Get the HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get mutable headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Get the body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Take the body, replacing with Empty.
    pub fn take_body(&mut self) -> Body {
        std::mem::replace(&mut self.body, Body::Empty)
    }

    /// Set the body.
    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    /// Insert a typed extension value.
    pub fn insert_extension<T: Any + Send + Sync>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a typed extension value.
    #[must_use]
    pub fn get_extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Remove and return a typed extension value.
    pub fn take_extension<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// The file extracted by the upload middleware, if any.
    #[must_use]
    pub fn parsed_file(&self) -> Option<&ParsedFile> {
        self.get_extension::<ParsedFile>()
    }

    /// Take the extracted upload as the `{buffer, mime_type, original_name}` triple.
    pub fn take_upload(&mut self) -> Option<UploadedFile> {
        self.take_extension::<ParsedFile>().map(UploadedFile::from)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "multipart/form-data; boundary=X");
        assert_eq!(
            headers.get_str("content-type"),
            Some("multipart/form-data; boundary=X")
        );
        assert_eq!(headers.get("CONTENT-TYPE").map(<[u8]>::len), Some(31));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn non_utf8_header_has_no_text() {
        let mut headers = Headers::new();
        headers.insert("x-raw", vec![0xff, 0xfe]);
        assert!(headers.get("x-raw").is_some());
        assert!(headers.get_str("x-raw").is_none());
    }

    #[test]
    fn extensions_round_trip() {
        let mut req = Request::new("POST", "/upload");
        req.insert_extension(ParsedFile::new("file", "a.txt", "text/plain", b"hi".to_vec()));
        assert_eq!(req.parsed_file().map(ParsedFile::size), Some(2));

        let upload = req.take_upload().unwrap();
        assert_eq!(upload.original_name, "a.txt");
        assert_eq!(upload.buffer, b"hi");
        assert!(req.parsed_file().is_none());
    }

    #[test]
    fn take_body_leaves_empty() {
        let mut req = Request::new("POST", "/").with_body(Body::Bytes(vec![1, 2, 3]));
        assert!(matches!(req.take_body(), Body::Bytes(b) if b.len() == 3));
        assert!(matches!(req.body(), Body::Empty));
    }
}
