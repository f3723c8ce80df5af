//! Responses produced by the upload middleware.

use ingest_core::IngestError;
use serde::Serialize;

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: Self = Self(200);
    pub const BAD_REQUEST: Self = Self(400);
    pub const PAYLOAD_TOO_LARGE: Self = Self(413);
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Create a status code from its numeric value.
    #[must_use]
    pub fn from_u16(code: u16) -> Self {
        Self(code)
    }

    /// Numeric value.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Standard reason phrase.
    #[must_use]
    pub fn canonical_reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            413 => "Payload Too Large",
            500 => "Internal Server Error",
            _ => "",
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: String,
}

/// HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, Vec<u8>)>,
    body: Vec<u8>,
}

impl Response {
    /// Create an empty response with the given status.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Build the error response for an ingestion failure.
    ///
    /// Oversized and broken uploads also carry `Connection: close` so the
    /// host stops reading the rest of the body.
    #[must_use]
    pub fn from_error(err: &IngestError) -> Self {
        let body = ErrorBody {
            error: err.kind().as_str(),
            detail: err.to_string(),
        };
        let json = serde_json::to_vec(&body).unwrap_or_default();
        let mut response = Self::new(StatusCode::from_u16(err.status_code()))
            .header("content-type", "application/json")
            .body(json);
        if err.closes_connection() {
            response = response.header("connection", "close");
        }
        response
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Get the status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get all headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, Vec<u8>)] {
        &self.headers
    }

    /// Get the first header value with this name (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Get the body bytes.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Split into status, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, Vec<(String, Vec<u8>)>, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}
