//! Boundary extraction and binary-safe body splitting.

use memchr::memmem;

use crate::error::MalformedReason;

/// RFC 2046 recommends multipart boundary length <= 70 characters.
pub const MAX_BOUNDARY_LEN: usize = 70;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Returns true when the Content-Type announces `multipart/form-data`.
///
/// Anything else means the engine does not apply to the request.
#[must_use]
pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|main| main.trim().eq_ignore_ascii_case(MULTIPART_FORM_DATA))
}

/// A validated multipart boundary token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    token: String,
    delimiter: Vec<u8>,
}

impl Boundary {
    /// Create a boundary from a raw token.
    pub fn new(token: &str) -> Result<Self, MalformedReason> {
        if token.is_empty() {
            return Err(MalformedReason::EmptyBoundary);
        }
        if token.len() > MAX_BOUNDARY_LEN {
            return Err(MalformedReason::BoundaryTooLong {
                max: MAX_BOUNDARY_LEN,
            });
        }
        Ok(Self {
            token: token.to_string(),
            delimiter: format!("--{token}").into_bytes(),
        })
    }

    /// Parse the boundary from a Content-Type header.
    ///
    /// Content-Type format: `multipart/form-data; boundary=----WebKitFormBoundary...`
    pub fn from_content_type(content_type: &str) -> Result<Self, MalformedReason> {
        for param in content_type.split(';').skip(1) {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("boundary") {
                return Self::new(strip_quotes(value.trim()));
            }
        }
        Err(MalformedReason::MissingBoundary)
    }

    /// The token as declared in the header.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The delimiter line prefix, `--` followed by the token.
    #[must_use]
    pub fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    /// Split `body` into candidate parts.
    #[must_use]
    pub fn split<'a>(&'a self, body: &'a [u8]) -> Parts<'a> {
        Parts::new(body, &self.delimiter)
    }
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Iterator over the raw candidate parts of a multipart body.
///
/// Yields every non-empty range strictly between two consecutive
/// delimiters, then the non-empty remainder after the last delimiter.
/// Bytes before the first delimiter are never yielded.
pub struct Parts<'a> {
    body: &'a [u8],
    finder: memmem::Finder<'a>,
    /// Start of the next candidate, `None` before the first delimiter is found.
    cursor: Option<usize>,
    done: bool,
}

impl<'a> Parts<'a> {
    fn new(body: &'a [u8], delimiter: &'a [u8]) -> Self {
        Self {
            body,
            finder: memmem::Finder::new(delimiter),
            cursor: None,
            done: false,
        }
    }

    fn delimiter_len(&self) -> usize {
        self.finder.needle().len()
    }
}

impl<'a> Iterator for Parts<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let start = match self.cursor {
                Some(start) => start,
                None => {
                    let Some(first) = self.finder.find(self.body) else {
                        self.done = true;
                        return None;
                    };
                    let start = first + self.delimiter_len();
                    self.cursor = Some(start);
                    start
                }
            };

            let body = self.body;
            let rest = &body[start..];
            if let Some(offset) = self.finder.find(rest) {
                self.cursor = Some(start + offset + self.delimiter_len());
                if offset > 0 {
                    return Some(&rest[..offset]);
                }
            } else {
                self.done = true;
                if !rest.is_empty() {
                    return Some(rest);
                }
            }
        }
        None
    }
}
