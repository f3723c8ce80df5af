//! Candidate part parsing.
//!
//! A candidate is split into a header block and a body block at the first
//! `CRLFCRLF`. The header block is read with a small line tokenizer and the
//! `Content-Disposition` parameters with a quote-aware scanner, so no
//! backtracking pattern ever runs over untrusted input.

use memchr::memmem;

use crate::file::ParsedFile;

/// Content type assumed when a part does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Why a candidate part did not yield a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `CRLFCRLF` separator, usually the closing `--` trailer.
    NoHeaderTerminator,
    /// No usable `Content-Disposition: form-data; name=...` header.
    NoDisposition,
    /// The part belongs to another field.
    FieldMismatch,
    /// The part is a plain form field without a filename.
    NotAFile,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoHeaderTerminator => "no_header_terminator",
            Self::NoDisposition => "no_disposition",
            Self::FieldMismatch => "field_mismatch",
            Self::NotAFile => "not_a_file",
        }
    }
}

/// Parsed `Content-Disposition` of a form-data part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// Field name from the `name` parameter.
    pub name: String,
    /// Filename from the `filename` parameter (if present and non-empty).
    pub filename: Option<String>,
}

impl ContentDisposition {
    /// Parse a header value of the form `form-data; name="field"; filename="file.txt"`.
    ///
    /// Returns `None` unless the disposition type is `form-data` and a
    /// `name` parameter is present.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut params = Params::new(value);
        let disposition = params.next()?;
        if !disposition.eq_ignore_ascii_case("form-data") {
            return None;
        }

        let mut name = None;
        let mut filename = None;
        for param in params {
            let Some((key, raw)) = param.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.eq_ignore_ascii_case("name") && name.is_none() {
                name = Some(unquote(raw).to_string());
            } else if key.eq_ignore_ascii_case("filename") && filename.is_none() {
                filename = Some(unquote(raw).to_string());
            }
        }

        Some(Self {
            name: name?,
            filename: filename.filter(|f| !f.is_empty()),
        })
    }
}

/// Splits a header value on `;` outside of quoted strings.
struct Params<'a> {
    rest: &'a str,
}

impl<'a> Params<'a> {
    fn new(value: &'a str) -> Self {
        Self { rest: value }
    }
}

impl<'a> Iterator for Params<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.rest.is_empty() {
                return None;
            }
            let mut quote = None;
            let mut end = self.rest.len();
            for (i, b) in self.rest.bytes().enumerate() {
                match (quote, b) {
                    (None, b'"' | b'\'') => quote = Some(b),
                    (Some(q), _) if q == b => quote = None,
                    (None, b';') => {
                        end = i;
                        break;
                    }
                    _ => {}
                }
            }
            let token = self.rest[..end].trim();
            self.rest = self.rest.get(end + 1..).unwrap_or("");
            if !token.is_empty() {
                return Some(token);
            }
        }
    }
}

fn unquote(raw: &str) -> &str {
    let s = raw.trim();
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Header lines of one part, names lowercased.
#[derive(Debug, Default)]
struct PartHeaders {
    content_disposition: Option<String>,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(block: &str) -> Self {
        let mut headers = Self::default();
        for line in block.split("\r\n") {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-disposition") {
                headers.content_disposition.get_or_insert_with(|| value.to_string());
            } else if name.eq_ignore_ascii_case("content-type") && !value.is_empty() {
                headers.content_type.get_or_insert_with(|| value.to_string());
            }
        }
        headers
    }
}

/// Removes delimiter bleed-through from the end of a part body.
///
/// The splitter cuts at `--boundary`, leaving the `\r\n` that precedes it
/// attached to the body. Interior bytes are never inspected.
fn trim_delimiter_tail(body: &[u8]) -> &[u8] {
    if let Some(stripped) = body.strip_suffix(b"\r\n--") {
        return stripped;
    }
    body.strip_suffix(b"\r\n").unwrap_or(body)
}

/// Try to extract the target file from one candidate part.
pub fn parse_candidate(raw: &[u8], field_name: &str) -> Result<ParsedFile, SkipReason> {
    let split =
        memmem::find(raw, HEADER_TERMINATOR).ok_or(SkipReason::NoHeaderTerminator)?;
    let header_block = String::from_utf8_lossy(&raw[..split]);
    let body = &raw[split + HEADER_TERMINATOR.len()..];

    let headers = PartHeaders::parse(&header_block);
    let disposition = headers
        .content_disposition
        .as_deref()
        .and_then(ContentDisposition::parse)
        .ok_or(SkipReason::NoDisposition)?;

    if disposition.name != field_name {
        return Err(SkipReason::FieldMismatch);
    }
    let original_name = disposition.filename.ok_or(SkipReason::NotAFile)?;
    let mime_type = headers
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    Ok(ParsedFile::new(
        disposition.name,
        original_name,
        mime_type,
        trim_delimiter_tail(body).to_vec(),
    ))
}
