//! Single-file extraction over a fully collected body.

use tracing::{debug, trace};

use crate::boundary::{Boundary, is_multipart};
use crate::config::UploadConfig;
use crate::error::{IngestError, MalformedReason};
use crate::file::ParsedFile;
use crate::mime::check_allowed;
use crate::part::parse_candidate;

/// Extract the configured file from a collected request body.
///
/// - A non-multipart `content_type` returns `Ok(None)`: the engine does not apply.
/// - A multipart type without a usable boundary fails with `MalformedMultipart`.
/// - A body larger than the configured limit fails with `SizeLimitExceeded`.
/// - No part carrying a filename under the configured field returns `Ok(None)`.
pub fn parse(
    body: &[u8],
    content_type: &str,
    config: &UploadConfig,
) -> Result<Option<ParsedFile>, IngestError> {
    if !is_multipart(content_type) {
        trace!(content_type, "not a multipart body, skipping extraction");
        return Ok(None);
    }
    let boundary = Boundary::from_content_type(content_type)?;
    extract(body, &boundary, config)
}

/// Extract the configured file using an already parsed boundary.
pub fn extract(
    body: &[u8],
    boundary: &Boundary,
    config: &UploadConfig,
) -> Result<Option<ParsedFile>, IngestError> {
    let max = config.get_max_file_size();
    if body.len() > max {
        debug!(size = body.len(), max, "upload body over limit");
        return Err(IngestError::SizeLimitExceeded {
            size: body.len(),
            max,
        });
    }

    let Some(file) = find_file(body, boundary, config.get_field_name()) else {
        debug!(field = config.get_field_name(), "no file part in upload");
        return Ok(None);
    };

    check_allowed(file.mime_type(), config.get_allowed_mime_types()).inspect_err(|_| {
        debug!(mime_type = file.mime_type(), "upload content type not allowed");
    })?;

    debug!(
        field = file.field_name(),
        filename = file.original_name(),
        mime_type = file.mime_type(),
        size = file.size(),
        "extracted upload"
    );
    Ok(Some(file))
}

/// Return the first part under `field_name` that carries a filename.
///
/// Later parts with the same field name are ignored.
#[must_use]
pub fn find_file(body: &[u8], boundary: &Boundary, field_name: &str) -> Option<ParsedFile> {
    boundary
        .split(body)
        .find_map(|raw| match parse_candidate(raw, field_name) {
            Ok(file) => Some(file),
            Err(reason) => {
                trace!(reason = reason.as_str(), len = raw.len(), "skipping part");
                None
            }
        })
}

/// Turn an absent file into an error for callers that require an upload.
pub fn require_file(
    file: Option<ParsedFile>,
    config: &UploadConfig,
) -> Result<ParsedFile, IngestError> {
    file.ok_or_else(|| {
        MalformedReason::MissingFile {
            field: config.get_field_name().to_string(),
        }
        .into()
    })
}
