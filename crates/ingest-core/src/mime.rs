//! MIME type allowlist.

use crate::error::IngestError;

/// Image types accepted by the image preset.
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Document types accepted by the document preset.
pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Reject `mime_type` unless it appears in a non-empty `allowed` list.
///
/// Matching is exact: no wildcards, no parameter stripping, no case folding.
/// An absent or empty list allows everything.
pub fn check_allowed(mime_type: &str, allowed: Option<&[String]>) -> Result<(), IngestError> {
    match allowed {
        Some(list) if !list.is_empty() && !list.iter().any(|m| m == mime_type) => {
            Err(IngestError::UnsupportedMediaType {
                mime_type: mime_type.to_string(),
            })
        }
        _ => Ok(()),
    }
}

pub(crate) fn to_owned_list(types: &[&str]) -> Vec<String> {
    types.iter().map(|t| (*t).to_string()).collect()
}
