//! Extracted file types.

/// A file extracted from a multipart body.
///
/// `size()` is derived from the content, so it always matches the byte
/// length of the extracted body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    field_name: String,
    original_name: String,
    mime_type: String,
    content: Vec<u8>,
}

impl ParsedFile {
    /// Create a parsed file.
    #[must_use]
    pub fn new(
        field_name: impl Into<String>,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// The form field the file was submitted under.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The filename declared by the client.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// The declared Content-Type of the part.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The file bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Get the file size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Get the file extension from the filename.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.original_name
            .rsplit('.')
            .next()
            .filter(|ext| !ext.is_empty() && *ext != self.original_name)
    }

    /// Consume the file and return its content.
    #[must_use]
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

/// The upload as handed to feature-level use cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub buffer: Vec<u8>,
    pub mime_type: String,
    pub original_name: String,
}

impl From<ParsedFile> for UploadedFile {
    fn from(file: ParsedFile) -> Self {
        Self {
            buffer: file.content,
            mime_type: file.mime_type,
            original_name: file.original_name,
        }
    }
}
