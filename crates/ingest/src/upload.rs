//! The `Upload` façade.
//!
//! One value bundles an [`UploadConfig`] with the "is a file required"
//! switch and hands out both ways of running it: [`Upload::parse`] on an
//! already collected body, or [`Upload::middleware`] for a host request.

use ingest_core::{IngestError, ParsedFile, Preset, UploadConfig, is_multipart, require_file};
use ingest_http::UploadMiddleware;
use tracing::debug;

/// Configured single-file upload.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    config: UploadConfig,
    require_file: bool,
}

impl Upload {
    /// Create an upload from an explicit configuration.
    #[must_use]
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            require_file: false,
        }
    }

    /// Create an upload from a named preset.
    #[must_use]
    pub fn from_preset(preset: Preset) -> Self {
        Self::new(preset.config())
    }

    /// Any type, 5 MiB.
    #[must_use]
    pub fn generic() -> Self {
        Self::from_preset(Preset::Generic)
    }

    /// JPEG, PNG, GIF or WebP images, 10 MiB.
    #[must_use]
    pub fn image() -> Self {
        Self::from_preset(Preset::Image)
    }

    /// PDF, Word or plain-text documents, 20 MiB.
    #[must_use]
    pub fn document() -> Self {
        Self::from_preset(Preset::Document)
    }

    /// Images or documents, 5 MiB.
    #[must_use]
    pub fn media() -> Self {
        Self::from_preset(Preset::Media)
    }

    /// Override the size limit.
    #[must_use]
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config = self.config.max_file_size(size);
        self
    }

    /// Override the form field that carries the file.
    #[must_use]
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.field_name(name);
        self
    }

    /// Override the MIME allowlist.
    #[must_use]
    pub fn allowed_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.allowed_mime_types(types);
        self
    }

    /// Treat a multipart body without a matching file as malformed.
    #[must_use]
    pub fn require_file(mut self, required: bool) -> Self {
        self.require_file = required;
        self
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Extract the file from a collected body.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ingest_core::parse`], plus
    /// `MalformedMultipart` when a file is required and a multipart body
    /// carries none. Non-multipart bodies always yield `Ok(None)`.
    pub fn parse(&self, body: &[u8], content_type: &str) -> Result<Option<ParsedFile>, IngestError> {
        let file = ingest_core::parse(body, content_type, &self.config)?;
        if self.require_file && is_multipart(content_type) {
            return require_file(file, &self.config).map(Some);
        }
        Ok(file)
    }

    /// Build the host middleware for this upload.
    #[must_use]
    pub fn middleware(&self) -> UploadMiddleware {
        debug!(
            field = self.config.get_field_name(),
            max = self.config.get_max_file_size(),
            require_file = self.require_file,
            "building upload middleware"
        );
        UploadMiddleware::new(self.config.clone()).require_file(self.require_file)
    }
}

impl From<Preset> for Upload {
    fn from(preset: Preset) -> Self {
        Self::from_preset(preset)
    }
}

impl From<UploadConfig> for Upload {
    fn from(config: UploadConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest_core::{DEFAULT_FIELD_NAME, ErrorKind};

    const MIB: usize = 1024 * 1024;

    fn body(field: &str, mime: &str) -> Vec<u8> {
        format!(
            "--b\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"x\"\r\n\
             Content-Type: {mime}\r\n\r\nbytes\r\n--b--\r\n"
        )
        .into_bytes()
    }

    #[test]
    fn presets_carry_their_limits() {
        assert_eq!(Upload::generic().config().get_max_file_size(), 5 * MIB);
        assert_eq!(Upload::image().config().get_max_file_size(), 10 * MIB);
        assert_eq!(Upload::document().config().get_max_file_size(), 20 * MIB);
        assert_eq!(Upload::media().config().get_max_file_size(), 5 * MIB);
        assert!(Upload::generic().config().get_allowed_mime_types().is_none());
        assert_eq!(Upload::image().config().get_field_name(), DEFAULT_FIELD_NAME);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let upload = Upload::image()
            .max_file_size(MIB)
            .field_name("avatar")
            .allowed_mime_types(["image/png"]);
        let config = upload.config();
        assert_eq!(config.get_max_file_size(), MIB);
        assert_eq!(config.get_field_name(), "avatar");
        assert_eq!(
            config.get_allowed_mime_types(),
            Some(&["image/png".to_owned()][..])
        );
    }

    #[test]
    fn parse_uses_configured_field() {
        let upload = Upload::generic().field_name("avatar");
        let file = upload
            .parse(&body("avatar", "image/png"), "multipart/form-data; boundary=b")
            .unwrap()
            .unwrap();
        assert_eq!(file.content(), b"bytes");
        assert!(upload
            .parse(&body("file", "image/png"), "multipart/form-data; boundary=b")
            .unwrap()
            .is_none());
    }

    #[test]
    fn required_file_turns_absence_into_error() {
        let upload = Upload::generic().require_file(true);
        let err = upload
            .parse(&body("other", "image/png"), "multipart/form-data; boundary=b")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMultipart);
        assert_eq!(err.status_code(), 400);

        // Requests that are not multipart never require a file.
        assert!(upload.parse(b"{}", "application/json").unwrap().is_none());
    }

    #[test]
    fn document_preset_rejects_images() {
        let err = Upload::document()
            .parse(&body("file", "image/png"), "multipart/form-data; boundary=b")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
    }
}
