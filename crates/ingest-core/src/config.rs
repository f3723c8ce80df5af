//! Upload configuration and named presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mime::{DOCUMENT_MIME_TYPES, IMAGE_MIME_TYPES, to_owned_list};

const MIB: usize = 1024 * 1024;

/// Default field name carrying the file.
pub const DEFAULT_FIELD_NAME: &str = "file";

/// Default maximum upload size (5MB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * MIB;

/// Configuration for single-file extraction.
///
/// Deserializes from `{"fieldName": ..., "maxFileSize": ..., "allowedMimeTypes": [...]}`;
/// missing keys fall back to the generic preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadConfig {
    /// Form field the file is expected under.
    field_name: String,
    /// Maximum size of the whole request body in bytes.
    max_file_size: usize,
    /// Accepted content types; `None` or empty accepts all.
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_mime_types: Option<Vec<String>>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_FIELD_NAME.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: None,
        }
    }
}

impl UploadConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the field name.
    #[must_use]
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Set the maximum upload size.
    #[must_use]
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Restrict accepted content types.
    #[must_use]
    pub fn allowed_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_mime_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Accept any content type.
    #[must_use]
    pub fn allow_any_mime_type(mut self) -> Self {
        self.allowed_mime_types = None;
        self
    }

    /// Get the field name.
    #[must_use]
    pub fn get_field_name(&self) -> &str {
        &self.field_name
    }

    /// Get the maximum upload size.
    #[must_use]
    pub fn get_max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Get the accepted content types, if restricted.
    #[must_use]
    pub fn get_allowed_mime_types(&self) -> Option<&[String]> {
        self.allowed_mime_types.as_deref()
    }
}

/// Named configuration bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Any type, 5MB.
    Generic,
    /// JPEG, PNG, GIF and WebP, 10MB.
    Image,
    /// PDF, Word and plain text, 20MB.
    Document,
    /// Images and documents, 5MB.
    Media,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Self::Generic, Self::Image, Self::Document, Self::Media];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Image => "image",
            Self::Document => "document",
            Self::Media => "media",
        }
    }

    /// Default size limit of the preset.
    #[must_use]
    pub fn default_max_file_size(self) -> usize {
        match self {
            Self::Generic | Self::Media => 5 * MIB,
            Self::Image => 10 * MIB,
            Self::Document => 20 * MIB,
        }
    }

    /// Content types the preset accepts, `None` for any.
    #[must_use]
    pub fn allowed_mime_types(self) -> Option<Vec<String>> {
        match self {
            Self::Generic => None,
            Self::Image => Some(to_owned_list(IMAGE_MIME_TYPES)),
            Self::Document => Some(to_owned_list(DOCUMENT_MIME_TYPES)),
            Self::Media => Some(
                IMAGE_MIME_TYPES
                    .iter()
                    .chain(DOCUMENT_MIME_TYPES)
                    .map(|t| (*t).to_string())
                    .collect(),
            ),
        }
    }

    /// Build the configuration for this preset.
    #[must_use]
    pub fn config(self) -> UploadConfig {
        UploadConfig {
            field_name: DEFAULT_FIELD_NAME.to_string(),
            max_file_size: self.default_max_file_size(),
            allowed_mime_types: self.allowed_mime_types(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown upload preset '{0}'")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

impl From<Preset> for UploadConfig {
    fn from(preset: Preset) -> Self {
        preset.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_generic_preset() {
        assert_eq!(UploadConfig::default(), Preset::Generic.config());
        assert_eq!(UploadConfig::new().get_field_name(), "file");
        assert_eq!(UploadConfig::new().get_max_file_size(), 5 * 1024 * 1024);
        assert!(UploadConfig::new().get_allowed_mime_types().is_none());
    }

    #[test]
    fn builder_setters() {
        let config = UploadConfig::new()
            .field_name("avatar")
            .max_file_size(1024)
            .allowed_mime_types(["image/png"]);
        assert_eq!(config.get_field_name(), "avatar");
        assert_eq!(config.get_max_file_size(), 1024);
        assert_eq!(
            config.get_allowed_mime_types(),
            Some(&["image/png".to_string()][..])
        );
        assert!(config.allow_any_mime_type().get_allowed_mime_types().is_none());
    }

    #[test]
    fn preset_table() {
        let image = Preset::Image.config();
        assert_eq!(image.get_max_file_size(), 10 * 1024 * 1024);
        assert_eq!(image.get_allowed_mime_types().unwrap().len(), 4);

        let document = Preset::Document.config();
        assert_eq!(document.get_max_file_size(), 20 * 1024 * 1024);
        assert!(
            document
                .get_allowed_mime_types()
                .unwrap()
                .iter()
                .any(|m| m == "application/pdf")
        );

        let media = Preset::Media.config();
        assert_eq!(media.get_max_file_size(), 5 * 1024 * 1024);
        let allowed = media.get_allowed_mime_types().unwrap();
        assert_eq!(allowed.len(), 8);
        assert!(allowed.iter().any(|m| m == "image/webp"));
        assert!(allowed.iter().any(|m| m == "text/plain"));

        for preset in Preset::ALL {
            assert_eq!(preset.config().get_field_name(), "file");
        }
    }

    #[test]
    fn preset_from_str() {
        assert_eq!("image".parse::<Preset>(), Ok(Preset::Image));
        assert_eq!(" Media ".parse::<Preset>(), Ok(Preset::Media));
        assert_eq!(
            "video".parse::<Preset>(),
            Err(UnknownPreset("video".to_string()))
        );
        assert_eq!(Preset::Document.to_string(), "document");
    }

    #[test]
    fn config_from_json() {
        let config = UploadConfig::from_json(
            r#"{"fieldName": "attachment", "maxFileSize": 2048, "allowedMimeTypes": ["text/plain"]}"#,
        )
        .unwrap();
        assert_eq!(config.get_field_name(), "attachment");
        assert_eq!(config.get_max_file_size(), 2048);
        assert_eq!(config.get_allowed_mime_types().unwrap(), ["text/plain"]);

        let partial = UploadConfig::from_json(r#"{"maxFileSize": 10}"#).unwrap();
        assert_eq!(partial.get_field_name(), "file");
        assert!(partial.get_allowed_mime_types().is_none());
    }

    #[test]
    fn config_serializes_camel_case() {
        let json = serde_json::to_value(Preset::Image.config()).unwrap();
        assert_eq!(json["fieldName"], "file");
        assert_eq!(json["maxFileSize"], 10 * 1024 * 1024);
        assert_eq!(json["allowedMimeTypes"][0], "image/jpeg");

        let generic = serde_json::to_value(UploadConfig::default()).unwrap();
        assert!(generic.get("allowedMimeTypes").is_none());
    }
}
