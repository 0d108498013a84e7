//! Image upload rules and stored file naming.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::validation::FieldError;

/// Public URL prefix under which stored files are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

/// Image formats accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageType {
    /// Resolve a declared MIME type.
    pub fn from_content_type(content_type: &str) -> Result<Self, FieldError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/gif" => Ok(Self::Gif),
            "image/webp" => Ok(Self::Webp),
            _ => Err(FieldError::new(
                "file",
                "unsupported_media_type",
                "file must be a JPEG, PNG, GIF or WebP image",
            )),
        }
    }

    /// Resolve a stored file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Canonical MIME type.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// File extension used for stored names.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Server-generated file name: `<uuid>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredName {
    name: String,
    image_type: ImageType,
}

impl StoredName {
    /// Generate a fresh name for `image_type`.
    #[must_use]
    pub fn generate(image_type: ImageType) -> Self {
        Self {
            name: format!("{}.{}", Uuid::new_v4().simple(), image_type.extension()),
            image_type,
        }
    }

    /// Accept only names this server could have generated.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (stem, extension) = raw.split_once('.')?;
        let image_type = ImageType::from_extension(extension)?;
        let well_formed = stem.len() == 32 && stem.chars().all(|c| c.is_ascii_hexdigit());
        well_formed.then(|| Self {
            name: raw.to_owned(),
            image_type,
        })
    }

    /// File name relative to the upload root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Stored image type.
    #[must_use]
    pub const fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Public URL for this file.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{UPLOAD_URL_PREFIX}{}", self.name)
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredUpload {
    /// Path to reference from `imageUrl`/`avatarUrl` fields.
    pub url: String,
    pub content_type: String,
    pub size: u64,
}

/// Error raised when an upload exceeds the configured limit.
#[must_use]
pub fn file_too_large(limit: u64) -> FieldError {
    FieldError::new(
        "file",
        "file_too_large",
        format!("file must be at most {limit} bytes"),
    )
}
