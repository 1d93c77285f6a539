//! Image upload validation and inline (`data:` URL) encoding.
//!
//! Logos and OG images are stored as references: either a remote
//! `http(s)://` URL or an inline `data:image/...;base64,` URL produced from an
//! uploaded file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

/// Largest accepted upload: 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Longest accepted inline reference: a base64-encoded 5 MiB file plus prefix.
pub const MAX_INLINE_REFERENCE_LEN: usize = (MAX_UPLOAD_BYTES as usize).div_ceil(3) * 4 + 64;

/// Upload formats accepted for logos and OG images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
}

impl ImageMime {
    pub fn parse(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Why an upload was not staged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File size too big (max 5MB)")]
    TooLarge { size: u64 },

    #[error("File type not supported: {0}")]
    UnsupportedType(String),

    #[error("File content does not match declared type {declared}")]
    ContentMismatch { declared: &'static str },
}

/// Validate an uploaded image and encode it as a `data:` URL.
///
/// `size` is the size reported for the file; the byte slice is checked too
/// so a mis-reported size cannot slip past the limit.
pub fn encode_image_upload(bytes: &[u8], mime: &str, size: u64) -> Result<String, UploadRejection> {
    let size = size.max(bytes.len() as u64);
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge { size });
    }

    let declared =
        ImageMime::parse(mime).ok_or_else(|| UploadRejection::UnsupportedType(mime.to_string()))?;

    match image::guess_format(bytes) {
        Ok(format) if format == declared.format() => {}
        _ => {
            return Err(UploadRejection::ContentMismatch {
                declared: declared.as_str(),
            })
        }
    }

    Ok(format!(
        "data:{};base64,{}",
        declared.as_str(),
        STANDARD.encode(bytes)
    ))
}

/// Check a stored image reference: remote URL or inline PNG/JPEG.
pub fn validate_image_reference(reference: &str) -> Result<(), String> {
    if reference.starts_with("https://") || reference.starts_with("http://") {
        if reference.chars().any(char::is_whitespace) {
            return Err("image URL must not contain whitespace".to_string());
        }
        return Ok(());
    }

    let Some(rest) = reference.strip_prefix("data:") else {
        return Err("image must be an http(s) URL or a data URL".to_string());
    };
    if reference.len() > MAX_INLINE_REFERENCE_LEN {
        return Err("inline image exceeds the 5MB limit".to_string());
    }
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| "data URL must be base64-encoded".to_string())?;
    if ImageMime::parse(mime).is_none() {
        return Err(format!("unsupported image type {mime}"));
    }
    if payload.is_empty() {
        return Err("data URL payload is empty".to_string());
    }
    Ok(())
}
