//! Supported container formats and MIME-type detection.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Loose, case-insensitive match in the spirit of `/image\/(png|jpeg)/i.test(type)`.
/// Unanchored, so MIME types carrying parameters still match.
static MIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)image/(png|jpeg)").expect("MIME pattern is a valid regular expression")
});

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// An image container format the pipeline can decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect the format from a declared MIME type.
    ///
    /// Returns `None` for anything other than PNG or JPEG.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let captures = MIME_PATTERN.captures(mime)?;
        let subtype = captures.get(1)?.as_str();
        if subtype.eq_ignore_ascii_case("png") {
            Some(ImageFormat::Png)
        } else {
            Some(ImageFormat::Jpeg)
        }
    }

    /// Canonical MIME type string.
    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// Leading signature bytes every file of this format starts with.
    pub fn magic(self) -> &'static [u8] {
        match self {
            ImageFormat::Png => PNG_MAGIC,
            ImageFormat::Jpeg => JPEG_MAGIC,
        }
    }

    /// Check whether `bytes` start with this format's signature.
    pub fn matches_magic(self, bytes: &[u8]) -> bool {
        bytes.starts_with(self.magic())
    }

    /// The equivalent `image` crate format.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }

    /// Prefix of a base64 data URL carrying this format.
    pub fn data_url_prefix(self) -> String {
        format!("data:{};base64,", self.mime())
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}
