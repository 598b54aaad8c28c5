//! The file-feature record and its canonical serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pixel or point dimensions of a page or image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Dimensions of a raster image.
    pub fn of_pixels(width: u32, height: u32) -> Dimensions {
        Dimensions {
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// Dimensions of a PDF page in points.
    pub fn of_points(width: f64, height: f64) -> Dimensions {
        Dimensions { width, height }
    }
}

impl fmt::Display for Dimensions {
    /// Renders `WxH`: integers for whole-pixel sizes, two decimals for
    /// fractional point sizes. The rendering feeds the canonical string, so
    /// it is wire format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width.fract() == 0.0 && self.height.fract() == 0.0 {
            write!(f, "{}x{}", self.width as u64, self.height as u64)
        } else {
            write!(f, "{:.2}x{:.2}", self.width, self.height)
        }
    }
}

/// Feature record computed from a raw file.
///
/// Only `file_kind`, `file_size`, and `content_hash` are always present;
/// the rest depend on what the file kind exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFeatures {
    /// `PDF`, `IMAGE`, or the uppercased extension.
    pub file_kind: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Sixteen-hex content hash; the construction depends on the kind.
    pub content_hash: String,
    /// Perceptual visual hash of the rendered content.
    pub visual_hash: Option<String>,
    /// Hash of the extracted text.
    pub text_hash: Option<String>,
    /// Hash of the key-sorted metadata dictionary.
    pub metadata_hash: Option<String>,
    /// Reserved for structural hashes; currently never populated but part
    /// of the canonical order.
    pub structure_hash: Option<String>,
    /// Hash of the serialized color histogram.
    pub color_profile_hash: Option<String>,
    /// Page or image dimensions.
    pub dimensions: Option<Dimensions>,
    /// Page count for paginated formats.
    pub page_count: Option<usize>,
    /// Filesystem creation time, seconds since the epoch.
    pub creation_time: Option<f64>,
    /// Filesystem modification time, seconds since the epoch.
    pub modification_time: Option<f64>,
}

impl FileFeatures {
    /// A record with only the always-present fields populated.
    pub fn bare(file_kind: impl Into<String>, file_size: u64, content_hash: String) -> FileFeatures {
        FileFeatures {
            file_kind: file_kind.into(),
            file_size,
            content_hash,
            visual_hash: None,
            text_hash: None,
            metadata_hash: None,
            structure_hash: None,
            color_profile_hash: None,
            dimensions: None,
            page_count: None,
            creation_time: None,
            modification_time: None,
        }
    }

    /// The fixed-order `|`-joined canonical feature string.
    ///
    /// The order is wire contract: kind, size, content hash, visual hash,
    /// text hash, metadata hash, structure hash, color hash, dimensions,
    /// page count, floored creation time, floored modification time.
    /// Missing features become empty segments.
    pub fn canonical_string(&self) -> String {
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();
        [
            self.file_kind.clone(),
            self.file_size.to_string(),
            self.content_hash.clone(),
            opt(&self.visual_hash),
            opt(&self.text_hash),
            opt(&self.metadata_hash),
            opt(&self.structure_hash),
            opt(&self.color_profile_hash),
            self.dimensions.map(|d| d.to_string()).unwrap_or_default(),
            self.page_count.map(|n| n.to_string()).unwrap_or_default(),
            self.creation_time
                .map(|t| (t.floor() as i64).to_string())
                .unwrap_or_default(),
            self.modification_time
                .map(|t| (t.floor() as i64).to_string())
                .unwrap_or_default(),
        ]
        .join("|")
    }

    /// Kind code used in the universal identifier: `PDF` stays `PDF`, every
    /// raster image kind maps to `IMG`, anything else truncates to its
    /// first three characters.
    pub fn kind_code(&self) -> String {
        match self.file_kind.as_str() {
            "PDF" => "PDF".to_string(),
            "IMAGE" | "JPG" | "JPEG" | "PNG" | "GIF" | "BMP" | "TIFF" | "WEBP" => {
                "IMG".to_string()
            }
            other => other.chars().take(3).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_render_pixels_and_points() {
        assert_eq!(Dimensions::of_pixels(1024, 768).to_string(), "1024x768");
        assert_eq!(Dimensions::of_points(595.28, 841.89).to_string(), "595.28x841.89");
    }

    #[test]
    fn canonical_string_has_twelve_segments() {
        let features = FileFeatures::bare("TXT", 10, "0123456789abcdef".into());
        let canonical = features.canonical_string();
        assert_eq!(canonical.split('|').count(), 12);
        assert!(canonical.starts_with("TXT|10|0123456789abcdef|"));
    }

    #[test]
    fn timestamps_are_floored() {
        let mut features = FileFeatures::bare("TXT", 1, "x".into());
        features.creation_time = Some(1700000000.9);
        features.modification_time = Some(1700000001.2);
        let canonical = features.canonical_string();
        assert!(canonical.ends_with("|1700000000|1700000001"));
    }

    #[test]
    fn kind_codes() {
        assert_eq!(FileFeatures::bare("PDF", 0, String::new()).kind_code(), "PDF");
        assert_eq!(FileFeatures::bare("IMAGE", 0, String::new()).kind_code(), "IMG");
        assert_eq!(FileFeatures::bare("JPEG", 0, String::new()).kind_code(), "IMG");
        assert_eq!(FileFeatures::bare("DOCX", 0, String::new()).kind_code(), "DOC");
        assert_eq!(FileFeatures::bare("XML", 0, String::new()).kind_code(), "XML");
    }
}
