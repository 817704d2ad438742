//! Raster signature artifact.
//!
//! Signatures are stored as PNG bytes. On the record boundary they travel as
//! a `data:image/png;base64,...` URL string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ImageError;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// PNG-encoded raster image.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    png: Vec<u8>,
}

impl RasterImage {
    /// Wraps PNG bytes, checking the PNG signature.
    pub fn from_png(png: Vec<u8>) -> Result<Self, ImageError> {
        if png.len() < PNG_MAGIC.len() || png[..PNG_MAGIC.len()] != PNG_MAGIC {
            return Err(ImageError::NotPng);
        }
        Ok(Self { png })
    }

    /// Parses a `data:image/png;base64,` URL.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let encoded = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or(ImageError::UnsupportedDataUrl)?;
        let png = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ImageError::InvalidBase64(e.to_string()))?;
        Self::from_png(png)
    }

    /// Renders the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(&self.png))
    }

    /// Raw PNG bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn len(&self) -> usize {
        self.png.len()
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl Serialize for RasterImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for RasterImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        Self::from_data_url(&url).map_err(serde::de::Error::custom)
    }
}
