//! Image uploads: file loading and content sniffing.
//!
//! Only files whose bytes carry a known image signature are accepted. The
//! extension is never trusted; a `.jpg` containing text is rejected and a
//! PNG named `scan` goes through.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::ClientError;

/// An image ready to be posted to `/classify-image`.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read an image from disk, naming the upload after the file.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = std::fs::read(path).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Self::from_bytes(file_name, bytes)
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ClientError> {
        let file_name = file_name.into();
        let format =
            image::guess_format(&bytes).map_err(|_| ClientError::NotAnImage {
                file_name: file_name.clone(),
            })?;
        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }

    pub fn mime(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Upload size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Pixel dimensions, read from the image header.
    ///
    /// `None` when the header is truncated or the format has no decoder.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        ImageReader::with_format(Cursor::new(&self.bytes), self.format)
            .into_dimensions()
            .ok()
    }
}
