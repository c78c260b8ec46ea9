use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::{AssistError, Result};
use crate::mime::{detect_mime_type, is_image};

/// The selected image: payload, MIME type and display name.
///
/// Cloning is cheap; the payload is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl ImageHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Read an image file from disk. Non-image files are rejected.
    pub async fn load(path: &Path) -> Result<Self> {
        let mime = detect_mime_type(path);
        if !is_image(mime) {
            return Err(AssistError::InvalidImage(format!(
                "{} is not an image file",
                path.display()
            )));
        }
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| AssistError::InvalidImage(format!("{}: {e}", path.display())))?;
        if data.is_empty() {
            return Err(AssistError::InvalidImage(format!("{} is empty", path.display())));
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        debug!(name = %name, mime, bytes = data.len(), "Loaded image from disk");
        Ok(Self::new(name, mime, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
