use std::sync::Arc;

use tracing::info;
use vizassist_core::ImageHandle;

use crate::preview::{Preview, PreviewRegistry};

struct Selected {
    image: ImageHandle,
    preview: Preview,
}

/// Owner of the currently selected image and its preview.
///
/// At most one preview is live, and it always belongs to the current image.
pub struct ImageSource {
    registry: Arc<PreviewRegistry>,
    current: Option<Selected>,
}

impl ImageSource {
    pub fn new(registry: Arc<PreviewRegistry>) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    /// Replace the current image. The old preview is revoked before the new
    /// one is created.
    pub fn set(&mut self, image: ImageHandle) -> &str {
        self.clear();
        let preview = self.registry.create(&image);
        info!(name = %image.name, mime = %image.mime_type, bytes = image.len(), "Image selected");
        let selected = self.current.insert(Selected { image, preview });
        selected.preview.url()
    }

    /// Drop the image and revoke its preview. Returns whether anything was held.
    pub fn clear(&mut self) -> bool {
        match self.current.take() {
            Some(Selected { image, preview }) => {
                drop(preview);
                info!(name = %image.name, "Image cleared");
                true
            }
            None => false,
        }
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.current.as_ref().map(|s| &s.image)
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.preview.url())
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
