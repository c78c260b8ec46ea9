//! Camera devices that need no hardware.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;
use vizassist_core::{AssistError, Result};

use crate::capture::{CameraDevice, RawFrame, StreamConstraints, VideoStream};

/// A host without a camera. Every open attempt fails with `Device`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCamera;

#[async_trait]
impl CameraDevice for NoCamera {
    async fn open(&self, _constraints: StreamConstraints) -> Result<Box<dyn VideoStream>> {
        Err(AssistError::Device("no camera device available".into()))
    }
}

/// A camera whose live frame is a fixed still image.
#[derive(Debug, Clone)]
pub struct StillFrameCamera {
    frame: RawFrame,
}

impl StillFrameCamera {
    pub fn new(frame: RawFrame) -> Self {
        Self { frame }
    }

    /// Decode an image file into the frame this camera will serve.
    pub fn from_file(path: &Path) -> Result<Self> {
        let decoded = image::open(path)
            .map_err(|e| AssistError::Device(format!("{}: {e}", path.display())))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        info!(path = %path.display(), width, height, "Still-frame camera loaded");
        Ok(Self::new(RawFrame {
            width,
            height,
            rgba: decoded.into_raw(),
        }))
    }
}

#[async_trait]
impl CameraDevice for StillFrameCamera {
    async fn open(&self, constraints: StreamConstraints) -> Result<Box<dyn VideoStream>> {
        if !constraints.video {
            return Err(AssistError::Device("still-frame camera only provides video".into()));
        }
        let id = format!("still-{}", Uuid::new_v4());
        debug!(stream = %id, "Opening still-frame stream");
        Ok(Box::new(StillStream {
            id,
            frame: Some(self.frame.clone()),
        }))
    }
}

struct StillStream {
    id: String,
    frame: Option<RawFrame>,
}

impl VideoStream for StillStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn current_frame(&self) -> Option<RawFrame> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MediaCapture;
    use std::sync::Arc;

    #[tokio::test]
    async fn no_camera_always_fails() {
        let capture = MediaCapture::new(Arc::new(NoCamera));
        assert!(matches!(
            capture.acquire().await,
            Err(AssistError::Device(_))
        ));
    }

    #[tokio::test]
    async fn still_camera_serves_frame_until_stopped() {
        let camera = StillFrameCamera::new(RawFrame {
            width: 1,
            height: 1,
            rgba: vec![0, 255, 0, 255],
        });
        let mut stream = camera.open(StreamConstraints::video_only()).await.unwrap();
        assert!(stream.id().starts_with("still-"));
        assert!(stream.current_frame().is_some());
        stream.stop();
        assert!(stream.current_frame().is_none());
    }

    #[test]
    fn still_camera_from_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let camera = StillFrameCamera::from_file(&path).unwrap();
        assert_eq!(camera.frame.width, 3);
        assert_eq!(camera.frame.height, 2);
        assert_eq!(camera.frame.rgba.len(), 3 * 2 * 4);
    }
}
