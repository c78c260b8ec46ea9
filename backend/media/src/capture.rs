//! Live camera capture.
//!
//! A [`CaptureSession`] owns the device stream for as long as the camera is
//! open. Dropping the session stops every track, so each acquisition path has
//! exactly one release path whether the user captures, switches mode, or the
//! controller is torn down.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use image::{ImageFormat, RgbaImage};
use tracing::{debug, info, warn};
use vizassist_core::{AssistError, ImageHandle, Result};

/// What to request from the device. The workflow only ever asks for video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub video: bool,
    pub audio: bool,
}

impl StreamConstraints {
    pub fn video_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// A single decoded video frame in RGBA8 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A live stream handed out by a [`CameraDevice`].
pub trait VideoStream: Send + Sync {
    fn id(&self) -> &str;

    /// The most recent frame, or `None` if the stream has not produced one yet.
    fn current_frame(&self) -> Option<RawFrame>;

    /// Stop all underlying tracks and give the device back.
    fn stop(&mut self);
}

/// Host camera capability.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request a live stream. Fails with [`AssistError::Device`] when there is
    /// no camera or permission is denied.
    async fn open(&self, constraints: StreamConstraints) -> Result<Box<dyn VideoStream>>;
}

/// Exclusive handle on an acquired stream.
pub struct CaptureSession {
    id: String,
    stream: Option<Box<dyn VideoStream>>,
}

impl CaptureSession {
    fn new(stream: Box<dyn VideoStream>) -> Self {
        Self {
            id: stream.id().to_string(),
            stream: Some(stream),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Stop the stream. Calling this more than once is harmless.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!(stream = %self.id, "Camera stream released");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}

/// Acquires, samples, and releases camera streams.
#[derive(Clone)]
pub struct MediaCapture {
    device: Arc<dyn CameraDevice>,
}

impl MediaCapture {
    pub fn new(device: Arc<dyn CameraDevice>) -> Self {
        Self { device }
    }

    /// Open a video-only stream. Any device failure surfaces as `Device`.
    pub async fn acquire(&self) -> Result<CaptureSession> {
        let stream = self
            .device
            .open(StreamConstraints::video_only())
            .await
            .map_err(|e| match e {
                AssistError::Device(_) => e,
                other => AssistError::Device(other.to_string()),
            })?;
        let session = CaptureSession::new(stream);
        info!(stream = %session.id(), "Camera stream acquired");
        Ok(session)
    }

    /// Sample the current frame of a live session as a PNG image.
    pub fn grab_frame(&self, session: &CaptureSession) -> Result<ImageHandle> {
        let stream = session
            .stream
            .as_ref()
            .ok_or_else(|| AssistError::Capture("stream already released".into()))?;
        let frame = stream
            .current_frame()
            .ok_or_else(|| AssistError::Capture("no video frame available yet".into()))?;
        let png = encode_png(frame)?;
        let name = format!("capture-{}.png", Utc::now().format("%Y%m%d-%H%M%S"));
        debug!(stream = %session.id(), bytes = png.len(), name = %name, "Frame captured");
        Ok(ImageHandle::new(name, "image/png", png))
    }

    /// Release a session. Same as dropping it, but explicit at call sites.
    pub fn release(&self, session: &mut CaptureSession) {
        if !session.is_live() {
            debug!(stream = %session.id(), "Release requested on already released stream");
        }
        session.release();
    }
}

fn encode_png(frame: RawFrame) -> Result<Vec<u8>> {
    if frame.width == 0 || frame.height == 0 {
        return Err(AssistError::Capture("frame has zero size".into()));
    }
    let (width, height) = (frame.width, frame.height);
    let buffer = RgbaImage::from_raw(width, height, frame.rgba).ok_or_else(|| {
        AssistError::Capture(format!("frame buffer does not match {width}x{height}"))
    })?;
    let mut out = Cursor::new(Vec::new());
    buffer.write_to(&mut out, ImageFormat::Png).map_err(|e| {
        warn!(error = %e, "PNG encoding failed");
        AssistError::Capture(e.to_string())
    })?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStream {
        frame: Option<RawFrame>,
        stops: Arc<AtomicUsize>,
    }

    impl VideoStream for FakeStream {
        fn id(&self) -> &str {
            "fake-stream"
        }
        fn current_frame(&self) -> Option<RawFrame> {
            self.frame.clone()
        }
        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeCamera {
        frame: Option<RawFrame>,
        fail: bool,
        stops: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CameraDevice for FakeCamera {
        async fn open(&self, constraints: StreamConstraints) -> Result<Box<dyn VideoStream>> {
            assert!(constraints.video && !constraints.audio);
            if self.fail {
                return Err(AssistError::Other(anyhow::anyhow!("permission denied")));
            }
            Ok(Box::new(FakeStream {
                frame: self.frame.clone(),
                stops: self.stops.clone(),
            }))
        }
    }

    fn capture_with(frame: Option<RawFrame>, fail: bool) -> (MediaCapture, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        let camera = FakeCamera {
            frame,
            fail,
            stops: stops.clone(),
        };
        (MediaCapture::new(Arc::new(camera)), stops)
    }

    fn red_frame() -> RawFrame {
        RawFrame {
            width: 2,
            height: 2,
            rgba: [255, 0, 0, 255].repeat(4),
        }
    }

    #[tokio::test]
    async fn grabs_png_frame() {
        let (capture, _) = capture_with(Some(red_frame()), false);
        let session = capture.acquire().await.unwrap();
        let image = capture.grab_frame(&session).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert!(image.name.starts_with("capture-"));
        assert_eq!(&image.data[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn no_frame_is_capture_error() {
        let (capture, _) = capture_with(None, false);
        let session = capture.acquire().await.unwrap();
        let err = capture.grab_frame(&session).unwrap_err();
        assert!(matches!(err, AssistError::Capture(_)));
    }

    #[tokio::test]
    async fn mismatched_buffer_is_capture_error() {
        let frame = RawFrame {
            width: 4,
            height: 4,
            rgba: vec![0; 3],
        };
        let (capture, _) = capture_with(Some(frame), false);
        let session = capture.acquire().await.unwrap();
        assert!(matches!(
            capture.grab_frame(&session),
            Err(AssistError::Capture(_))
        ));
    }

    #[tokio::test]
    async fn open_failure_becomes_device_error() {
        let (capture, stops) = capture_with(None, true);
        let err = capture.acquire().await.unwrap_err();
        assert!(matches!(err, AssistError::Device(_)));
        assert_eq!(stops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn release_is_idempotent_and_drop_does_not_double_stop() {
        let (capture, stops) = capture_with(Some(red_frame()), false);
        let mut session = capture.acquire().await.unwrap();
        capture.release(&mut session);
        capture.release(&mut session);
        assert!(!session.is_live());
        drop(session);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_session_stops_stream() {
        let (capture, stops) = capture_with(Some(red_frame()), false);
        let session = capture.acquire().await.unwrap();
        drop(session);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn grab_after_release_fails() {
        let (capture, _) = capture_with(Some(red_frame()), false);
        let mut session = capture.acquire().await.unwrap();
        session.release();
        assert!(matches!(
            capture.grab_frame(&session),
            Err(AssistError::Capture(_))
        ));
    }
}
