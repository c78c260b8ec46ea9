//! Image acquisition for vizassist: the live camera capability and the
//! selected-image store with its revocable preview.

pub mod capture;
pub mod devices;
pub mod image_source;
pub mod preview;

pub use capture::{
    CameraDevice, CaptureSession, MediaCapture, RawFrame, StreamConstraints, VideoStream,
};
pub use devices::{NoCamera, StillFrameCamera};
pub use image_source::ImageSource;
pub use preview::{Preview, PreviewRegistry};
