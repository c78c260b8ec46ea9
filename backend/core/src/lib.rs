pub mod error;
pub mod image;
pub mod mime;
pub mod status;
pub mod types;

pub use error::{AssistError, Result};
pub use image::ImageHandle;
pub use mime::{detect_mime_type, is_image};
pub use status::{Catalog, Language, Status};
pub use types::{AnalysisPhase, Mode, Operation};
