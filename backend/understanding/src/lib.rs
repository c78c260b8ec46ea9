pub mod client;
pub mod response;

pub use client::{AnalysisClient, AnalysisService, DEFAULT_BASE_URL, NO_RESULT_TEXT};
pub use response::{
    normalize, AnalysisResponse, CaptionResponse, DetectResponse, OcrResponse, Payload,
};
