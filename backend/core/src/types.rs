use serde::{Deserialize, Serialize};

/// Top-level workflow phase. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    NoImage,
    CameraOpen,
    ImageReady,
}

/// The three remote analyses the service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Text extraction.
    Ocr,
    /// Object detection.
    Detect,
    /// Scene captioning.
    Caption,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Ocr, Operation::Detect, Operation::Caption];

    /// Fixed endpoint path on the analysis service.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Ocr => "/ocr/",
            Self::Detect => "/detect/",
            Self::Caption => "/caption/",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ocr => "ocr",
            Self::Detect => "detect",
            Self::Caption => "caption",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ocr" | "text" | "read" => Ok(Self::Ocr),
            "detect" | "objects" => Ok(Self::Detect),
            "caption" | "describe" => Ok(Self::Caption),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}

/// Request lifecycle while an image is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AnalysisPhase {
    Idle,
    Loading { operation: Operation },
    Result { operation: Operation, text: String },
    Error { operation: Operation },
}

impl AnalysisPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}
