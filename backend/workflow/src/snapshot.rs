use serde::Serialize;
use vizassist_core::{AnalysisPhase, Mode};

/// Everything a view needs to render the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub mode: Mode,
    /// Present only while an image is ready.
    pub analysis: Option<AnalysisPhase>,
    pub status: String,
    pub image_name: Option<String>,
    pub preview_url: Option<String>,
    pub camera_live: bool,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        self.analysis.as_ref().is_some_and(AnalysisPhase::is_loading)
    }
}
