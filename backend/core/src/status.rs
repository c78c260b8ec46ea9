//! User-facing status messages.
//!
//! The workflow only ever holds one status; it is rendered to text through a
//! [`Catalog`] chosen from the speech language so the display and the voice
//! agree.

use serde::{Deserialize, Serialize};

use crate::types::Operation;

/// Every status the workflow can announce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Status {
    Welcome,
    FileSelected { name: String },
    CameraOpening,
    CameraReady,
    CameraUnavailable,
    PhotoCaptured,
    CaptureFailed,
    Analyzing { operation: Operation },
    /// Normalized analysis output, announced verbatim.
    Result { text: String },
    AnalysisFailed,
    Cleared,
}

/// Languages with a message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
}

impl Language {
    /// Pick a catalog from a BCP-47 style tag (`es`, `es-MX`, `en-US`).
    /// Anything unrecognized gets English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "es" => Self::Es,
            _ => Self::En,
        }
    }
}

/// Renders [`Status`] values into display/speech text.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    language: Language,
}

impl Catalog {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn for_tag(tag: &str) -> Self {
        Self::new(Language::from_tag(tag))
    }

    pub fn render(&self, status: &Status) -> String {
        match self.language {
            Language::Es => render_es(status),
            Language::En => render_en(status),
        }
    }

    /// Fixed text used when the service returned nothing usable.
    pub fn no_result(&self) -> &'static str {
        match self.language {
            Language::Es => "No se encontró ningún resultado.",
            Language::En => "No result.",
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Language::En)
    }
}

fn render_en(status: &Status) -> String {
    match status {
        Status::Welcome => "Upload an image or open the camera to begin.".into(),
        Status::FileSelected { name } => format!("Image {name} selected. Choose an action."),
        Status::CameraOpening => "Opening the camera.".into(),
        Status::CameraReady => "Camera ready. Press capture to take a photo.".into(),
        Status::CameraUnavailable => "Could not access the camera.".into(),
        Status::PhotoCaptured => "Photo captured. Choose an action.".into(),
        Status::CaptureFailed => "Could not capture the photo. Try again.".into(),
        Status::Analyzing { operation } => match operation {
            Operation::Ocr => "Reading text...".into(),
            Operation::Detect => "Detecting objects...".into(),
            Operation::Caption => "Describing the scene...".into(),
        },
        Status::Result { text } => text.clone(),
        Status::AnalysisFailed => "The analysis failed. Please try again.".into(),
        Status::Cleared => "Image discarded. Upload an image or open the camera.".into(),
    }
}

fn render_es(status: &Status) -> String {
    match status {
        Status::Welcome => "Sube una imagen o abre la cámara para comenzar.".into(),
        Status::FileSelected { name } => {
            format!("Imagen {name} seleccionada. Elige una acción.")
        }
        Status::CameraOpening => "Abriendo la cámara.".into(),
        Status::CameraReady => "Cámara lista. Pulsa capturar para tomar una foto.".into(),
        Status::CameraUnavailable => "No se pudo acceder a la cámara.".into(),
        Status::PhotoCaptured => "Foto capturada. Elige una acción.".into(),
        Status::CaptureFailed => "No se pudo capturar la foto. Inténtalo de nuevo.".into(),
        Status::Analyzing { operation } => match operation {
            Operation::Ocr => "Leyendo texto...".into(),
            Operation::Detect => "Detectando objetos...".into(),
            Operation::Caption => "Describiendo la escena...".into(),
        },
        Status::Result { text } => text.clone(),
        Status::AnalysisFailed => "El análisis falló. Inténtalo de nuevo.".into(),
        Status::Cleared => "Imagen descartada. Sube una imagen o abre la cámara.".into(),
    }
}
