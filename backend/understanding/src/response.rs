//! Typed response schemas for each analysis endpoint.
//!
//! Every endpoint answers with a JSON object carrying its result under an
//! operation-specific key, or under the generic `result` key. Each schema
//! names both keys so normalization never probes fields at runtime.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use vizassist_core::{AssistError, Operation, Result};

/// A result value as the service may send it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    List(Vec<Value>),
    Other(Value),
}

impl Payload {
    /// Render to a single display string. Sequences are joined with ", ".
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::List(items) => items
                .iter()
                .map(render_value)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Other(value) => render_value(value),
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Shared normalization over an endpoint's two candidate keys.
pub trait AnalysisResponse: DeserializeOwned {
    /// Value under the operation-specific key.
    fn primary(&self) -> Option<&Payload>;

    /// Value under the generic `result` key.
    fn fallback(&self) -> Option<&Payload>;

    /// The display text of the first present key, or `None` when neither key
    /// is present or the present one renders empty. A `null` value counts as
    /// absent.
    fn normalize(&self) -> Option<String> {
        self.primary()
            .or_else(|| self.fallback())
            .map(Payload::render)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrResponse {
    pub text: Option<Payload>,
    pub result: Option<Payload>,
}

impl AnalysisResponse for OcrResponse {
    fn primary(&self) -> Option<&Payload> {
        self.text.as_ref()
    }
    fn fallback(&self) -> Option<&Payload> {
        self.result.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectResponse {
    pub objects: Option<Payload>,
    pub result: Option<Payload>,
}

impl AnalysisResponse for DetectResponse {
    fn primary(&self) -> Option<&Payload> {
        self.objects.as_ref()
    }
    fn fallback(&self) -> Option<&Payload> {
        self.result.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionResponse {
    pub caption: Option<Payload>,
    pub result: Option<Payload>,
}

impl AnalysisResponse for CaptionResponse {
    fn primary(&self) -> Option<&Payload> {
        self.caption.as_ref()
    }
    fn fallback(&self) -> Option<&Payload> {
        self.result.as_ref()
    }
}

fn parse<R: AnalysisResponse>(body: &[u8]) -> Result<Option<String>> {
    let malformed = |e: serde_json::Error| AssistError::service(None, format!("malformed response: {e}"));
    // Derived structs also accept JSON arrays; only objects are valid here.
    let object = match serde_json::from_slice::<Value>(body).map_err(malformed)? {
        object @ Value::Object(_) => object,
        other => {
            return Err(AssistError::service(
                None,
                format!("malformed response: expected an object, got {other}"),
            ))
        }
    };
    let parsed: R = serde_json::from_value(object).map_err(malformed)?;
    Ok(parsed.normalize())
}

/// Decode a success body for `operation` into its display text.
pub fn normalize(operation: Operation, body: &[u8]) -> Result<Option<String>> {
    match operation {
        Operation::Ocr => parse::<OcrResponse>(body),
        Operation::Detect => parse::<DetectResponse>(body),
        Operation::Caption => parse::<CaptionResponse>(body),
    }
}
