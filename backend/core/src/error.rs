use thiserror::Error;

/// Error taxonomy shared by every vizassist crate.
///
/// None of these escape the workflow controller: each one is turned into a
/// spoken status message at that boundary.
#[derive(Debug, Error)]
pub enum AssistError {
    /// Camera unavailable, missing, or permission denied.
    #[error("camera unavailable: {0}")]
    Device(String),

    /// The live stream had no usable frame, or encoding it failed.
    #[error("frame capture failed: {0}")]
    Capture(String),

    /// Non-success HTTP status or a response body we could not interpret.
    #[error("analysis service error ({status:?}): {message}")]
    Service { status: Option<u16>, message: String },

    /// The request could not be sent or the response could not be received.
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AssistError {
    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Whether pressing the same button again could plausibly succeed.
    pub fn is_retryable_by_user(&self) -> bool {
        matches!(
            self,
            Self::Service { .. } | Self::Network(_) | Self::Capture(_)
        )
    }
}

pub type Result<T, E = AssistError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_display_includes_status() {
        let err = AssistError::service(Some(500), "YOLOv8 missing");
        assert_eq!(
            err.to_string(),
            "analysis service error (Some(500)): YOLOv8 missing"
        );
    }

    #[test]
    fn device_errors_are_not_retryable() {
        assert!(!AssistError::Device("denied".into()).is_retryable_by_user());
        assert!(AssistError::Network("reset".into()).is_retryable_by_user());
    }
}
