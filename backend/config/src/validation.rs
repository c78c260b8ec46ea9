//! Config validation with field paths in every message.

use crate::schema::AssistConfig;
use thiserror::Error;

/// Timeouts above this are accepted but almost certainly a mistake.
const LONG_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &AssistConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_service(config, &mut report);
    validate_speech(config, &mut report);
    report
}

fn validate_service(config: &AssistConfig, report: &mut ValidationReport) {
    let url = config.service.base_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error("service.baseUrl", format!("'{url}' is not an http(s) URL"));
    }
    match config.service.timeout_secs {
        Some(0) => report.error("service.timeoutSecs", "Timeout must be greater than zero"),
        Some(secs) if secs > LONG_TIMEOUT_SECS => report.warn(
            "service.timeoutSecs",
            format!("{secs}s is a long time to leave the user waiting"),
        ),
        _ => {}
    }
}

fn validate_speech(config: &AssistConfig, report: &mut ValidationReport) {
    if config.speech.language().trim().is_empty() {
        report.error("speech.language", "Language cannot be empty");
    }
    if config.speech.fallback_locale().trim().is_empty() {
        report.error("speech.fallbackLocale", "Fallback locale cannot be empty");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let report = validate(&AssistConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_non_http_url_and_zero_timeout() {
        let mut cfg = AssistConfig::default();
        cfg.service.base_url = Some("ftp://vision".into());
        cfg.service.timeout_secs = Some(0);
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.path == "service.baseUrl"));
    }

    #[test]
    fn warns_on_long_timeout() {
        let mut cfg = AssistConfig::default();
        cfg.service.timeout_secs = Some(600);
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn rejects_empty_language() {
        let mut cfg = AssistConfig::default();
        cfg.speech.language = Some("  ".into());
        assert!(!validate(&cfg).is_valid());
    }
}
