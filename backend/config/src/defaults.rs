//! Config defaults: fills unset leaves so a loaded config is complete.

use crate::io::config_dir;
use crate::schema::AssistConfig;

/// The analysis service the original deployment runs next to the client.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LANGUAGE: &str = "es";

pub const DEFAULT_FALLBACK_LOCALE: &str = "es-ES";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: AssistConfig) -> AssistConfig {
    let config = apply_service_defaults(config);
    let config = apply_speech_defaults(config);
    apply_logging_defaults(config)
}

fn apply_service_defaults(mut config: AssistConfig) -> AssistConfig {
    let service = &mut config.service;
    service.base_url.get_or_insert_with(|| DEFAULT_BASE_URL.to_string());
    service.timeout_secs.get_or_insert(DEFAULT_TIMEOUT_SECS);
    config
}

/// An explicit language without a fallback gets a fallback in that language.
fn apply_speech_defaults(mut config: AssistConfig) -> AssistConfig {
    let speech = &mut config.speech;
    speech.enabled.get_or_insert(true);
    if speech.fallback_locale.is_none() {
        speech.fallback_locale = Some(match speech.language.as_deref() {
            None | Some(DEFAULT_LANGUAGE) => DEFAULT_FALLBACK_LOCALE.to_string(),
            Some(lang) => lang.to_string(),
        });
    }
    speech.language.get_or_insert_with(|| DEFAULT_LANGUAGE.to_string());
    config
}

fn apply_logging_defaults(mut config: AssistConfig) -> AssistConfig {
    let logging = &mut config.logging;
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.dir.get_or_insert_with(|| config_dir().join("logs"));
    config
}
