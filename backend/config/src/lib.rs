//! `vizassist-config`: runtime configuration.
//!
//! Provides:
//! - Typed config schema (service address and timeout, speech, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with per-field messages

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use schema::{AssistConfig, LoggingConfig, ServiceConfig, SpeechConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load, apply defaults, and validate a config file.
///
/// Warnings are logged; any validation error aborts the load.
pub async fn load_and_prepare(path: &Path) -> Result<AssistConfig> {
    let config = apply_all_defaults(load_config(path).await?);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        let summary = report
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        bail!("invalid configuration at {}: {summary}", path.display());
    }

    Ok(config)
}
