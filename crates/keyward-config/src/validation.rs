// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde attributes cannot express.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::KeywardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest password the generator may be configured to produce.
pub const MAX_GENERATOR_LENGTH: usize = 1024;

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &KeywardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(dir) = &config.storage.data_dir {
        if dir.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "storage.data_dir must not be empty when set".to_string(),
            });
        }
    }

    let files = [
        ("storage.key_file", &config.storage.key_file),
        ("storage.login_file", &config.storage.login_file),
        ("storage.credentials_file", &config.storage.credentials_file),
    ];
    let mut seen = HashSet::new();
    for (key, name) in files {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if name.contains('/') || name.contains('\\') {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be a plain file name, got `{name}`"),
            });
        } else if !seen.insert(name.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{name}` is already used by another storage file"),
            });
        }
    }

    // Argon2 rejects fewer than 8 KiB of memory per lane.
    if config.auth.kdf_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: "auth.kdf_parallelism must be at least 1".to_string(),
        });
    } else if config.auth.kdf_memory_cost < config.auth.kdf_parallelism.saturating_mul(8) {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.kdf_memory_cost must be at least {} KiB for {} lane(s), got {}",
                u64::from(config.auth.kdf_parallelism) * 8,
                config.auth.kdf_parallelism,
                config.auth.kdf_memory_cost
            ),
        });
    }

    if config.auth.kdf_iterations < 1 {
        errors.push(ConfigError::Validation {
            message: "auth.kdf_iterations must be at least 1".to_string(),
        });
    }

    if config.generator.length == 0 || config.generator.length > MAX_GENERATOR_LENGTH {
        errors.push(ConfigError::Validation {
            message: format!(
                "generator.length must be between 1 and {MAX_GENERATOR_LENGTH}, got {}",
                config.generator.length
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
