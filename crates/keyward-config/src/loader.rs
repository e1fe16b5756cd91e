// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: compiled defaults < `~/.config/keyward/keyward.toml` <
//! `./keyward.toml` < `KEYWARD_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::KeywardConfig;

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = "keyward.toml";

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keyward").join(CONFIG_FILE_NAME))
}

/// Load configuration from the user and local config files with env var overrides.
pub fn load_config() -> Result<KeywardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<KeywardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KeywardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(KeywardConfig::default()));
    if let Some(path) = user_config_path() {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Environment provider mapping `KEYWARD_<SECTION>_<KEY>` onto `section.key`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `KEYWARD_STORAGE_DATA_DIR` maps to `storage.data_dir`.
fn env_provider() -> Env {
    Env::prefixed("KEYWARD_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Figment passes the key with the prefix stripped but in its original case.
fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    ["app_", "storage_", "auth_", "generator_"]
        .iter()
        .find(|prefix| key.starts_with(*prefix))
        .map(|prefix| key.replacen(prefix, &prefix.replace('_', "."), 1))
        .unwrap_or(key)
}
