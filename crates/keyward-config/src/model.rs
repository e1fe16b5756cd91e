// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Keyward.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Keyward configuration.
///
/// Every section is optional and falls back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Where the key, login, and credentials files live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// How the login password is protected on disk.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Defaults for the password generator.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// On-disk layout of the private storage directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage directory. `None` resolves to the per-user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// File name of the key material (hex key + iv).
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// File name of the single login record.
    #[serde(default = "default_login_file")]
    pub login_file: String,

    /// File name of the credential collection.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key_file: default_key_file(),
            login_file: default_login_file(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl StorageConfig {
    /// Resolve the storage directory.
    ///
    /// Uses `data_dir` when set, otherwise `<data dir>/keyward`, falling back to
    /// `./.keyward` on platforms without a data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|d| d.join("keyward"))
                .unwrap_or_else(|| PathBuf::from(".keyward")),
        }
    }

    pub fn key_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.key_file)
    }

    pub fn login_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.login_file)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.credentials_file)
    }
}

fn default_key_file() -> String {
    "key.json".to_string()
}

fn default_login_file() -> String {
    "login.json".to_string()
}

fn default_credentials_file() -> String {
    "accounts.json".to_string()
}

/// How the login password is stored in the login file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Salted Argon2id hash in PHC string format.
    #[default]
    Argon2id,
    /// Reversible AES-256-CBC ciphertext under the shared key material.
    Cipher,
}

/// Login password protection settings.
///
/// The Argon2id costs only apply to the `argon2id` scheme. Verification reads
/// the parameters back from the stored hash, so changing them here only
/// affects the next signup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub password_scheme: PasswordScheme,

    /// Argon2id memory cost in KiB (default: 19456 = 19 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 2).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 1).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_scheme: PasswordScheme::default(),
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    19456 // OWASP minimum for Argon2id
}

fn default_kdf_iterations() -> u32 {
    2
}

fn default_kdf_parallelism() -> u32 {
    1
}

/// Password generator defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_length")]
    pub length: usize,

    #[serde(default = "default_true")]
    pub numbers: bool,

    #[serde(default = "default_true")]
    pub symbols: bool,

    #[serde(default = "default_true")]
    pub uppercase: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: default_generator_length(),
            numbers: true,
            symbols: true,
            uppercase: true,
        }
    }
}

fn default_generator_length() -> usize {
    16
}

fn default_true() -> bool {
    true
}
