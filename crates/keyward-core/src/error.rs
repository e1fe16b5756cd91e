// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keyward password manager.

use std::path::PathBuf;

use thiserror::Error;

/// Message shown for every failed login, whatever the cause.
pub const AUTH_FAILURE_MESSAGE: &str = "invalid username or password";

/// The error type returned by every fallible Keyward operation.
#[derive(Debug, Error)]
pub enum KeywardError {
    /// Fatal configuration problems: malformed key file, invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Rejected user input (empty fields, password confirmation mismatch).
    #[error("{0}")]
    Validation(String),

    /// Login failed. Deliberately carries no detail about which field was wrong.
    #[error("invalid username or password")]
    Auth,

    /// A ciphertext could not be decrypted under the current key material.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Reading, writing, or serializing an on-disk file failed.
    #[error("could not access {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A credential operation was attempted without an authenticated session.
    #[error("not logged in")]
    NotAuthenticated,

    /// No credential at the given position or with the given id.
    #[error("no credential record at {0}")]
    RecordNotFound(String),

    /// Internal or unexpected errors (RNG, hashing backend).
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeywardError {
    /// Wrap any error raised while touching `path`.
    pub fn persistence(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether the user can correct the problem and try again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Internal(_))
    }
}
