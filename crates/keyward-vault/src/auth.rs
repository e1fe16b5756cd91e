// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-user authentication gate.
//!
//! One login record lives on disk. Its presence decides whether the user is
//! sent to signup or to login:
//!
//! ```text
//! NoAccount --signup--> AwaitingLogin --login--> Authenticated
//!                             ^                        |
//!                             +--------logout----------+
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use keyward_config::model::{AuthConfig, PasswordScheme};
use keyward_core::{AuthState, KeywardError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cipher::Cipher;
use crate::keystore::KeyStore;
use crate::password;
use crate::persist;

const EMPTY_FIELDS: &str = "please fill in all fields";
const PASSWORD_MISMATCH: &str = "passwords do not match";

/// The single account, as stored in the login file.
///
/// `password` is either an Argon2id PHC string or hex ciphertext, depending
/// on the scheme in force at signup.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub username: String,
    pub password: String,
    pub created_at: String,
}

impl std::fmt::Debug for LoginRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRecord")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub started_at: DateTime<Utc>,
}

/// Owns the login file and the current authentication state.
#[derive(Debug)]
pub struct AuthGate {
    path: PathBuf,
    config: AuthConfig,
    state: AuthState,
    session: Option<Session>,
}

impl AuthGate {
    /// Start in `NoAccount` or `AwaitingLogin` depending on the login file.
    pub fn open(path: impl Into<PathBuf>, config: AuthConfig) -> Self {
        let path = path.into();
        let state = if path.exists() {
            AuthState::AwaitingLogin
        } else {
            AuthState::NoAccount
        };
        debug!(path = %path.display(), %state, "auth gate opened");
        Self {
            path,
            config,
            state,
            session: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Create the account, replacing any existing login record.
    ///
    /// `keys` is only touched when the configured scheme is `cipher`.
    pub fn signup(
        &mut self,
        username: &str,
        password: &str,
        confirm_password: &str,
        keys: &KeyStore,
    ) -> Result<(), KeywardError> {
        if username.is_empty() || password.is_empty() || confirm_password.is_empty() {
            return Err(KeywardError::Validation(EMPTY_FIELDS.to_string()));
        }
        if password != confirm_password {
            return Err(KeywardError::Validation(PASSWORD_MISMATCH.to_string()));
        }

        let protected = match self.config.password_scheme {
            PasswordScheme::Argon2id => password::hash_password(password, &self.config)?,
            PasswordScheme::Cipher => Cipher::new(keys.key_material()?.clone()).encrypt(password),
        };
        let record = LoginRecord {
            username: username.to_string(),
            password: protected,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        persist::write_json(&self.path, &record)?;

        self.state = AuthState::AwaitingLogin;
        self.session = None;
        info!(username = %username, scheme = ?self.config.password_scheme, "account created");
        Ok(())
    }

    /// Check the credentials against the login record.
    ///
    /// Every failure other than empty input or an unusable key file is
    /// reported as [`KeywardError::Auth`].
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        keys: &KeyStore,
    ) -> Result<(), KeywardError> {
        if username.is_empty() || password.is_empty() {
            return Err(KeywardError::Validation(EMPTY_FIELDS.to_string()));
        }

        let record = match persist::read_json::<LoginRecord>(&self.path) {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(path = %self.path.display(), "login attempted without an account");
                return Err(KeywardError::Auth);
            }
            Err(e) => {
                warn!(error = %e, "login record unreadable");
                return Err(KeywardError::Auth);
            }
        };

        // Evaluate both checks so a wrong username costs the same as a wrong password.
        let password_ok = self.password_matches(password, &record.password, keys)?;
        let username_ok = record.username == username;
        if !(username_ok && password_ok) {
            warn!("login failed");
            return Err(KeywardError::Auth);
        }

        self.state = AuthState::Authenticated;
        self.session = Some(Session {
            username: record.username,
            started_at: Utc::now(),
        });
        info!(username = %username, "logged in");
        Ok(())
    }

    /// End the session. Only an authenticated gate changes state.
    pub fn logout(&mut self) {
        if self.state == AuthState::Authenticated {
            self.state = AuthState::AwaitingLogin;
            info!("logged out");
        }
        self.session = None;
    }

    fn password_matches(
        &self,
        candidate: &str,
        stored: &str,
        keys: &KeyStore,
    ) -> Result<bool, KeywardError> {
        if password::is_password_hash(stored) {
            return Ok(password::verify_password(candidate, stored));
        }
        let cipher = Cipher::new(keys.key_material()?.clone());
        match cipher.decrypt(stored) {
            Ok(plaintext) => Ok(plaintext == candidate),
            Err(e) => {
                warn!(error = %e, "stored login password could not be decrypted");
                Ok(false)
            }
        }
    }
}
