// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The operations a front end calls.
//!
//! [`Keyward`] owns one [`KeyStore`], one [`AuthGate`], and, while a session
//! is open, one [`CredentialStore`]. Inputs are trimmed before use.

use std::path::PathBuf;

use keyward_config::KeywardConfig;
use keyward_core::{AuthState, KeywardError, RecordId};
use tracing::debug;

use crate::auth::AuthGate;
use crate::cipher::Cipher;
use crate::credentials::{CredentialStore, DecryptedCredential};
use crate::generator::{self, GeneratorOptions};
use crate::keystore::KeyStore;
use crate::search;

const EMPTY_FIELDS: &str = "please fill in all fields";

/// A single-user password manager rooted at one storage directory.
#[derive(Debug)]
pub struct Keyward {
    config: KeywardConfig,
    keys: KeyStore,
    auth: AuthGate,
    credentials_path: PathBuf,
    store: Option<CredentialStore>,
}

impl Keyward {
    /// Open the storage directory described by `config`.
    ///
    /// Nothing is created on disk until the first signup or credential write.
    pub fn open(config: KeywardConfig) -> Self {
        let storage = &config.storage;
        let keys = KeyStore::new(storage.key_path());
        let auth = AuthGate::open(storage.login_path(), config.auth.clone());
        let credentials_path = storage.credentials_path();
        debug!(
            data_dir = %storage.resolve_data_dir().display(),
            state = %auth.state(),
            "keyward opened"
        );
        Self {
            config,
            keys,
            auth,
            credentials_path,
            store: None,
        }
    }

    pub fn config(&self) -> &KeywardConfig {
        &self.config
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.storage.resolve_data_dir()
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    /// Whether a login record exists.
    pub fn has_account(&self) -> bool {
        self.auth.state() != AuthState::NoAccount
    }

    /// Name of the logged-in user.
    pub fn username(&self) -> Option<&str> {
        self.auth.session().map(|s| s.username.as_str())
    }

    pub fn signup(
        &mut self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), KeywardError> {
        let (username, password, confirm_password) =
            (username.trim(), password.trim(), confirm_password.trim());
        require_filled(&[username, password, confirm_password])?;
        self.store = None;
        self.auth
            .signup(username, password, confirm_password, &self.keys)
    }

    /// Log in and load the credential collection.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), KeywardError> {
        let (username, password) = (username.trim(), password.trim());
        require_filled(&[username, password])?;
        self.auth.login(username, password, &self.keys)?;

        match self.open_store() {
            Ok(store) => {
                self.store = Some(store);
                Ok(())
            }
            Err(e) => {
                self.auth.logout();
                Err(e)
            }
        }
    }

    fn open_store(&self) -> Result<CredentialStore, KeywardError> {
        let cipher = Cipher::new(self.keys.key_material()?.clone());
        CredentialStore::open(&self.credentials_path, cipher)
    }

    /// Close the session and drop the in-memory credentials.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.store = None;
    }

    /// Every credential that decrypts, in stored order.
    pub fn list_credentials(&self) -> Result<Vec<DecryptedCredential>, KeywardError> {
        Ok(self.store()?.list_decrypted())
    }

    /// Credentials whose service contains `term`, ignoring case.
    pub fn search_credentials(&self, term: &str) -> Result<Vec<DecryptedCredential>, KeywardError> {
        let all = self.store()?.list_decrypted();
        Ok(search::filter(all, term.trim()))
    }

    /// One credential by store position, for viewing or edit prefill.
    pub fn credential(&self, index: usize) -> Result<DecryptedCredential, KeywardError> {
        self.store()?.decrypt_at(index)
    }

    pub fn credential_count(&self) -> Result<usize, KeywardError> {
        Ok(self.store()?.len())
    }

    pub fn add_credential(
        &mut self,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<RecordId, KeywardError> {
        let (service, username, password) = trimmed_fields(service, username, password)?;
        self.store_mut()?.add(service, username, password)
    }

    pub fn update_credential(
        &mut self,
        index: usize,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<(), KeywardError> {
        let (service, username, password) = trimmed_fields(service, username, password)?;
        self.store_mut()?.update(index, service, username, password)
    }

    pub fn update_credential_by_id(
        &mut self,
        id: RecordId,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<(), KeywardError> {
        let (service, username, password) = trimmed_fields(service, username, password)?;
        self.store_mut()?
            .update_by_id(id, service, username, password)
    }

    pub fn delete_credential(&mut self, index: usize) -> Result<(), KeywardError> {
        self.store_mut()?.delete(index).map(|_| ())
    }

    pub fn delete_credential_by_id(&mut self, id: RecordId) -> Result<(), KeywardError> {
        self.store_mut()?.delete_by_id(id).map(|_| ())
    }

    /// Generate a password. Needs no session.
    pub fn generate_password(
        &self,
        length: usize,
        use_numbers: bool,
        use_symbols: bool,
        use_uppercase: bool,
    ) -> String {
        generator::generate_password(length, use_numbers, use_symbols, use_uppercase)
    }

    /// Generate a password with the configured defaults.
    pub fn generate_default_password(&self) -> String {
        GeneratorOptions::from(&self.config.generator).generate()
    }

    fn store(&self) -> Result<&CredentialStore, KeywardError> {
        match (&self.store, self.auth.is_authenticated()) {
            (Some(store), true) => Ok(store),
            _ => Err(KeywardError::NotAuthenticated),
        }
    }

    fn store_mut(&mut self) -> Result<&mut CredentialStore, KeywardError> {
        match (&mut self.store, self.auth.is_authenticated()) {
            (Some(store), true) => Ok(store),
            _ => Err(KeywardError::NotAuthenticated),
        }
    }
}

fn require_filled(fields: &[&str]) -> Result<(), KeywardError> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(KeywardError::Validation(EMPTY_FIELDS.to_string()));
    }
    Ok(())
}

fn trimmed_fields<'a>(
    service: &'a str,
    username: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str, &'a str), KeywardError> {
    let fields = (service.trim(), username.trim(), password.trim());
    require_filled(&[fields.0, fields.1, fields.2])?;
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_config::PasswordScheme;

    fn test_config(dir: &std::path::Path) -> KeywardConfig {
        let mut config = KeywardConfig::default();
        config.storage.data_dir = Some(dir.display().to_string());
        config.auth.kdf_memory_cost = 64;
        config.auth.kdf_iterations = 1;
        config.auth.password_scheme = PasswordScheme::Argon2id;
        config
    }

    #[test]
    fn credential_ops_require_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = Keyward::open(test_config(dir.path()));
        assert!(matches!(
            app.list_credentials(),
            Err(KeywardError::NotAuthenticated)
        ));
        assert!(matches!(
            app.add_credential("GitHub", "alice", "pw"),
            Err(KeywardError::NotAuthenticated)
        ));
        assert!(matches!(
            app.delete_credential(0),
            Err(KeywardError::NotAuthenticated)
        ));
    }

    #[test]
    fn inputs_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = Keyward::open(test_config(dir.path()));
        app.signup("  alice ", " pw123", "pw123 ").unwrap();
        app.login("alice", "pw123").unwrap();
        assert_eq!(app.username(), Some("alice"));

        app.add_credential(" GitHub ", " alice ", " s3cret ").unwrap();
        let listed = app.list_credentials().unwrap();
        assert_eq!(listed[0].service, "GitHub");
        assert_eq!(listed[0].username, "alice");
    }

    #[test]
    fn whitespace_only_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = Keyward::open(test_config(dir.path()));
        let err = app.signup("alice", "   ", "   ").unwrap_err();
        assert_eq!(err.to_string(), EMPTY_FIELDS);

        app.signup("alice", "pw123", "pw123").unwrap();
        app.login("alice", "pw123").unwrap();
        assert!(matches!(
            app.add_credential("GitHub", " ", "pw"),
            Err(KeywardError::Validation(_))
        ));
        assert_eq!(app.credential_count().unwrap(), 0);
    }

    #[test]
    fn generator_uses_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.generator.length = 24;
        let app = Keyward::open(config);
        assert_eq!(app.generate_default_password().chars().count(), 24);
        assert_eq!(app.generate_password(8, false, false, false).len(), 8);
    }
}
