// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The credential collection: an ordered list of records mirrored to disk.
//!
//! Positions are the primary address for edit and delete, matching what the
//! list shows. Every record also carries a stable [`RecordId`] that survives
//! deletions of other records.
//!
//! Each mutation rewrites the whole file. If that write fails the in-memory
//! change is kept and the error is returned; the next successful mutation
//! writes everything out again.

use std::path::{Path, PathBuf};

use keyward_core::{KeywardError, RecordId};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cipher::Cipher;
use crate::persist;
use crate::search::ServiceName;

/// A stored credential. The password is kept as hex ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: RecordId,
    pub service: String,
    pub username: String,
    #[serde(rename = "pass")]
    pub encrypted_password: String,
}

/// On-disk shape accepted by [`CredentialStore::load`]. Older files carry no ids.
#[derive(Deserialize)]
struct StoredRecord {
    id: Option<RecordId>,
    service: String,
    username: String,
    pass: String,
}

impl ServiceName for CredentialRecord {
    fn service_name(&self) -> &str {
        &self.service
    }
}

/// A credential with its password decrypted, ready for display.
#[derive(Debug)]
pub struct DecryptedCredential {
    /// Position in the store. Use this, not the position in a filtered list,
    /// when editing or deleting.
    pub index: usize,
    pub id: RecordId,
    pub service: String,
    pub username: String,
    pub password: SecretString,
}

impl ServiceName for DecryptedCredential {
    fn service_name(&self) -> &str {
        &self.service
    }
}

/// Owns the in-memory credential list and is the only writer of its file.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    cipher: Cipher,
    records: Vec<CredentialRecord>,
}

impl CredentialStore {
    /// An empty store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>, cipher: Cipher) -> Self {
        Self {
            path: path.into(),
            cipher,
            records: Vec::new(),
        }
    }

    /// Create a store and load its file.
    pub fn open(path: impl Into<PathBuf>, cipher: Cipher) -> Result<Self, KeywardError> {
        let mut store = Self::new(path, cipher);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, replacing the in-memory snapshot.
    ///
    /// A missing or blank file is an empty collection. Records without an id
    /// are given one and the file is rewritten, so ids stay stable across loads.
    pub fn load(&mut self) -> Result<&[CredentialRecord], KeywardError> {
        let stored: Vec<StoredRecord> = match persist::read_optional(&self.path)? {
            Some(contents) if !contents.trim().is_empty() => {
                serde_json::from_str(&contents).map_err(|e| KeywardError::persistence(&self.path, e))?
            }
            _ => Vec::new(),
        };

        let missing = stored.iter().filter(|r| r.id.is_none()).count();
        self.records = stored
            .into_iter()
            .map(|r| CredentialRecord {
                id: r.id.unwrap_or_default(),
                service: r.service,
                username: r.username,
                encrypted_password: r.pass,
            })
            .collect();
        debug!(path = %self.path.display(), count = self.records.len(), "credentials loaded");

        if missing > 0 {
            self.persist()?;
            info!(path = %self.path.display(), assigned = missing, "assigned ids to credentials");
        }
        Ok(&self.records)
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&CredentialRecord, KeywardError> {
        self.records
            .get(index)
            .ok_or_else(|| index_not_found(index, self.records.len()))
    }

    /// Current position of the record with `id`.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Encrypt and append a new record, then persist.
    pub fn add(
        &mut self,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<RecordId, KeywardError> {
        let record = self.seal_record(RecordId::new(), service, username, password);
        let id = record.id;
        self.records.push(record);
        debug!(%id, index = self.records.len() - 1, "credential added");
        self.persist()?;
        Ok(id)
    }

    /// Replace the record at `index` wholesale, keeping its id, then persist.
    pub fn update(
        &mut self,
        index: usize,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<(), KeywardError> {
        let id = self.get(index)?.id;
        let record = self.seal_record(id, service, username, password);
        self.records[index] = record;
        debug!(%id, index, "credential updated");
        self.persist()
    }

    /// Like [`update`](Self::update), addressed by id.
    pub fn update_by_id(
        &mut self,
        id: RecordId,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<(), KeywardError> {
        let index = self.position(id).ok_or_else(|| id_not_found(id))?;
        self.update(index, service, username, password)
    }

    /// Remove the record at `index`, shifting later records down, then persist.
    pub fn delete(&mut self, index: usize) -> Result<CredentialRecord, KeywardError> {
        self.get(index)?;
        let removed = self.records.remove(index);
        debug!(id = %removed.id, index, "credential deleted");
        self.persist()?;
        Ok(removed)
    }

    /// Like [`delete`](Self::delete), addressed by id.
    pub fn delete_by_id(&mut self, id: RecordId) -> Result<CredentialRecord, KeywardError> {
        let index = self.position(id).ok_or_else(|| id_not_found(id))?;
        self.delete(index)
    }

    /// Decrypt every record, skipping (and logging) any that fail.
    pub fn list_decrypted(&self) -> Vec<DecryptedCredential> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match self.decrypt_record(index, record) {
                Ok(credential) => Some(credential),
                Err(e) => {
                    warn!(
                        index,
                        id = %record.id,
                        service = %record.service,
                        error = %e,
                        "skipping credential that failed to decrypt"
                    );
                    None
                }
            })
            .collect()
    }

    /// Decrypt a single record. Unlike the listing, failures are returned.
    pub fn decrypt_at(&self, index: usize) -> Result<DecryptedCredential, KeywardError> {
        let record = self.get(index)?;
        self.decrypt_record(index, record)
    }

    fn decrypt_record(
        &self,
        index: usize,
        record: &CredentialRecord,
    ) -> Result<DecryptedCredential, KeywardError> {
        let password = self.cipher.decrypt(&record.encrypted_password)?;
        Ok(DecryptedCredential {
            index,
            id: record.id,
            service: record.service.clone(),
            username: record.username.clone(),
            password: SecretString::from(password),
        })
    }

    fn seal_record(
        &self,
        id: RecordId,
        service: &str,
        username: &str,
        password: &str,
    ) -> CredentialRecord {
        CredentialRecord {
            id,
            service: service.to_string(),
            username: username.to_string(),
            encrypted_password: self.cipher.encrypt(password),
        }
    }

    fn persist(&self) -> Result<(), KeywardError> {
        persist::write_json(&self.path, &self.records)?;
        debug!(path = %self.path.display(), count = self.records.len(), "credentials persisted");
        Ok(())
    }
}

fn index_not_found(index: usize, len: usize) -> KeywardError {
    KeywardError::RecordNotFound(format!("position {index} (store has {len} records)"))
}

fn id_not_found(id: RecordId) -> KeywardError {
    KeywardError::RecordNotFound(format!("id {id}"))
}
