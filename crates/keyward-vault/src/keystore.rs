// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key material lifecycle: generate once, persist, reuse forever.
//!
//! The key file holds a hex-encoded 256-bit key and 128-bit IV. Every
//! ciphertext Keyward has ever written depends on it, so a malformed file is
//! a hard configuration error and is never replaced by fresh material.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use keyward_core::KeywardError;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::persist;

/// Length of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;
/// Length of the CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// The symmetric key and IV shared by every encryption.
///
/// Debug output intentionally omits both values.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    key: Zeroizing<[u8; KEY_LEN]>,
    iv: [u8; IV_LEN],
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

impl KeyMaterial {
    pub fn new(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self {
            key: Zeroizing::new(key),
            iv,
        }
    }

    /// Fresh random key and IV from the system CSPRNG.
    pub fn generate() -> Result<Self, KeywardError> {
        let rng = SystemRandom::new();
        let mut key = [0u8; KEY_LEN];
        let mut iv = [0u8; IV_LEN];
        rng.fill(&mut key)
            .map_err(|_| KeywardError::Internal("failed to generate random key".to_string()))?;
        rng.fill(&mut iv)
            .map_err(|_| KeywardError::Internal("failed to generate random iv".to_string()))?;
        Ok(Self::new(key, iv))
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

/// On-disk shape of the key file.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    key: String,
    iv: String,
}

/// Loads or creates the key file and caches its contents.
#[derive(Debug)]
pub struct KeyStore {
    path: PathBuf,
    material: OnceLock<KeyMaterial>,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            material: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the key file is already on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Return the key material, reading or generating it on first use.
    ///
    /// The first call either parses the existing key file or writes a new one.
    /// Later calls return the cached value without touching the disk.
    pub fn key_material(&self) -> Result<&KeyMaterial, KeywardError> {
        if let Some(material) = self.material.get() {
            return Ok(material);
        }
        let material = self.load_or_generate()?;
        Ok(self.material.get_or_init(|| material))
    }

    fn load_or_generate(&self) -> Result<KeyMaterial, KeywardError> {
        match persist::read_optional(&self.path)? {
            Some(contents) => {
                let material = parse_key_file(&contents, &self.path)?;
                debug!(path = %self.path.display(), "key material loaded");
                Ok(material)
            }
            None => self.generate_and_persist(),
        }
    }

    fn generate_and_persist(&self) -> Result<KeyMaterial, KeywardError> {
        let material = KeyMaterial::generate()?;
        let file = KeyFile {
            key: hex::encode(material.key()),
            iv: hex::encode(material.iv()),
        };
        let json = Zeroizing::new(
            serde_json::to_string_pretty(&file)
                .map_err(|e| KeywardError::persistence(&self.path, e))?,
        );

        if let Some(dir) = self.path.parent() {
            persist::ensure_dir(dir)?;
        }
        match persist::create_new(&self.path, json.as_bytes()) {
            Ok(()) => {
                info!(path = %self.path.display(), "generated new key material");
                Ok(material)
            }
            // Someone else created it first; theirs is the one on disk, so use it.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let contents = persist::read_optional(&self.path)?.ok_or_else(|| {
                    KeywardError::persistence(&self.path, io::Error::from(io::ErrorKind::NotFound))
                })?;
                parse_key_file(&contents, &self.path)
            }
            Err(e) => Err(KeywardError::persistence(&self.path, e)),
        }
    }
}

fn parse_key_file(contents: &str, path: &Path) -> Result<KeyMaterial, KeywardError> {
    let file: KeyFile = serde_json::from_str(contents).map_err(|e| {
        KeywardError::Config(format!("key file {} is malformed: {e}", path.display()))
    })?;
    let key = decode_fixed::<KEY_LEN>(&file.key, "key", path)?;
    let iv = decode_fixed::<IV_LEN>(&file.iv, "iv", path)?;
    Ok(KeyMaterial::new(key, iv))
}

fn decode_fixed<const N: usize>(
    value: &str,
    field: &str,
    path: &Path,
) -> Result<[u8; N], KeywardError> {
    let bytes = hex::decode(value.trim()).map_err(|e| {
        KeywardError::Config(format!(
            "key file {}: `{field}` is not valid hex: {e}",
            path.display()
        ))
    })?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        KeywardError::Config(format!(
            "key file {}: `{field}` must be {N} bytes, got {}",
            path.display(),
            b.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_key_file_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::new(dir.path().join("key.json"));
        assert!(!store.exists());

        store.key_material().unwrap();
        assert!(store.exists());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let file: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(file["key"].as_str().unwrap().len(), KEY_LEN * 2);
        assert_eq!(file["iv"].as_str().unwrap().len(), IV_LEN * 2);
    }

    #[test]
    fn same_material_within_and_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");

        let store = KeyStore::new(&path);
        let first = store.key_material().unwrap().clone();
        let second = store.key_material().unwrap().clone();
        assert_eq!(first, second);

        // A new instance stands in for a process restart.
        let restarted = KeyStore::new(&path);
        assert_eq!(*restarted.key_material().unwrap(), first);
    }

    #[test]
    fn creates_missing_storage_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::new(dir.path().join("a").join("b").join("key.json"));
        store.key_material().unwrap();
        assert!(store.exists());
    }

    #[test]
    fn loads_existing_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        let key = "11".repeat(KEY_LEN);
        let iv = "22".repeat(IV_LEN);
        std::fs::write(&path, format!(r#"{{"key":"{key}","iv":"{iv}"}}"#)).unwrap();

        let store = KeyStore::new(&path);
        let material = store.key_material().unwrap();
        assert_eq!(material.key(), &[0x11; KEY_LEN]);
        assert_eq!(material.iv(), &[0x22; IV_LEN]);
    }

    #[test]
    fn malformed_key_file_is_config_error_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        let bad = r#"{"key":"abcd","iv":"00"}"#;
        std::fs::write(&path, bad).unwrap();

        let err = KeyStore::new(&path).key_material().unwrap_err();
        assert!(matches!(err, KeywardError::Config(_)), "got {err:?}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), bad);
    }

    #[test]
    fn non_hex_key_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        let key = "zz".repeat(KEY_LEN);
        let iv = "00".repeat(IV_LEN);
        std::fs::write(&path, format!(r#"{{"key":"{key}","iv":"{iv}"}}"#)).unwrap();

        let err = KeyStore::new(&path).key_material().unwrap_err();
        assert!(err.to_string().contains("not valid hex"), "{err}");
    }

    #[test]
    fn garbage_key_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        std::fs::write(&path, "not json at all").unwrap();

        let err = KeyStore::new(&path).key_material().unwrap_err();
        assert!(matches!(err, KeywardError::Config(_)));
    }

    #[test]
    fn debug_output_is_redacted() {
        let material = KeyMaterial::new([0xAB; KEY_LEN], [0xCD; IV_LEN]);
        let debug = format!("{material:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.to_lowercase().contains("abab"));
    }

    #[test]
    fn generated_material_differs() {
        let a = KeyMaterial::generate().unwrap();
        let b = KeyMaterial::generate().unwrap();
        assert_ne!(a, b);
    }
}
