// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-CBC field encryption under the store-wide key and IV.
//!
//! Ciphertext is PKCS#7-padded and hex-encoded. Because the IV never changes,
//! equal plaintexts always produce equal ciphertexts.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, Iv, Key, KeyIvInit};
use keyward_core::KeywardError;

use crate::keystore::KeyMaterial;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const BLOCK_LEN: usize = 16;

/// Encrypts and decrypts individual credential fields.
#[derive(Debug, Clone)]
pub struct Cipher {
    material: KeyMaterial,
}

impl Cipher {
    pub fn new(material: KeyMaterial) -> Self {
        Self { material }
    }

    /// Encrypt a UTF-8 string to lowercase hex.
    pub fn encrypt(&self, plaintext: &str) -> String {
        hex::encode(self.seal(plaintext.as_bytes()))
    }

    /// Decrypt hex produced by [`Cipher::encrypt`] under the same key material.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, KeywardError> {
        let bytes = hex::decode(ciphertext.trim())
            .map_err(|e| KeywardError::Decryption(format!("ciphertext is not valid hex: {e}")))?;
        let plaintext = self.open(&bytes)?;
        String::from_utf8(plaintext)
            .map_err(|_| KeywardError::Decryption("decrypted value is not valid UTF-8".to_string()))
    }

    fn seal(&self, plaintext: &[u8]) -> Vec<u8> {
        Aes256CbcEnc::new(self.key(), self.iv()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>, KeywardError> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(KeywardError::Decryption(format!(
                "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
                ciphertext.len()
            )));
        }
        Aes256CbcDec::new(self.key(), self.iv())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| {
                KeywardError::Decryption("bad padding -- wrong key or corrupted data".to_string())
            })
    }

    fn key(&self) -> &Key<Aes256CbcEnc> {
        Key::<Aes256CbcEnc>::from_slice(self.material.key())
    }

    fn iv(&self) -> &Iv<Aes256CbcEnc> {
        Iv::<Aes256CbcEnc>::from_slice(self.material.iv())
    }
}
