// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted credential storage and the single-user login gate for Keyward.
//!
//! Credential passwords are encrypted with AES-256-CBC under one key and iv
//! created on first run and kept in a key file beside the data. The login
//! password is stored as an Argon2id hash by default.
//!
//! [`Keyward`] is the entry point a front end talks to; the other modules are
//! public for callers that need a single layer.

pub mod auth;
pub mod cipher;
pub mod credentials;
pub mod facade;
pub mod generator;
pub mod keystore;
pub mod password;
pub mod persist;
pub mod search;

pub use auth::{AuthGate, LoginRecord, Session};
pub use cipher::Cipher;
pub use credentials::{CredentialRecord, CredentialStore, DecryptedCredential};
pub use facade::Keyward;
pub use generator::{generate_password, GeneratorOptions};
pub use keystore::{KeyMaterial, KeyStore};
