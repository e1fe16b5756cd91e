// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests through the `Keyward` facade against a temp directory.

use keyward_config::{KeywardConfig, PasswordScheme};
use keyward_core::{AuthState, KeywardError, AUTH_FAILURE_MESSAGE};
use keyward_vault::{Cipher, KeyStore, Keyward};
use secrecy::ExposeSecret;
use tempfile::TempDir;

fn config_in(dir: &TempDir, scheme: PasswordScheme) -> KeywardConfig {
    let mut config = KeywardConfig::default();
    config.storage.data_dir = Some(dir.path().display().to_string());
    config.auth.password_scheme = scheme;
    config.auth.kdf_memory_cost = 64;
    config.auth.kdf_iterations = 1;
    config.auth.kdf_parallelism = 1;
    config
}

fn logged_in(dir: &TempDir) -> Keyward {
    let mut app = Keyward::open(config_in(dir, PasswordScheme::Argon2id));
    app.signup("alice", "pw123", "pw123").unwrap();
    app.login("alice", "pw123").unwrap();
    app
}

fn services(app: &Keyward) -> Vec<String> {
    app.list_credentials()
        .unwrap()
        .into_iter()
        .map(|c| c.service)
        .collect()
}

#[test]
fn auth_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Keyward::open(config_in(&dir, PasswordScheme::Argon2id));
    assert_eq!(app.auth_state(), AuthState::NoAccount);
    assert!(!app.has_account());

    app.signup("alice", "pw123", "pw123").unwrap();
    assert_eq!(app.auth_state(), AuthState::AwaitingLogin);

    app.login("alice", "pw123").unwrap();
    assert_eq!(app.auth_state(), AuthState::Authenticated);
    app.logout();
    assert_eq!(app.auth_state(), AuthState::AwaitingLogin);

    let err = app.login("alice", "wrong").unwrap_err();
    assert!(matches!(err, KeywardError::Auth));
    assert_eq!(err.to_string(), AUTH_FAILURE_MESSAGE);
    assert!(matches!(
        app.login("bob", "pw123"),
        Err(KeywardError::Auth)
    ));
}

#[test]
fn account_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = Keyward::open(config_in(&dir, PasswordScheme::Cipher));
        app.signup("alice", "pw123", "pw123").unwrap();
    }
    let mut app = Keyward::open(config_in(&dir, PasswordScheme::Cipher));
    assert_eq!(app.auth_state(), AuthState::AwaitingLogin);
    app.login("alice", "pw123").unwrap();
}

#[test]
fn add_add_delete_leaves_second() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = logged_in(&dir);
    app.add_credential("A", "u1", "p1").unwrap();
    app.add_credential("B", "u2", "p2").unwrap();
    app.delete_credential(0).unwrap();

    assert_eq!(services(&app), ["B"]);
}

#[test]
fn add_then_update_replaces() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = logged_in(&dir);
    let id = app.add_credential("A", "u1", "p1").unwrap();
    app.update_credential(0, "B", "u2", "p2").unwrap();

    let listed = app.list_credentials().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].service, "B");
    assert_eq!(listed[0].username, "u2");
    assert_eq!(listed[0].password.expose_secret(), "p2");
    assert_eq!(listed[0].id, id);
}

#[test]
fn out_of_range_index_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = logged_in(&dir);
    app.add_credential("A", "u1", "p1").unwrap();

    assert!(matches!(
        app.update_credential(1, "B", "u", "p"),
        Err(KeywardError::RecordNotFound(_))
    ));
    assert!(matches!(
        app.delete_credential(5),
        Err(KeywardError::RecordNotFound(_))
    ));
    assert_eq!(services(&app), ["A"]);
}

#[test]
fn id_operations_survive_reordering() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = logged_in(&dir);
    app.add_credential("A", "u", "p").unwrap();
    let b = app.add_credential("B", "u", "p").unwrap();
    let c = app.add_credential("C", "u", "p").unwrap();

    app.delete_credential(0).unwrap();
    app.update_credential_by_id(c, "C2", "u", "p").unwrap();
    app.delete_credential_by_id(b).unwrap();
    assert_eq!(services(&app), ["C2"]);

    assert!(matches!(
        app.delete_credential_by_id(b),
        Err(KeywardError::RecordNotFound(_))
    ));
}

#[test]
fn search_by_service() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = logged_in(&dir);
    for service in ["GitHub", "Gitlab", "Twitter"] {
        app.add_credential(service, "alice", "pw").unwrap();
    }

    let found: Vec<_> = app
        .search_credentials("git")
        .unwrap()
        .into_iter()
        .map(|c| (c.index, c.service))
        .collect();
    assert_eq!(
        found,
        [(0, "GitHub".to_string()), (1, "Gitlab".to_string())]
    );
    assert_eq!(app.search_credentials("").unwrap().len(), 3);
    assert_eq!(app.search_credentials("  TWIT ").unwrap().len(), 1);
}

#[test]
fn credentials_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = logged_in(&dir);
        app.add_credential("GitHub", "alice", "s3cret").unwrap();
        app.logout();
        assert!(matches!(
            app.list_credentials(),
            Err(KeywardError::NotAuthenticated)
        ));
    }

    let mut app = Keyward::open(config_in(&dir, PasswordScheme::Argon2id));
    app.login("alice", "pw123").unwrap();
    let credential = app.credential(0).unwrap();
    assert_eq!(credential.service, "GitHub");
    assert_eq!(credential.password.expose_secret(), "s3cret");
}

#[test]
fn corrupt_record_is_skipped_in_listing() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = logged_in(&dir);
    app.add_credential("Good", "alice", "pw").unwrap();
    app.add_credential("Bad", "alice", "pw").unwrap();
    app.logout();

    let path = dir.path().join("accounts.json");
    let mut records: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    records[1]["pass"] = serde_json::Value::String("zz-not-hex".to_string());
    std::fs::write(&path, records.to_string()).unwrap();

    app.login("alice", "pw123").unwrap();
    assert_eq!(services(&app), ["Good"]);
    assert!(matches!(
        app.credential(1),
        Err(KeywardError::Decryption(_))
    ));
}

#[test]
fn credentials_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = logged_in(&dir);
    app.add_credential("GitHub", "alice", "s3cret").unwrap();

    let raw = std::fs::read_to_string(dir.path().join("accounts.json")).unwrap();
    assert!(raw.contains("\n  {"), "expected 2-space indentation: {raw}");
    let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &records[0];
    assert_eq!(record["service"], "GitHub");
    assert_eq!(record["username"], "alice");

    let keys = KeyStore::new(dir.path().join("key.json"));
    let cipher = Cipher::new(keys.key_material().unwrap().clone());
    assert_eq!(record["pass"], cipher.encrypt("s3cret"));
    assert!(record["id"].as_str().is_some());
}

#[test]
fn legacy_files_without_ids_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Keyward::open(config_in(&dir, PasswordScheme::Cipher));
    app.signup("alice", "pw123", "pw123").unwrap();

    let keys = KeyStore::new(dir.path().join("key.json"));
    let cipher = Cipher::new(keys.key_material().unwrap().clone());
    let legacy = serde_json::json!([
        { "service": "Mail", "username": "alice", "pass": cipher.encrypt("m41l") },
    ]);
    std::fs::write(dir.path().join("accounts.json"), legacy.to_string()).unwrap();

    app.login("alice", "pw123").unwrap();
    let credential = app.credential(0).unwrap();
    assert_eq!(credential.service, "Mail");
    assert_eq!(credential.password.expose_secret(), "m41l");

    // The id assigned at first load survives a new session.
    let id = credential.id;
    app.logout();
    app.login("alice", "pw123").unwrap();
    app.update_credential_by_id(id, "Mail", "alice", "n3w").unwrap();
    assert_eq!(app.credential(0).unwrap().password.expose_secret(), "n3w");
}

#[test]
fn malformed_key_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Keyward::open(config_in(&dir, PasswordScheme::Argon2id));
    app.signup("alice", "pw123", "pw123").unwrap();
    std::fs::write(dir.path().join("key.json"), r#"{"key":"zz","iv":"00"}"#).unwrap();

    assert!(matches!(
        app.login("alice", "pw123"),
        Err(KeywardError::Config(_))
    ));
    assert_ne!(app.auth_state(), AuthState::Authenticated);
}

#[test]
fn signup_mismatch_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Keyward::open(config_in(&dir, PasswordScheme::Argon2id));
    let err = app.signup("alice", "pw1", "pw2").unwrap_err();
    assert!(matches!(err, KeywardError::Validation(_)));
    assert_eq!(err.to_string(), "passwords do not match");
    assert!(!app.has_account());
}
