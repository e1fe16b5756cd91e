// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keyward password manager.
//!
//! Holds the error type and the small shared types used by every other crate
//! in the workspace.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{KeywardError, AUTH_FAILURE_MESSAGE};
pub use types::{AuthState, RecordId};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn auth_error_does_not_reveal_field() {
        let msg = KeywardError::Auth.to_string();
        assert_eq!(msg, "invalid username or password");
        assert!(!msg.contains("username is"));
    }

    #[test]
    fn persistence_error_mentions_path() {
        let err = KeywardError::persistence(
            "/tmp/accounts.json",
            std::io::Error::other("disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/accounts.json"), "{msg}");
        assert!(msg.contains("disk full"), "{msg}");
        assert!(err.is_recoverable());
    }

    #[test]
    fn config_errors_are_fatal() {
        assert!(!KeywardError::Config("bad key file".into()).is_recoverable());
        assert!(KeywardError::Validation("empty".into()).is_recoverable());
    }

    #[test]
    fn auth_state_display_and_parse() {
        for state in [
            AuthState::NoAccount,
            AuthState::AwaitingLogin,
            AuthState::Authenticated,
        ] {
            let s = state.to_string();
            assert_eq!(AuthState::from_str(&s).unwrap(), state);
        }
        assert_eq!(AuthState::AwaitingLogin.to_string(), "awaiting_login");
    }

    #[test]
    fn record_id_serializes_as_plain_uuid() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn record_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }
}
