// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyward status` command implementation.
//!
//! Reports where the storage files live, which of them exist, and whether an
//! account has been created. Never reads secrets.

use std::io::IsTerminal;
use std::path::Path;

use keyward_config::model::KeywardConfig;
use keyward_core::{AuthState, KeywardError};
use keyward_vault::Keyward;
use serde::Serialize;

/// One storage file and whether it is on disk.
#[derive(Debug, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub exists: bool,
}

impl FileStatus {
    fn of(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            exists: path.exists(),
        }
    }
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub data_dir: String,
    pub key_file: FileStatus,
    pub login_file: FileStatus,
    pub credentials_file: FileStatus,
    pub auth_state: AuthState,
}

pub fn collect_status(config: &KeywardConfig) -> StatusReport {
    let storage = &config.storage;
    let app = Keyward::open(config.clone());
    StatusReport {
        data_dir: app.data_dir().display().to_string(),
        key_file: FileStatus::of(&storage.key_path()),
        login_file: FileStatus::of(&storage.login_path()),
        credentials_file: FileStatus::of(&storage.credentials_path()),
        auth_state: app.auth_state(),
    }
}

/// Run the `keyward status` command.
///
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub fn run_status(config: &KeywardConfig, json: bool, plain: bool) -> Result<(), KeywardError> {
    let report = collect_status(config);
    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| KeywardError::Internal(format!("failed to render status: {e}")))?;
        println!("{out}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&report, use_color);
    }
    Ok(())
}

fn print_status(report: &StatusReport, use_color: bool) {
    println!();
    println!("  keyward status");
    println!("  {}", "-".repeat(35));
    println!("    Storage:     {}", report.data_dir);
    print_file("Key file:", &report.key_file, use_color);
    print_file("Login file:", &report.login_file, use_color);
    print_file("Credentials:", &report.credentials_file, use_color);

    let account = match report.auth_state {
        AuthState::NoAccount => "none (run `keyward` to sign up)",
        _ => "created",
    };
    println!("    Account:     {account}");
    println!();
}

fn print_file(label: &str, file: &FileStatus, use_color: bool) {
    let marker = match (file.exists, use_color) {
        (true, true) => {
            use colored::Colorize;
            "✓".green().to_string()
        }
        (false, true) => {
            use colored::Colorize;
            "-".dimmed().to_string()
        }
        (true, false) => "[OK]".to_string(),
        (false, false) => "[--]".to_string(),
    };
    println!("    {label:<12} {marker} {}", file.path);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> KeywardConfig {
        let mut config = KeywardConfig::default();
        config.storage.data_dir = Some(dir.display().to_string());
        config
    }

    #[test]
    fn fresh_directory_has_no_account() {
        let dir = tempfile::tempdir().unwrap();
        let report = collect_status(&config_in(dir.path()));
        assert_eq!(report.auth_state, AuthState::NoAccount);
        assert!(!report.key_file.exists);
        assert!(!report.login_file.exists);
        assert!(report.credentials_file.path.ends_with("accounts.json"));
    }

    #[test]
    fn existing_login_file_means_awaiting_login() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("login.json"), "{}").unwrap();
        let report = collect_status(&config_in(dir.path()));
        assert_eq!(report.auth_state, AuthState::AwaitingLogin);
        assert!(report.login_file.exists);
    }

    #[test]
    fn status_report_serializes() {
        let dir = tempfile::tempdir().unwrap();
        let report = collect_status(&config_in(dir.path()));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"auth_state\":\"no_account\""));
        assert!(json.contains("\"exists\":false"));
    }
}
