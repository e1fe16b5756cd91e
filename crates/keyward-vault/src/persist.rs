// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-file JSON persistence for the storage directory.
//!
//! Files are always rewritten in full: the new content goes to a temp file
//! next to the target and is renamed over it.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use keyward_core::KeywardError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Create `dir` and its parents if missing. An existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<(), KeywardError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| KeywardError::persistence(dir, e))
}

/// Read a file to a string, mapping "not found" to `None`.
pub fn read_optional(path: &Path) -> Result<Option<String>, KeywardError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(KeywardError::persistence(path, e)),
    }
}

/// Read and parse a JSON file, `None` if it does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, KeywardError> {
    match read_optional(path)? {
        Some(contents) => serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| KeywardError::persistence(path, e)),
        None => Ok(None),
    }
}

/// Serialize `value` as 2-space indented JSON and replace `path` with it.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), KeywardError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| KeywardError::persistence(path, e))?;
    write_atomic(path, json.as_bytes())
}

/// Replace `path` with `contents` via a temp file in the same directory.
///
/// The temp file is created owner-only, so the result is too.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), KeywardError> {
    let dir = parent_dir(path);
    ensure_dir(dir)?;

    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| KeywardError::persistence(path, e))?;
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| KeywardError::persistence(path, e))?;
    tmp.persist(path)
        .map_err(|e| KeywardError::persistence(path, e.error))?;
    Ok(())
}

/// Create `path` with `contents`, failing with `AlreadyExists` if it is there.
pub fn create_new(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
