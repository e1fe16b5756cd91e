// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Case-insensitive service-name filtering.
//!
//! Stateless: callers pass the current snapshot on every keystroke.

/// Anything that can be matched by service name.
pub trait ServiceName {
    fn service_name(&self) -> &str;
}

/// Whether `service` contains `term`, ignoring case.
pub fn matches(service: &str, term: &str) -> bool {
    service.to_lowercase().contains(&term.to_lowercase())
}

/// Keep the records whose service contains `term`, in their original order.
///
/// An empty term returns the input unchanged.
pub fn filter<T: ServiceName>(records: Vec<T>, term: &str) -> Vec<T> {
    if term.is_empty() {
        return records;
    }
    let needle = term.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.service_name().to_lowercase().contains(&needle))
        .collect()
}
