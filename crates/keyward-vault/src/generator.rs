// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation by uniform sampling from a charset.
//!
//! Convenience only; this is not a security boundary.

use keyward_config::model::GeneratorConfig;
use rand::Rng;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()<>?/[]_+=-;";

/// Which character classes to draw from, and how many characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub numbers: bool,
    pub symbols: bool,
    pub uppercase: bool,
}

impl From<&GeneratorConfig> for GeneratorOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            length: config.length,
            numbers: config.numbers,
            symbols: config.symbols,
            uppercase: config.uppercase,
        }
    }
}

impl GeneratorOptions {
    /// Lowercase letters are always included; the rest are opt-in.
    pub fn charset(&self) -> Vec<char> {
        let mut charset = String::from(LOWERCASE);
        if self.uppercase {
            charset.push_str(UPPERCASE);
        }
        if self.numbers {
            charset.push_str(DIGITS);
        }
        if self.symbols {
            charset.push_str(SYMBOLS);
        }
        charset.chars().collect()
    }

    pub fn generate(&self) -> String {
        let charset = self.charset();
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| charset[rng.gen_range(0..charset.len())])
            .collect()
    }
}

/// Generate a password of `length` characters.
pub fn generate_password(
    length: usize,
    use_numbers: bool,
    use_symbols: bool,
    use_uppercase: bool,
) -> String {
    GeneratorOptions {
        length,
        numbers: use_numbers,
        symbols: use_symbols,
        uppercase: use_uppercase,
    }
    .generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_length() {
        assert_eq!(generate_password(0, true, true, true), "");
        assert_eq!(generate_password(32, true, true, true).chars().count(), 32);
    }

    #[test]
    fn lowercase_only_when_everything_disabled() {
        let pw = generate_password(200, false, false, false);
        assert!(pw.chars().all(|c| c.is_ascii_lowercase()), "{pw}");
    }

    #[test]
    fn stays_within_selected_classes() {
        let pw = generate_password(500, true, false, true);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()), "{pw}");

        let pw = generate_password(500, false, true, false);
        assert!(
            pw.chars().all(|c| c.is_ascii_lowercase() || SYMBOLS.contains(c)),
            "{pw}"
        );
    }

    #[test]
    fn charset_sizes() {
        let all = GeneratorOptions {
            length: 1,
            numbers: true,
            symbols: true,
            uppercase: true,
        };
        assert_eq!(all.charset().len(), 26 + 26 + 10 + SYMBOLS.len());
    }

    #[test]
    fn options_from_config() {
        let options = GeneratorOptions::from(&GeneratorConfig::default());
        assert_eq!(options.length, 16);
        assert_eq!(options.generate().chars().count(), 16);
    }
}
