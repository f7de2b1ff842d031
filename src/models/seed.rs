//! Seed keys addressing slices of the alphabetical index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Key for the entries that start with a digit.
pub const DIGITS_KEY: &str = "0-9";

/// One slice of the alphabetical index: `"0-9"` or a single lowercase letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeedKey(String);

impl SeedKey {
    /// The fixed, ordered set of 27 keys: digits first, then `a` to `z`.
    pub fn all() -> Vec<Self> {
        std::iter::once(DIGITS_KEY.to_string())
            .chain(('a'..='z').map(String::from))
            .map(Self)
            .collect()
    }

    /// Validate a user-supplied key.
    pub fn parse(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        let valid = key == DIGITS_KEY
            || (key.len() == 1 && key.chars().all(|c| c.is_ascii_lowercase()));

        if valid {
            Ok(Self(key))
        } else {
            Err(AppError::validation(format!(
                "Invalid seed key '{s}': expected \"{DIGITS_KEY}\" or a single letter"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SeedKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SeedKey> for String {
    fn from(key: SeedKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_in_order() {
        let keys = SeedKey::all();
        assert_eq!(keys.len(), 27);
        assert_eq!(keys[0].as_str(), "0-9");
        assert_eq!(keys[1].as_str(), "a");
        assert_eq!(keys[26].as_str(), "z");

        let expected: Vec<String> = std::iter::once("0-9".to_string())
            .chain(('a'..='z').map(String::from))
            .collect();
        let actual: Vec<String> = keys.into_iter().map(String::from).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_parse() {
        assert_eq!(SeedKey::parse("0-9").unwrap().as_str(), "0-9");
        assert_eq!(SeedKey::parse(" B ").unwrap().as_str(), "b");
        assert!(SeedKey::parse("").is_err());
        assert!(SeedKey::parse("ab").is_err());
        assert!(SeedKey::parse("1").is_err());
        assert!(SeedKey::parse("é").is_err());
    }
}
