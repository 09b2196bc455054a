//! Country Codes Library
//!
//! Maps free-text country names onto ISO 3166-1 alpha-3 codes.
//!
//! Resolution runs in two stages:
//! 1. Canonical lookup against the ISO 3166-1 registry (codes, short name,
//!    official name, common name; case-insensitive)
//! 2. Manual override table for naming discrepancies and deliberate
//!    sovereign reassignments (e.g. French overseas departments → `FRA`)
//!
//! Anything that fails both stages is absent, never guessed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod overrides;
pub mod registry;
pub mod resolver;

pub use overrides::{OverrideEntry, OverridePolicy, OverrideTable};
pub use registry::{CountryEntry, Registry};
pub use resolver::{IsoResolver, Resolution, ResolutionSource};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Invalid alpha-3 code: {0:?}")]
    InvalidAlpha3(String),
    #[error("Duplicate override key: {0:?}")]
    DuplicateOverride(String),
}

pub type Result<T> = std::result::Result<T, CodeError>;

/// ISO 3166-1 alpha-3 code: always three uppercase ASCII letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alpha3([u8; 3]);

impl Alpha3 {
    /// Parse a code, trimming whitespace and uppercasing
    pub fn parse(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CodeError::InvalidAlpha3(code.to_string()));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII letters
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Alpha3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alpha3 {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Alpha3 {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Alpha3> for String {
    fn from(code: Alpha3) -> Self {
        code.as_str().to_string()
    }
}

impl AsRef<str> for Alpha3 {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha3_normalizes() {
        let code = Alpha3::parse(" fra ").unwrap();
        assert_eq!(code.as_str(), "FRA");
        assert_eq!(code.to_string(), "FRA");
    }

    #[test]
    fn test_alpha3_rejects_bad_input() {
        assert!(Alpha3::parse("FR").is_err());
        assert!(Alpha3::parse("FRAN").is_err());
        assert!(Alpha3::parse("-99").is_err());
        assert!(Alpha3::parse("").is_err());
        assert!(Alpha3::parse("ÉTA").is_err());
    }

    #[test]
    fn test_alpha3_serde() {
        let code: Alpha3 = serde_json::from_str("\"bol\"").unwrap();
        assert_eq!(code.as_str(), "BOL");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"BOL\"");
        assert!(serde_json::from_str::<Alpha3>("\"B1L\"").is_err());
    }
}
