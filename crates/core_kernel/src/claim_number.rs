//! Claim numbers
//!
//! Claim numbers are human-facing identifiers of the form
//! `PREFIX-YEAR-DIGITS`, e.g. `AS-2024-001234` for a personal auto claim or
//! `CAI-2024-123456` for a commercial auto claim. Newly generated numbers
//! take the year and the trailing six digits of the epoch-millisecond
//! timestamp at submission time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of trailing timestamp digits in a generated claim number
const SUFFIX_DIGITS: usize = 6;
const SUFFIX_MODULUS: i64 = 1_000_000;

/// Line of business a claim was filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimLine {
    /// Personal auto ("AS" claims)
    Personal,
    /// Commercial fleet auto ("CAI" claims)
    Commercial,
}

impl ClaimLine {
    /// Returns the claim-number prefix for this line
    pub fn prefix(&self) -> &'static str {
        match self {
            ClaimLine::Personal => "AS",
            ClaimLine::Commercial => "CAI",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "AS" => Some(ClaimLine::Personal),
            "CAI" => Some(ClaimLine::Commercial),
            _ => None,
        }
    }
}

/// Errors raised when parsing a claim number
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimNumberError {
    #[error("Malformed claim number: {0}")]
    Malformed(String),

    #[error("Unknown claim number prefix: {0}")]
    UnknownPrefix(String),
}

/// A validated claim number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClaimNumber {
    line: ClaimLine,
    value: String,
}

impl ClaimNumber {
    /// Generates a claim number for `line` at instant `at`
    pub fn generate(line: ClaimLine, at: DateTime<Utc>) -> Self {
        let suffix = at.timestamp_millis().rem_euclid(SUFFIX_MODULUS);
        Self {
            line,
            value: format!(
                "{}-{}-{:0width$}",
                line.prefix(),
                at.year(),
                suffix,
                width = SUFFIX_DIGITS
            ),
        }
    }

    /// Returns the line of business encoded in the prefix
    pub fn line(&self) -> ClaimLine {
        self.line
    }

    /// Returns the claim number as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ClaimNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for ClaimNumber {
    type Err = ClaimNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClaimNumberError::Malformed(s.to_string());

        let mut parts = s.split('-');
        let (Some(prefix), Some(year), Some(digits), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let line = ClaimLine::from_prefix(prefix)
            .ok_or_else(|| ClaimNumberError::UnknownPrefix(prefix.to_string()))?;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if digits.len() != SUFFIX_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        Ok(Self {
            line,
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for ClaimNumber {
    type Error = ClaimNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClaimNumber> for String {
    fn from(number: ClaimNumber) -> String {
        number.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_uses_year_and_trailing_millis() {
        let at = Utc.timestamp_millis_opt(1_705_329_000_123).unwrap();
        let number = ClaimNumber::generate(ClaimLine::Personal, at);
        assert_eq!(number.as_str(), "AS-2024-000123");
        assert_eq!(number.line(), ClaimLine::Personal);
    }

    #[test]
    fn test_generate_commercial_prefix() {
        let at = Utc.timestamp_millis_opt(1_705_329_987_654).unwrap();
        let number = ClaimNumber::generate(ClaimLine::Commercial, at);
        assert_eq!(number.as_str(), "CAI-2024-987654");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!("AS-2024-12345".parse::<ClaimNumber>().is_err());
        assert!("AS-24-123456".parse::<ClaimNumber>().is_err());
        assert!("AS-2024-123456-1".parse::<ClaimNumber>().is_err());
        assert_eq!(
            "XX-2024-123456".parse::<ClaimNumber>(),
            Err(ClaimNumberError::UnknownPrefix("XX".to_string()))
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let number: ClaimNumber = "CAI-2024-123456".parse().unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"CAI-2024-123456\"");
        let back: ClaimNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, number);
    }
}
