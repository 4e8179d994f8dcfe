use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

const ORGANIZATION_PREFIX: &str = "frc";

/// Canonical team identifier: the bare number as it appears in match rosters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TeamNumber(String);

impl TeamNumber {
    /// Accepts either `254` or `frc254` (prefix matched case-insensitively).
    pub fn from_raw(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let number = match trimmed.get(..ORGANIZATION_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(ORGANIZATION_PREFIX) => {
                &trimmed[ORGANIZATION_PREFIX.len()..]
            }
            _ => trimmed,
        };
        if number.is_empty() {
            return Err(Error::MissingParameter { name: "teamKey" });
        }
        Ok(Self(number.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_prefix() {
        assert_eq!(TeamNumber::from_raw("frc254").unwrap().as_str(), "254");
        assert_eq!(TeamNumber::from_raw("FRC254").unwrap().as_str(), "254");
        assert_eq!(TeamNumber::from_raw(" 254 ").unwrap().as_str(), "254");
    }

    #[test]
    fn test_empty_is_missing() {
        assert!(matches!(
            TeamNumber::from_raw("frc"),
            Err(Error::MissingParameter { name: "teamKey" })
        ));
        assert!(TeamNumber::from_raw("   ").is_err());
    }
}
