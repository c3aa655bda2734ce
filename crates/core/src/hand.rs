//! Hand selection for an analysis run.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which of the two tracked arms a scoring run evaluates.
///
/// Together with the video id this is the unit of uniqueness for
/// analysis rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a hand from its wire representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(CoreError::Validation(format!(
                "Invalid hand '{other}'. Must be one of: left, right"
            ))),
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_hands() {
        assert_eq!(Hand::parse("left").unwrap(), Hand::Left);
        assert_eq!(Hand::parse("right").unwrap(), Hand::Right);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!(Hand::parse("both").is_err());
        assert!(Hand::parse("").is_err());
        assert!(Hand::parse("Left").is_err());
    }

    #[test]
    fn serde_roundtrip_is_lowercase() {
        assert_eq!(serde_json::to_string(&Hand::Left).unwrap(), "\"left\"");
        let hand: Hand = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(hand, Hand::Right);
    }
}
