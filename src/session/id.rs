//! Session identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a game session.
///
/// Identifiers are allocated by the store in creation order, starting at 1,
/// and are never reused. On the wire the ID is a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i64);

impl SessionId {
    /// The first identifier a fresh store hands out.
    pub const FIRST: SessionId = SessionId(1);

    /// Get the raw integer value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Create a SessionId from a raw integer value.
    pub fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// The identifier allocated after this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(SessionId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequence() {
        let mut id = SessionId::FIRST;
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            assert!(seen.insert(id), "Duplicate ID generated: {}", id);
            id = id.next();
        }
        assert_eq!(id.as_i64(), 1_001);
    }

    #[test]
    fn test_display_and_parse() {
        let id = SessionId::from_raw(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<SessionId>().unwrap(), id);
        assert!("sess-42".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&SessionId::from_raw(7)).unwrap();
        assert_eq!(json, "7");
    }
}
