//! Access tokens handed out on a successful join.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of random bytes behind each token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Opaque bearer credential identifying a client that joined a session.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Generate a fresh token from the thread-local CSPRNG, hex encoded.
    pub fn generate() -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Wrap a token presented by a client.
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// Tokens are credentials; keep them out of debug logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "AccessToken({prefix}..)")
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_format() {
        let token = AccessToken::generate();
        assert_eq!(token.as_str().len(), TOKEN_BYTES * 2);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_uniqueness() {
        let tokens: HashSet<_> = (0..1_000).map(|_| AccessToken::generate()).collect();
        assert_eq!(tokens.len(), 1_000);
    }

    #[test]
    fn test_debug_redacts() {
        let token = AccessToken::from_string("abcdef0123456789");
        let debug = format!("{:?}", token);
        assert!(debug.contains("abcdef"));
        assert!(!debug.contains("0123456789"));
    }
}
