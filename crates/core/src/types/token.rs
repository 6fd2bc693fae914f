//! Newsletter confirmation token.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A single-use credential proving control of a subscribed email address.
///
/// Tokens are 256 bits of randomness, hex-encoded to 64 lowercase
/// characters. A token is minted when a subscriber record is created,
/// embedded in the confirmation link, and irreversibly discarded the first
/// time it is exercised - its presence on a record is the sole gate for the
/// confirm operation.
///
/// `Debug` redacts the value so tokens never leak into logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ConfirmationToken(String);

impl ConfirmationToken {
    /// Hex length of a generated token (32 random bytes).
    pub const LENGTH: usize = 64;

    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Wrap an existing token value (e.g. from a confirmation link).
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConfirmationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfirmationToken([REDACTED])")
    }
}

impl From<String> for ConfirmationToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_charset() {
        let token = ConfirmationToken::generate();
        assert_eq!(token.as_str().len(), ConfirmationToken::LENGTH);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_generate_unique() {
        assert_ne!(
            ConfirmationToken::generate(),
            ConfirmationToken::generate()
        );
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = ConfirmationToken::generate();
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(token.as_str()));
    }
}
