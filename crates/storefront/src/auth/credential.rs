//! Bearer credential handed out at sign-in.

use secrecy::{ExposeSecret, SecretString};

use super::decoder::{self, Claims, DecodeError};

/// An opaque bearer token (`header.payload.signature`).
///
/// The raw value is held as a secret so it never shows up in `Debug` output
/// or log fields.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw token, e.g. for an `Authorization` header or storage.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Decode the (unverified) claims in the payload segment.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the token is malformed.
    pub fn claims(&self) -> Result<Claims, DecodeError> {
        decoder::decode(self.expose())
    }
}

impl From<SecretString> for Credential {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("aaa.bbb.ccc");
        let debug_output = format!("{credential:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("bbb"));
    }

    #[test]
    fn test_expose_returns_raw_value() {
        assert_eq!(Credential::new("aaa.bbb.ccc").expose(), "aaa.bbb.ccc");
    }
}
