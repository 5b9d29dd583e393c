//! Credential payload decoding.
//!
//! **Advisory only.** The payload segment is base64url-decoded and parsed as
//! JSON; the signature is never checked and neither is expiry, issuer or
//! audience. The result drives UI decisions (which screen to show), nothing
//! more. Any server receiving the credential must verify it independently.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use thiserror::Error;

use bazaar_core::Role;

/// Upper bound on the decoded payload size.
pub const MAX_PAYLOAD_BYTES: usize = 16 * 1024;

/// Reasons a credential payload cannot be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The credential has no second (payload) segment.
    #[error("credential has no payload segment")]
    MissingPayload,

    /// The payload segment is not valid base64url.
    #[error("payload is not valid base64url: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decoded payload is larger than [`MAX_PAYLOAD_BYTES`].
    #[error("payload is {size} bytes, limit is {MAX_PAYLOAD_BYTES}")]
    PayloadTooLarge {
        /// Decoded size in bytes.
        size: usize,
    },

    /// The decoded payload is not JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The decoded payload is JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Claims decoded from an unverified credential.
///
/// Parsing is optimistic: any JSON object is accepted and only `role` is
/// interpreted. Other fields are kept for display and logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    fields: Map<String, Value>,
}

impl Claims {
    /// The `role` claim, if present and a string.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.fields
            .get("role")
            .and_then(Value::as_str)
            .map(Role::from)
    }

    /// The `sub` claim, if present and a string.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.fields.get("sub").and_then(Value::as_str)
    }

    /// Look up any claim by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the `role` claim matches `role` exactly.
    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        self.role().as_ref() == Some(role)
    }
}

/// Decode the claims carried in a `header.payload.signature` credential.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the payload segment is missing, not
/// base64url, oversized, or not a JSON object.
pub fn decode(credential: &str) -> Result<Claims, DecodeError> {
    let payload = credential
        .split('.')
        .nth(1)
        .ok_or(DecodeError::MissingPayload)?;

    // Some issuers pad the segment; base64url in tokens is normally unpadded.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    if bytes.len() > MAX_PAYLOAD_BYTES {
        return Err(DecodeError::PayloadTooLarge { size: bytes.len() });
    }

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(fields) => Ok(Claims { fields }),
        _ => Err(DecodeError::NotAnObject),
    }
}
