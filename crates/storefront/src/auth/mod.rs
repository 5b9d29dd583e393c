//! Authentication for the storefront client.
//!
//! The bearer token is a JWT issued by the API. The client never verifies
//! its signature: claims read here drive navigation only, and the API
//! re-checks every request.
//!
//! - [`TokenStore`] - where the token lives (session or durable storage)
//! - [`decode`] - read the unverified payload claims
//! - [`AuthorizationGate`] - admit or redirect before a protected view renders
//! - [`AccountService`] - sign-in, sign-out and password reset

mod account;
mod credential;
mod decoder;
mod gate;
mod token_store;

pub use account::AccountService;
pub use credential::Credential;
pub use decoder::{Claims, DecodeError, MAX_PAYLOAD_BYTES, decode};
pub use gate::{AuthorizationGate, DenyReason, GateOutcome};
pub use token_store::{StorageTokenStore, TOKEN_KEY, TokenStore};
