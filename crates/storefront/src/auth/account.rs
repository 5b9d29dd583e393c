//! Sign-in, sign-out and password reset.

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use bazaar_core::Email;

use super::token_store::TokenStore;
use crate::api::ApiClient;
use crate::error::{self, ClientError};
use crate::notice::Notice;

/// Account flows that read or write the stored bearer token.
pub struct AccountService<T> {
    api: ApiClient,
    tokens: T,
}

impl<T: TokenStore> AccountService<T> {
    /// Create a service that persists credentials into `tokens`.
    pub const fn new(api: ApiClient, tokens: T) -> Self {
        Self { api, tokens }
    }

    /// The token store credentials are written to.
    pub const fn tokens(&self) -> &T {
        &self.tokens
    }

    /// Exchange credentials for a bearer token and store it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the credentials or the token
    /// cannot be stored.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Notice, ClientError> {
        let credential = self.api.sign_in(email, password).await?;
        self.tokens.set(&credential)?;

        // Claims are only used to label error reports here
        let subject = match credential.claims() {
            Ok(claims) => claims.subject().map(String::from),
            Err(e) => {
                warn!(error = %e, "Signed in with an undecodable token");
                None
            }
        };
        error::set_sentry_user(subject.as_deref(), Some(email.as_str()));
        error::add_breadcrumb("auth", "Signed in", None);

        info!("User signed in");
        Ok(Notice::success("Signed in"))
    }

    /// Remove the stored token. Signing out twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be written.
    #[instrument(skip(self))]
    pub fn sign_out(&self) -> Result<Notice, ClientError> {
        self.tokens.clear()?;
        error::clear_sentry_user();
        error::add_breadcrumb("auth", "Signed out", None);

        info!("User signed out");
        Ok(Notice::info("Signed out"))
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, email), fields(email = %email))]
    pub async fn request_password_reset(&self, email: &Email) -> Result<Notice, ClientError> {
        let response = self.api.request_password_reset(email).await?;
        Ok(Notice::success(message_or(
            response.message,
            "If that account exists, a reset link is on its way",
        )))
    }

    /// Set a new password from a reset token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the token or password.
    #[instrument(skip(self, reset_token, password))]
    pub async fn reset_password(
        &self,
        reset_token: &SecretString,
        password: &SecretString,
    ) -> Result<Notice, ClientError> {
        let response = self.api.reset_password(reset_token, password).await?;
        Ok(Notice::success(message_or(
            response.message,
            "Password updated. You can now sign in.",
        )))
    }
}

fn message_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
