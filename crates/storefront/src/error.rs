//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ClientError` type for operations that cross several
//! concerns. Errors reach the user only as [`Notice`]s; internal failures are
//! captured to Sentry before the notice is produced.

use thiserror::Error;

use bazaar_core::EmailError;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::config::ConfigError;
use crate::notice::Notice;
use crate::storage::StorageError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Storefront API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Add-to-cart failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The user typed an invalid email address.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl ClientError {
    /// Convert into a user-facing notice, reporting internal failures.
    #[must_use]
    pub fn into_notice(self) -> Notice {
        if matches!(self, Self::Storage(_) | Self::Config(_))
            || matches!(&self, Self::Api(e) if e.status().is_none_or(|s| s.is_server_error()))
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Client error"
            );
        }

        // Don't expose internal error details to users
        match self {
            Self::Config(_) => Notice::error("The client is not configured correctly"),
            Self::Storage(_) => Notice::error("Could not access local storage"),
            Self::Api(ApiError::NotFound(what)) => Notice::error(format!("Not found: {what}")),
            Self::Api(ApiError::Status { status, message }) if status.is_client_error() => {
                Notice::error(message)
            }
            Self::Api(_) => Notice::error("The store is unavailable. Please try again later."),
            Self::Cart(err) => err.notice(),
            Self::Email(err) => Notice::error(format!("Invalid email address: {err}")),
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Set the Sentry user context from a credential subject.
///
/// Call this after a successful sign-in to associate errors with the account.
pub fn set_sentry_user(subject: Option<&str>, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: subject.map(String::from),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the account.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("auth", "Protected view redirected", Some(&[("to", "/signin")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::notice::NoticeLevel;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Api(ApiError::NotFound("product 42".to_string()));
        assert_eq!(err.to_string(), "API error: Not found: product 42");

        let err = ClientError::Cart(CartError::Unauthenticated);
        assert_eq!(err.to_string(), "Cart error: sign in required");
    }

    #[test]
    fn test_client_errors_show_server_message() {
        let notice = ClientError::Api(ApiError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Password too short".to_string(),
        })
        .into_notice();
        assert_eq!(notice, Notice::error("Password too short"));
    }

    #[test]
    fn test_server_errors_are_hidden() {
        let notice = ClientError::Api(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "stack trace: db exploded".to_string(),
        })
        .into_notice();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(!notice.message.contains("db exploded"));
    }

    #[test]
    fn test_cart_errors_use_cart_notice() {
        let notice = ClientError::Cart(CartError::Unauthenticated).into_notice();
        assert_eq!(notice, CartError::Unauthenticated.notice());
    }
}
