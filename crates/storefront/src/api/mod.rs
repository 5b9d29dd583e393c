//! REST client for the storefront API.
//!
//! # Architecture
//!
//! - `reqwest` for HTTP, JSON bodies in both directions
//! - The remote API is the source of truth; nothing is synced locally
//! - In-memory caching via `moka` for product lookups (5 minute TTL)
//!
//! # Endpoints
//!
//! - `GET /products/:id`, `GET /products/:id/related`,
//!   `GET /products/random/recommendations`
//! - `POST /cart/add`
//! - `POST /auth/signin`, `POST /auth/forgot-password`, `POST /auth/reset-password`
//!
//! Error responses are expected to carry a JSON `message` field.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let product = client.get_product(&ProductId::new("42")).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// `message` from the error body, or a snippet of the raw body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The HTTP status, if the API answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// The server-provided message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "Quantity must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API returned 400 Bad Request: Quantity must be positive"
        );
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(
            ApiError::NotFound(String::new()).status(),
            Some(StatusCode::NOT_FOUND)
        );
        assert_eq!(ApiError::InvalidBaseUrl(String::new()).status(), None);
    }
}
