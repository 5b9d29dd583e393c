//! Networked add-to-cart.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use bazaar_core::ProductId;

use super::counter::CartCounter;
use crate::api::{ApiClient, ApiError, mentions_already};
use crate::auth::TokenStore;
use crate::notice::Notice;

/// Result of a successful add-to-cart call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The item was added; the cart counter was bumped.
    Added,
    /// The item was already in the cart; nothing changed.
    AlreadyInCart,
}

impl AddOutcome {
    /// Notice to show the user.
    #[must_use]
    pub fn notice(self) -> Notice {
        match self {
            Self::Added => Notice::success("Added to cart"),
            Self::AlreadyInCart => Notice::info("This item is already in your cart"),
        }
    }
}

/// Errors from add-to-cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// No credential is stored, or the API rejected it.
    #[error("sign in required")]
    Unauthenticated,

    /// The request failed or the API refused it.
    #[error("cart request failed: {0}")]
    Api(#[from] ApiError),
}

impl CartError {
    /// Notice to show the user. Internal details are not exposed.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Unauthenticated => Notice::error("Please sign in to add items to your cart"),
            Self::Api(_) => Notice::error("Could not add the item to your cart. Please try again."),
        }
    }
}

/// Adds products to the signed-in user's server-side cart.
pub struct CartService<T> {
    api: ApiClient,
    tokens: T,
    counter: CartCounter,
}

impl<T: TokenStore> CartService<T> {
    /// Create a service that authenticates with `tokens` and bumps `counter`.
    pub const fn new(api: ApiClient, tokens: T, counter: CartCounter) -> Self {
        Self {
            api,
            tokens,
            counter,
        }
    }

    /// The counter this service updates.
    pub const fn counter(&self) -> &CartCounter {
        &self.counter
    }

    /// Add one unit of `product_id` to the cart.
    ///
    /// Without a stored credential this fails immediately and makes no
    /// request. A response saying the item is already present is a success
    /// ([`AddOutcome::AlreadyInCart`]) and leaves the counter alone. Failures
    /// are not retried.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Unauthenticated`] when no credential is stored or
    /// the API answers 401, and [`CartError::Api`] for anything else.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId) -> Result<AddOutcome, CartError> {
        let credential = match self.tokens.get() {
            Ok(Some(credential)) => credential,
            Ok(None) => return Err(CartError::Unauthenticated),
            Err(e) => {
                warn!(error = %e, "Failed to read credential");
                return Err(CartError::Unauthenticated);
            }
        };

        let outcome = match self.api.add_to_cart(&credential, product_id, 1).await {
            Ok(response) => response.outcome(),
            Err(e) if e.server_message().is_some_and(mentions_already) => {
                AddOutcome::AlreadyInCart
            }
            Err(ApiError::Status {
                status: StatusCode::UNAUTHORIZED,
                ..
            }) => return Err(CartError::Unauthenticated),
            Err(e) => {
                error!(error = %e, "Failed to add item to cart");
                return Err(CartError::Api(e));
            }
        };

        if outcome == AddOutcome::Added {
            let count = self.counter.increment();
            info!(count, "Item added to cart");
        }

        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::auth::StorageTokenStore;
    use crate::config::ApiConfig;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_requires_credential_before_any_request() {
        // Nothing listens on this port; a request would fail with Http, not Unauthenticated.
        let api = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9/").unwrap(),
            timeout: Duration::from_millis(200),
        })
        .unwrap();
        let service = CartService::new(
            api,
            StorageTokenStore::new(MemoryStorage::new()),
            CartCounter::default(),
        );

        let err = service
            .add_to_cart(&ProductId::new("p-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Unauthenticated));
        assert_eq!(service.counter().count(), 0);
    }

    #[test]
    fn test_notices() {
        assert!(CartError::Unauthenticated.notice().is_error());
        assert_eq!(AddOutcome::Added.notice(), Notice::success("Added to cart"));
        assert!(!AddOutcome::AlreadyInCart.notice().is_error());
    }
}
