//! Storefront API client implementation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use bazaar_core::{Email, ProductId};

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::types::{
    AddToCartRequest, AddToCartResponse, ErrorBody, ForgotPasswordRequest, MessageResponse,
    Product, ResetPasswordRequest, SignInRequest, SignInResponse,
};
use crate::auth::Credential;
use crate::config::ApiConfig;

/// How long catalogue responses stay cached.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached catalogue entries.
const CACHE_CAPACITY: u64 = 1000;

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL
    /// cannot carry path segments (e.g. `mailto:`).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments (each segment is escaped).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request and decode a JSON response.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|error| error.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            debug!(status = %status, message = %message, "API returned non-success status");
            return Err(ApiError::Status { status, message });
        }

        let body = if body.trim().is_empty() { "{}" } else { &body };
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Fetch a single product. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown products, or any transport
    /// or parse error.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Arc<Product>, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.endpoint(&["products", id.as_str()])?;
        let product: Product = self
            .execute(self.inner.client.get(url))
            .await
            .map_err(|e| not_found_as(e, || format!("product {id}")))?;

        let product = Arc::new(product);
        self.inner
            .cache
            .insert(key, CacheValue::Product(Arc::clone(&product)))
            .await;
        Ok(product)
    }

    /// Fetch products related to `id`. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown products, or any transport
    /// or parse error.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn related_products(&self, id: &ProductId) -> Result<Arc<Vec<Product>>, ApiError> {
        let key = CacheKey::Related(id.clone());
        if let Some(CacheValue::Related(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for related products");
            return Ok(products);
        }

        let url = self.endpoint(&["products", id.as_str(), "related"])?;
        let products: Vec<Product> = self
            .execute(self.inner.client.get(url))
            .await
            .map_err(|e| not_found_as(e, || format!("product {id}")))?;

        let products = Arc::new(products);
        self.inner
            .cache
            .insert(key, CacheValue::Related(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// Fetch a random selection of recommended products. Never cached.
    ///
    /// # Errors
    ///
    /// Returns any transport or parse error.
    #[instrument(skip(self))]
    pub async fn recommendations(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&["products", "random", "recommendations"])?;
        self.execute(self.inner.client.get(url)).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add `quantity` units of a product to the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the API rejects the request (the
    /// message may still say the item is already in the cart), or any
    /// transport or parse error.
    #[instrument(skip(self, credential, product_id), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        credential: &Credential,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<AddToCartResponse, ApiError> {
        let url = self.endpoint(&["cart", "add"])?;
        let request = self
            .inner
            .client
            .post(url)
            .bearer_auth(credential.expose())
            .json(&AddToCartRequest {
                product_id,
                quantity,
            });
        self.execute(request).await
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Exchange email and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for rejected credentials, or any
    /// transport or parse error.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Credential, ApiError> {
        let url = self.endpoint(&["auth", "signin"])?;
        let request = self.inner.client.post(url).json(&SignInRequest {
            email,
            password: password.expose_secret(),
        });
        let response: SignInResponse = self.execute(request).await?;
        Ok(Credential::new(response.token))
    }

    /// Ask the API to email a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or parse error.
    #[instrument(skip(self, email), fields(email = %email))]
    pub async fn request_password_reset(&self, email: &Email) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["auth", "forgot-password"])?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&ForgotPasswordRequest { email });
        self.execute(request).await
    }

    /// Set a new password using the token from a reset link.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or parse error.
    #[instrument(skip(self, reset_token, password))]
    pub async fn reset_password(
        &self,
        reset_token: &SecretString,
        password: &SecretString,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["auth", "reset-password"])?;
        let request = self.inner.client.post(url).json(&ResetPasswordRequest {
            token: reset_token.expose_secret(),
            password: password.expose_secret(),
        });
        self.execute(request).await
    }
}

/// Turn a 404 status into [`ApiError::NotFound`] naming the resource.
fn not_found_as(error: ApiError, what: impl FnOnce() -> String) -> ApiError {
    match error {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            ..
        } => ApiError::NotFound(what()),
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn api(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = api("https://shop.example.com/api/");
        let url = client.endpoint(&["products", "42", "related"]).unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/products/42/related");

        let client = api("https://shop.example.com/api");
        let url = client.endpoint(&["cart", "add"]).unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/cart/add");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = api("https://shop.example.com/");
        let url = client.endpoint(&["products", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/products/a%2Fb%20c");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = ApiClient::new(&ApiConfig {
            base_url: Url::parse("mailto:shop@example.com").unwrap(),
            timeout: Duration::from_secs(5),
        });
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_not_found_mapping() {
        let err = not_found_as(
            ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: "missing".to_string(),
            },
            || "product 9".to_string(),
        );
        assert_eq!(err.to_string(), "Not found: product 9");

        let err = not_found_as(
            ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                message: "down".to_string(),
            },
            || "product 9".to_string(),
        );
        assert!(matches!(err, ApiError::Status { .. }));
    }
}
