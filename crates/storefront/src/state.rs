//! Client state shared across views and commands.

use std::sync::Arc;

use tracing::debug;

use crate::api::ApiClient;
use crate::auth::{AccountService, AuthorizationGate, Credential, StorageTokenStore, TokenStore};
use crate::cart::{CartCounter, CartService, CartStore};
use crate::config::{ClientConfig, TokenScope};
use crate::error::ClientError;
use crate::storage::{FileStorage, MemoryStorage, Storage};

/// The token store used throughout the client: whichever backend the
/// configured [`TokenScope`] selects.
pub type ClientTokenStore = StorageTokenStore<Arc<dyn Storage>>;

/// State shared by every part of the storefront client.
///
/// This struct is cheaply cloneable via `Arc`. Every accessor that touches
/// the bearer token goes through the same backend, so a token written by
/// sign-in is the one the gate and the cart read.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: ClientConfig,
    api: ApiClient,
    session: Arc<MemoryStorage>,
    durable: Arc<FileStorage>,
    counter: CartCounter,
}

impl Storefront {
    /// Create client state from configuration.
    ///
    /// When a session token is configured it is written into session
    /// storage, mirroring a browser tab that already holds one.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the session
    /// token cannot be stored.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let durable = Arc::new(FileStorage::in_dir(&config.data_dir));
        Self::with_storage(config, durable)
    }

    /// Create client state with an explicit durable backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the session
    /// token cannot be stored.
    pub fn with_storage(
        config: ClientConfig,
        durable: Arc<FileStorage>,
    ) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config.api)?;
        let session = Arc::new(MemoryStorage::new());

        if let Some(token) = &config.session_token {
            StorageTokenStore::new(Arc::clone(&session))
                .set(&Credential::from(token.clone()))?;
            debug!("Seeded session storage with configured token");
        }

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                api,
                session,
                durable,
                counter: CartCounter::default(),
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the REST API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Session-scoped storage.
    #[must_use]
    pub fn session_storage(&self) -> Arc<MemoryStorage> {
        Arc::clone(&self.inner.session)
    }

    /// Durable storage.
    #[must_use]
    pub fn durable_storage(&self) -> Arc<FileStorage> {
        Arc::clone(&self.inner.durable)
    }

    /// The shared cart counter.
    #[must_use]
    pub fn counter(&self) -> &CartCounter {
        &self.inner.counter
    }

    /// Token store for the configured scope.
    #[must_use]
    pub fn token_store(&self) -> ClientTokenStore {
        let storage: Arc<dyn Storage> = match self.inner.config.token_scope {
            TokenScope::Session => self.session_storage(),
            TokenScope::Durable => self.durable_storage(),
        };
        StorageTokenStore::new(storage)
    }

    /// Gate for admin-only views.
    #[must_use]
    pub fn admin_gate(&self) -> AuthorizationGate<ClientTokenStore> {
        AuthorizationGate::new(self.token_store())
    }

    /// The local cart, kept in durable storage.
    #[must_use]
    pub fn cart_store(&self) -> CartStore<Arc<FileStorage>> {
        CartStore::new(self.durable_storage())
    }

    /// Networked cart operations.
    #[must_use]
    pub fn cart_service(&self) -> CartService<ClientTokenStore> {
        CartService::new(
            self.api().clone(),
            self.token_store(),
            self.counter().clone(),
        )
    }

    /// Sign-in, sign-out and password reset.
    #[must_use]
    pub fn account(&self) -> AccountService<ClientTokenStore> {
        AccountService::new(self.api().clone(), self.token_store())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use secrecy::SecretString;

    use super::*;
    use crate::auth::GateOutcome;

    fn config(scope: TokenScope, session_token: Option<&str>) -> ClientConfig {
        ClientConfig::from_lookup(|key| match key {
            "BAZAAR_API_URL" => Some("http://127.0.0.1:9/".to_string()),
            "BAZAAR_TOKEN_SCOPE" => Some(
                match scope {
                    TokenScope::Session => "session",
                    TokenScope::Durable => "durable",
                }
                .to_string(),
            ),
            "BAZAAR_TOKEN" => session_token.map(String::from),
            _ => None,
        })
        .unwrap()
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("bazaar-state-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_session_token_is_seeded() {
        let durable = Arc::new(FileStorage::in_dir(temp_dir()));
        let state = Storefront::with_storage(
            config(TokenScope::Session, Some("a.b.c")),
            Arc::clone(&durable),
        )
        .unwrap();

        let token = state.token_store().get().unwrap().unwrap();
        assert_eq!(token.expose(), "a.b.c");
        // Durable storage is untouched
        assert!(durable.get_item("token").unwrap().is_none());
    }

    #[test]
    fn test_gate_reads_the_store_sign_in_writes() {
        let dir = temp_dir();
        let state = Storefront::with_storage(
            config(TokenScope::Durable, None),
            Arc::new(FileStorage::in_dir(&dir)),
        )
        .unwrap();

        assert!(!state.admin_gate().evaluate().is_authorized());

        // {"role":"ADMIN"}
        let token = "h.eyJyb2xlIjoiQURNSU4ifQ.s";
        state
            .token_store()
            .set(&Credential::from(SecretString::from(token)))
            .unwrap();

        assert!(matches!(
            state.admin_gate().evaluate(),
            GateOutcome::Authorized(_)
        ));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_clones_share_counter() {
        let state = Storefront::with_storage(
            config(TokenScope::Session, None),
            Arc::new(FileStorage::in_dir(temp_dir())),
        )
        .unwrap();
        let other = state.clone();

        state.counter().increment();
        assert_eq!(other.cart_service().counter().count(), 1);
    }
}
