//! Role-based authorization gate for protected views.
//!
//! Evaluation runs once per view entry and in a fixed order:
//!
//! 1. No credential -> redirect to sign-in
//! 2. Credential fails to decode -> log, redirect to sign-in
//! 3. Role differs from the required role -> redirect home
//! 4. Otherwise -> authorized, render
//!
//! The decision is advisory (see [`decoder`](super::decoder)): it picks what
//! to show, it does not protect data. A credential changed after evaluation
//! is only noticed on the next evaluation.

use bazaar_core::Role;
use tracing::{debug, warn};

use super::decoder::Claims;
use super::token_store::TokenStore;
use crate::error::add_breadcrumb;
use crate::navigation::{Navigator, Route};

/// Why the gate refused to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No credential in the token store.
    Unauthenticated,
    /// A credential exists but could not be decoded.
    MalformedCredential,
    /// The credential's role is not the required one.
    Unauthorized,
}

impl DenyReason {
    /// Where the client is sent for this reason.
    #[must_use]
    pub const fn redirect(self) -> Route {
        match self {
            Self::Unauthenticated | Self::MalformedCredential => Route::SignIn,
            Self::Unauthorized => Route::Home,
        }
    }
}

/// Result of evaluating the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Render the protected content.
    Authorized(Claims),
    /// Do not render; navigate to `to`.
    Redirect {
        /// Navigation target.
        to: Route,
        /// Why access was refused.
        reason: DenyReason,
    },
}

impl GateOutcome {
    fn deny(reason: DenyReason) -> Self {
        Self::Redirect {
            to: reason.redirect(),
            reason,
        }
    }

    /// Returns true if the content may be rendered.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}

/// Restricts a view to a single role, reading the credential from an
/// injected [`TokenStore`].
#[derive(Debug, Clone)]
pub struct AuthorizationGate<T> {
    tokens: T,
    required: Role,
}

impl<T: TokenStore> AuthorizationGate<T> {
    /// A gate that admits only [`Role::Admin`].
    pub const fn new(tokens: T) -> Self {
        Self::requiring(tokens, Role::Admin)
    }

    /// A gate that admits only `required`.
    pub const fn requiring(tokens: T, required: Role) -> Self {
        Self { tokens, required }
    }

    /// The role this gate admits.
    pub const fn required_role(&self) -> &Role {
        &self.required
    }

    /// Decide what to do without navigating.
    pub fn evaluate(&self) -> GateOutcome {
        let credential = match self.tokens.get() {
            Ok(Some(credential)) => credential,
            Ok(None) => return GateOutcome::deny(DenyReason::Unauthenticated),
            Err(e) => {
                warn!(error = %e, "Failed to read credential; treating as signed out");
                return GateOutcome::deny(DenyReason::Unauthenticated);
            }
        };

        let claims = match credential.claims() {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Failed to decode credential");
                return GateOutcome::deny(DenyReason::MalformedCredential);
            }
        };

        if !claims.has_role(&self.required) {
            debug!(
                required = %self.required,
                role = claims.role().as_ref().map_or("<none>", Role::as_str),
                "Role does not match"
            );
            return GateOutcome::deny(DenyReason::Unauthorized);
        }

        GateOutcome::Authorized(claims)
    }

    /// Evaluate, then either render or navigate.
    ///
    /// On success `render` is called with the decoded claims and its value is
    /// returned; no navigation happens. Otherwise exactly one navigation is
    /// issued and `render` is never called.
    pub fn guard<N, R, F>(&self, navigator: &N, render: F) -> Option<R>
    where
        N: Navigator + ?Sized,
        F: FnOnce(&Claims) -> R,
    {
        match self.evaluate() {
            GateOutcome::Authorized(claims) => Some(render(&claims)),
            GateOutcome::Redirect { to, reason } => {
                add_breadcrumb(
                    "auth",
                    "Protected view redirected",
                    Some(&[("to", to.path()), ("reason", reason_label(reason))]),
                );
                navigator.navigate(to);
                None
            }
        }
    }
}

const fn reason_label(reason: DenyReason) -> &'static str {
    match reason {
        DenyReason::Unauthenticated => "unauthenticated",
        DenyReason::MalformedCredential => "malformed_credential",
        DenyReason::Unauthorized => "unauthorized",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    use super::*;
    use crate::auth::{Credential, StorageTokenStore, TOKEN_KEY};
    use crate::navigation::HistoryNavigator;
    use crate::storage::{MemoryStorage, Storage};

    fn token(payload: &str) -> Credential {
        Credential::new(format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(payload)))
    }

    fn gate_with(credential: Option<Credential>) -> AuthorizationGate<StorageTokenStore<MemoryStorage>> {
        let store = StorageTokenStore::new(MemoryStorage::new());
        if let Some(credential) = credential {
            store.set(&credential).unwrap();
        }
        AuthorizationGate::new(store)
    }

    #[test]
    fn test_admin_renders_without_redirect() {
        let gate = gate_with(Some(token(r#"{"role":"ADMIN"}"#)));
        let navigator = HistoryNavigator::new();

        let rendered = gate.guard(&navigator, |claims| claims.role());

        assert_eq!(rendered, Some(Some(Role::Admin)));
        assert!(navigator.history().is_empty());
    }

    #[test]
    fn test_non_admin_redirects_home() {
        let gate = gate_with(Some(token(r#"{"role":"USER"}"#)));
        let navigator = HistoryNavigator::new();

        let rendered = gate.guard(&navigator, |_| "secret");

        assert_eq!(rendered, None);
        assert_eq!(navigator.history(), vec![Route::Home]);
    }

    #[test]
    fn test_missing_role_redirects_home() {
        let outcome = gate_with(Some(token(r#"{"sub":"1"}"#))).evaluate();
        assert_eq!(
            outcome,
            GateOutcome::Redirect {
                to: Route::Home,
                reason: DenyReason::Unauthorized
            }
        );
    }

    #[test]
    fn test_no_credential_redirects_to_signin() {
        let gate = gate_with(None);
        let navigator = HistoryNavigator::new();

        assert_eq!(gate.guard(&navigator, |_| ()), None);
        assert_eq!(navigator.history(), vec![Route::SignIn]);
    }

    #[test]
    fn test_malformed_credentials_redirect_to_signin() {
        for raw in ["garbage", "a.!!!.c", "a.bm90IGpzb24.c", "a.WzFd.c"] {
            let gate = gate_with(Some(Credential::new(raw)));
            let navigator = HistoryNavigator::new();

            let rendered = gate.guard(&navigator, |_| "secret");

            assert_eq!(rendered, None, "rendered for {raw}");
            assert_eq!(navigator.history(), vec![Route::SignIn], "for {raw}");
            assert_eq!(
                gate.evaluate(),
                GateOutcome::Redirect {
                    to: Route::SignIn,
                    reason: DenyReason::MalformedCredential
                }
            );
        }
    }

    #[test]
    fn test_custom_required_role() {
        let store = StorageTokenStore::new(MemoryStorage::new());
        store.set(&token(r#"{"role":"EDITOR"}"#)).unwrap();
        let gate = AuthorizationGate::requiring(store, Role::from("EDITOR"));

        assert!(gate.evaluate().is_authorized());
    }

    #[test]
    fn test_gate_reads_the_injected_backend() {
        let session = std::sync::Arc::new(MemoryStorage::new());
        session
            .set_item(TOKEN_KEY, token(r#"{"role":"ADMIN"}"#).expose())
            .unwrap();

        let session_gate = AuthorizationGate::new(StorageTokenStore::new(session));
        let durable_gate = AuthorizationGate::new(StorageTokenStore::new(MemoryStorage::new()));

        assert!(session_gate.evaluate().is_authorized());
        assert!(!durable_gate.evaluate().is_authorized());
    }
}
