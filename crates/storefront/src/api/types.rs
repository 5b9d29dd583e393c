//! Request and response bodies for the storefront API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use bazaar_core::{DisplayPrice, Email, ProductId, Sku};

use crate::cart::AddOutcome;

/// A product as returned by the catalogue endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier (`id` or `_id` on the wire).
    #[serde(alias = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Edition or variant label.
    #[serde(default)]
    pub edition: Option<String>,
    /// Price as displayed.
    pub price: DisplayPrice,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<Sku>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL.
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
}

/// Body of `POST /cart/add`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest<'a> {
    /// Product to add.
    pub product_id: &'a ProductId,
    /// Number of units.
    pub quantity: u32,
}

/// Structured result code for `POST /cart/add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAddStatus {
    /// The item was added.
    Added,
    /// The item was already in the cart; nothing changed.
    AlreadyInCart,
    /// Any other value, e.g. a generic `"success"`. Classified by message.
    Unknown,
}

/// Response of `POST /cart/add`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddToCartResponse {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Structured result, when the API provides one.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<CartAddStatus>,
}

impl AddToCartResponse {
    /// Classify the response.
    ///
    /// A recognised `status` wins. Otherwise a message containing
    /// "already" (any case) means the item was already in the cart.
    #[must_use]
    pub fn outcome(&self) -> AddOutcome {
        match self.status {
            Some(CartAddStatus::Added) => AddOutcome::Added,
            Some(CartAddStatus::AlreadyInCart) => AddOutcome::AlreadyInCart,
            Some(CartAddStatus::Unknown) | None if mentions_already(&self.message) => {
                AddOutcome::AlreadyInCart
            }
            Some(CartAddStatus::Unknown) | None => AddOutcome::Added,
        }
    }
}

/// Accept any `status` value; unrecognised ones become [`CartAddStatus::Unknown`].
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<CartAddStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(value) => Some(serde_json::from_value(value).unwrap_or(CartAddStatus::Unknown)),
    })
}

/// Legacy duplicate-add detection on free-form server messages.
#[must_use]
pub fn mentions_already(message: &str) -> bool {
    message.to_lowercase().contains("already")
}

/// Body of `POST /auth/signin`.
#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    /// Account email.
    pub email: &'a Email,
    /// Account password.
    pub password: &'a str,
}

/// Response of `POST /auth/signin`.
#[derive(Deserialize)]
pub struct SignInResponse {
    /// Bearer token (`token` or `accessToken` on the wire).
    #[serde(alias = "accessToken")]
    pub token: String,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    /// Account email.
    pub email: &'a Email,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    /// Reset token from the email link.
    pub token: &'a str,
    /// New password.
    pub password: &'a str,
}

/// A response that only carries a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// Error body shape used by the API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
