//! Password recovery commands.

use secrecy::SecretString;

use bazaar_core::Email;
use bazaar_storefront::Storefront;

use super::print_notice;

/// Request a reset link for `email`.
pub async fn forgot(state: &Storefront, email: &str) -> bazaar_storefront::Result<()> {
    let email = Email::parse(email)?;
    print_notice(&state.account().request_password_reset(&email).await?);
    Ok(())
}

/// Set a new password using a reset token.
pub async fn reset(
    state: &Storefront,
    token: String,
    password: String,
) -> bazaar_storefront::Result<()> {
    let notice = state
        .account()
        .reset_password(&SecretString::from(token), &SecretString::from(password))
        .await?;
    print_notice(&notice);
    Ok(())
}
