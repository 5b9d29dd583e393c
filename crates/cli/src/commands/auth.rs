//! Sign-in and sign-out commands.

use secrecy::SecretString;

use bazaar_core::Email;
use bazaar_storefront::Storefront;
use bazaar_storefront::config::TokenScope;
use bazaar_storefront::notice::Notice;

use super::print_notice;

/// Sign in and store the returned token in the configured scope.
pub async fn sign_in(
    state: &Storefront,
    email: &str,
    password: String,
) -> bazaar_storefront::Result<()> {
    let email = Email::parse(email)?;
    let password = SecretString::from(password);

    let notice = state.account().sign_in(&email, &password).await?;
    print_notice(&notice);
    if let Some(warning) = scope_warning(state.config().token_scope) {
        print_notice(&warning);
    }
    Ok(())
}

/// Remove the stored token.
pub fn sign_out(state: &Storefront) -> bazaar_storefront::Result<()> {
    print_notice(&state.account().sign_out()?);
    Ok(())
}

/// Session storage ends with the process, so a token stored there is gone
/// as soon as this command exits.
fn scope_warning(scope: TokenScope) -> Option<Notice> {
    match scope {
        TokenScope::Session => Some(Notice::info(
            "Session scope keeps the token only for this command. \
             Set BAZAAR_TOKEN_SCOPE=durable to stay signed in, \
             or pass the token in BAZAAR_TOKEN.",
        )),
        TokenScope::Durable => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_scope_warns() {
        let warning = scope_warning(TokenScope::Session).unwrap();
        assert!(warning.message.contains("BAZAAR_TOKEN_SCOPE=durable"));
        assert!(scope_warning(TokenScope::Durable).is_none());
    }
}
