//! Command implementations and terminal output helpers.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod password;
pub mod products;

use bazaar_storefront::api::Product;
use bazaar_storefront::navigation::{Navigator, Route};
use bazaar_storefront::notice::{Notice, NoticeLevel};

/// Print a notice, errors to stderr.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("{notice}"),
        NoticeLevel::Success => println!("✓ {notice}"),
        NoticeLevel::Error => eprintln!("error: {notice}"),
    }
}

/// One-line product summary.
fn product_line(product: &Product) -> String {
    match &product.edition {
        Some(edition) => format!(
            "{}  {} ({edition})  {}",
            product.id, product.name, product.price
        ),
        None => format!("{}  {}  {}", product.id, product.name, product.price),
    }
}

/// Navigation in a terminal: there is no view to swap, so say where the
/// user would have been sent.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    #[allow(clippy::print_stderr)]
    fn navigate(&self, route: Route) {
        let hint = match route {
            Route::SignIn => "sign in with `bazaar signin`",
            Route::Home => "this view is not available to your account",
        };
        eprintln!("Redirected to {route}: {hint}");
    }
}
