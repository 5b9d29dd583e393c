//! Admin dashboard.

use bazaar_storefront::Storefront;
use bazaar_storefront::auth::Claims;

use super::TerminalNavigator;

/// Show the dashboard if the stored credential carries the admin role.
///
/// Anyone else is redirected and nothing is rendered. Returns whether the
/// dashboard was shown.
pub fn dashboard(state: &Storefront) -> bool {
    let navigator = TerminalNavigator;
    let gate = state.admin_gate();
    let role = gate.required_role().to_string();

    match gate.guard(&navigator, |claims| render(claims, &role)) {
        Some(page) => {
            print_page(&page);
            true
        }
        None => false,
    }
}

fn render(claims: &Claims, role: &str) -> String {
    let who = claims.subject().unwrap_or("administrator");
    format!("Admin dashboard\nSigned in as {who} ({role})")
}

#[allow(clippy::print_stdout)]
fn print_page(page: &str) {
    println!("{page}");
}
