//! Cart commands.
//!
//! `list` and `remove` work on the cart kept in durable storage; `add` goes
//! to the API with the stored credential.

use bazaar_core::{ProductId, Sku};
use bazaar_storefront::Storefront;

use super::print_notice;

/// Print the local cart.
#[allow(clippy::print_stdout)]
pub fn list(state: &Storefront) {
    let cart = state.cart_store().load();
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in &cart {
        if item.edition.is_empty() {
            println!("{}  {}  {}", item.sku, item.name, item.price);
        } else {
            println!(
                "{}  {} ({})  {}",
                item.sku, item.name, item.edition, item.price
            );
        }
    }
    println!("{} item(s)", cart.len());
}

/// Remove every line with `sku` from the local cart.
#[allow(clippy::print_stdout)]
pub fn remove(state: &Storefront, sku: String) -> bazaar_storefront::Result<()> {
    let cart = state.cart_store().remove(&Sku::new(sku))?;
    println!("{} item(s) left in your cart", cart.len());
    Ok(())
}

/// Add one unit of a product to the account's cart.
#[allow(clippy::print_stdout)]
pub async fn add(state: &Storefront, product_id: String) -> bazaar_storefront::Result<()> {
    let service = state.cart_service();
    let outcome = service.add_to_cart(&ProductId::new(product_id)).await?;

    print_notice(&outcome.notice());
    println!("Cart: {}", service.counter().count());
    Ok(())
}
