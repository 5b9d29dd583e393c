//! Catalogue commands.

use bazaar_core::ProductId;
use bazaar_storefront::Storefront;
use bazaar_storefront::api::Product;

use super::product_line;

/// Show one product in full.
#[allow(clippy::print_stdout)]
pub async fn show(state: &Storefront, id: String) -> bazaar_storefront::Result<()> {
    let product = state.api().get_product(&ProductId::new(id)).await?;

    println!("{}", product_line(&product));
    if let Some(sku) = &product.sku {
        println!("SKU: {sku}");
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    Ok(())
}

/// List products related to `id`.
pub async fn related(state: &Storefront, id: String) -> bazaar_storefront::Result<()> {
    let products = state.api().related_products(&ProductId::new(id)).await?;
    print_list(&products);
    Ok(())
}

/// List recommended products.
pub async fn recommended(state: &Storefront) -> bazaar_storefront::Result<()> {
    let products = state.api().recommendations().await?;
    print_list(&products);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_list(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
    }
    for product in products {
        println!("{}", product_line(product));
    }
}
