use std::path::Path;

use anyhow::Context;
use gemcart_core::AppConfig;
use gemcart_storefront::StorefrontClient;

pub(crate) async fn run_fetch_collection(
    config: &AppConfig,
    handle: &str,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let client = StorefrontClient::new(config).context("failed to build storefront client")?;
    let products = client
        .collection_products(handle, config.collection_page_size)
        .await
        .with_context(|| format!("failed to fetch collection {handle}"))?;
    tracing::info!(handle, count = products.len(), "collection fetched");

    let body = serde_json::to_string_pretty(&products)?;
    match out {
        Some(path) => std::fs::write(path, body)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{body}"),
    }
    Ok(())
}

pub(crate) async fn run_show_cart(config: &AppConfig, cart_id: &str) -> anyhow::Result<()> {
    let client = StorefrontClient::new(config).context("failed to build storefront client")?;
    let Some(response) = client
        .get_cart(cart_id)
        .await
        .with_context(|| format!("failed to fetch cart {cart_id}"))?
    else {
        anyhow::bail!("cart {cart_id} not found or expired");
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
