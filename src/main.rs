//! Pizzeria - pizza ordering storefront backend

use anyhow::Result;
use pizzeria::{api, Config, Storefront};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let prices = config.price_table()?;
    tracing::info!(tax_rate = %prices.tax_rate, prices_file = ?config.prices_file, "price table loaded");
    let app = api::router(Storefront::new(prices));

    let addr = config.bind_addr();
    tracing::info!("🍕 Pizzeria listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
