//! Terminal front end for the catalog client.
//!
//! Reads `CatalogConfig` from the environment (a `.env` file is honored) and
//! renders the products page, adds products to the cart or lists the cart.

use std::error::Error;

use catalog_core::{CatalogClient, CatalogConfig, ProductCard, ProductId, ProductsPage};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog", about = "Browse the product catalog and manage the cart")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the product cards
    Products,
    /// Add a product to the cart
    Add {
        /// Product identifier
        id: i64,
        /// Click the button this many times
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    /// List the cart contents
    Cart,
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CatalogConfig::from_env()?;
    tracing::debug!(api_base = %config.api_base, "configuration loaded");
    let client = CatalogClient::from_config(&config);

    match cli.command {
        Command::Products => {
            let mut page = ProductsPage::new(&client, &config.media_base);
            page.mount();
            let cards = page.cards();
            if cards.is_empty() {
                println!("No products.");
            }
            for card in &cards {
                print_card(card);
            }
        }
        Command::Add { id, times } => {
            let page = ProductsPage::new(&client, &config.media_base);
            for _ in 0..times {
                if let Some(confirmation) = page.add_to_cart(ProductId::new(id)) {
                    println!("{confirmation}");
                }
            }
        }
        Command::Cart => {
            let items = client.list_cart_items();
            if items.is_empty() {
                println!("Cart is empty.");
            }
            for item in &items {
                let details = format_details(&item.details);
                println!("product {:>6}  {details}", item.product_id);
            }
        }
    }

    Ok(())
}

fn print_card(card: &ProductCard) {
    println!("[{}] {}", card.product_id, card.name);
    println!("      {}  {}", card.price, card.image_url);
}

fn format_details(details: &serde_json::Map<String, serde_json::Value>) -> String {
    details
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}
