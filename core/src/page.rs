//! Products page binding: load once, render cards, add to cart.
//!
//! # Design
//! `ProductsPage` is a small state machine over a borrowed `CatalogClient`.
//! It never edits products itself; the displayed list is whatever the last
//! fetch returned, replaced wholesale. Add-to-cart is fire-and-confirm: each
//! call issues one request and yields at most one `Confirmation`, so a caller
//! that shows every confirmation it receives shows it exactly once per click.

use std::borrow::Cow;
use std::fmt;

use rust_decimal::Decimal;

use crate::client::CatalogClient;
use crate::types::{Product, ProductId};

/// Names longer than this many characters are truncated for display.
pub const NAME_DISPLAY_LIMIT: usize = 40;
pub const ELLIPSIS: &str = "...";
pub const ADDED_TO_CART: &str = "Product added to cart!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// Created, not yet mounted.
    Initial,
    /// Products from the mount-time fetch (possibly empty).
    Loaded(Vec<Product>),
    /// Removed from display; late results are discarded.
    Unmounted,
}

/// One-shot notice that a product made it into the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub product_id: ProductId,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ADDED_TO_CART)
    }
}

/// Display-ready view of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub product_id: ProductId,
    /// Truncated name for the card body.
    pub name: String,
    /// Full name, used as image alt text.
    pub alt: String,
    pub price: String,
    pub image_url: String,
}

impl ProductCard {
    pub fn new(product: &Product, media_base: &str) -> Self {
        Self {
            product_id: product.product_id,
            name: truncate_name(&product.product_name).into_owned(),
            alt: product.product_name.clone(),
            price: format_price(product.price),
            image_url: resolve_image(media_base, &product.image_url),
        }
    }
}

pub struct ProductsPage<'a> {
    client: &'a CatalogClient,
    media_base: String,
    state: PageState,
}

impl<'a> ProductsPage<'a> {
    pub fn new(client: &'a CatalogClient, media_base: &str) -> Self {
        Self {
            client,
            media_base: media_base.trim_end_matches('/').to_string(),
            state: PageState::Initial,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Fetch the product list. Only the first call from `Initial` fetches;
    /// later calls and calls after `unmount` do nothing.
    pub fn mount(&mut self) {
        if self.state != PageState::Initial {
            return;
        }
        let products = self.client.list_products();
        tracing::debug!(count = products.len(), "products page loaded");
        self.state = PageState::Loaded(products);
    }

    pub fn unmount(&mut self) {
        self.state = PageState::Unmounted;
    }

    pub fn products(&self) -> &[Product] {
        match &self.state {
            PageState::Loaded(products) => products,
            PageState::Initial | PageState::Unmounted => &[],
        }
    }

    pub fn cards(&self) -> Vec<ProductCard> {
        self.products()
            .iter()
            .map(|product| ProductCard::new(product, &self.media_base))
            .collect()
    }

    /// Add `product_id` to the cart.
    ///
    /// Returns a confirmation only for a truthy acknowledgment while the page
    /// is still mounted. Failures yield `None` and nothing else; repeated
    /// calls are not deduplicated.
    pub fn add_to_cart(&self, product_id: ProductId) -> Option<Confirmation> {
        let ack = self.client.add_to_cart(product_id)?;
        if !ack.is_truthy() || self.state == PageState::Unmounted {
            return None;
        }
        Some(Confirmation { product_id })
    }
}

/// Cut `name` to [`NAME_DISPLAY_LIMIT`] characters plus [`ELLIPSIS`] when it
/// is longer than the limit.
pub fn truncate_name(name: &str) -> Cow<'_, str> {
    match name.char_indices().nth(NAME_DISPLAY_LIMIT) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &name[..cut])),
        None => Cow::Borrowed(name),
    }
}

/// `$` followed by the price exactly as received.
pub fn format_price(price: Decimal) -> String {
    format!("${price}")
}

pub fn resolve_image(media_base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        media_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
