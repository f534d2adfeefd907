//! Typed operations against the catalog backend.
//!
//! # Design
//! Each operation comes in three forms:
//! - `build_*` produces the `HttpRequest` without touching the network, for
//!   hosts that run their own I/O and feed the response to
//!   [`transport::parse`](crate::transport::parse);
//! - `try_*` executes it and returns the failure class on error;
//! - the plain form never fails: it returns an empty `Vec` or `None` and
//!   reports the failure to the diagnostics sink.
//!
//! Nothing is cached and nothing is deduplicated. Every call is one request.

use serde_json::{json, Value};

use crate::config::CatalogConfig;
use crate::credentials::{JsonFileStore, StoredToken};
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, UreqExecutor};
use crate::transport::{Auth, Transport};
use crate::types::{CartAck, CartItem, Product, ProductId};

const LIST_PRODUCTS: &str = "list_products";
const ADD_TO_CART: &str = "add_to_cart";
const LIST_CART_ITEMS: &str = "list_cart_items";

/// Client for the `<base>/getProduct`, `addToCart` and `getCartItems` endpoints.
pub struct CatalogClient {
    transport: Transport,
}

impl CatalogClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Client wired for production use: `ureq` with the configured timeout,
    /// the token read from the configured file store, `tracing` diagnostics.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let mut transport = Transport::new(config.api_base.as_str())
            .with_executor(UreqExecutor::with_timeout(config.timeout));
        if let Some(path) = &config.token_file {
            transport = transport.with_credentials(StoredToken::new(JsonFileStore::new(path)));
        }
        Self::new(transport)
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn build_list_products(&self) -> HttpRequest {
        self.transport.build(HttpMethod::Get, "getProduct", None, Auth::None)
    }

    pub fn build_add_to_cart(&self, product_id: ProductId) -> HttpRequest {
        self.transport.build(
            HttpMethod::Post,
            &format!("addToCart/{product_id}"),
            Some(&json!({})),
            Auth::Bearer,
        )
    }

    pub fn build_list_cart_items(&self) -> HttpRequest {
        self.transport.build(HttpMethod::Get, "getCartItems", None, Auth::Bearer)
    }

    pub fn try_list_products(&self) -> Result<Vec<Product>, TransportError> {
        self.transport.send(&self.build_list_products())
    }

    /// `Ok(None)` means the backend acknowledged with `null`.
    pub fn try_add_to_cart(&self, product_id: ProductId) -> Result<Option<CartAck>, TransportError> {
        self.transport.send(&self.build_add_to_cart(product_id))
    }

    pub fn try_list_cart_items(&self) -> Result<Vec<CartItem>, TransportError> {
        self.transport.send(&self.build_list_cart_items())
    }

    /// Products in backend order; empty on any failure.
    pub fn list_products(&self) -> Vec<Product> {
        self.transport
            .fetch_list(LIST_PRODUCTS, &self.build_list_products())
    }

    /// Backend acknowledgment; `None` on failure or a `null` acknowledgment.
    pub fn add_to_cart(&self, product_id: ProductId) -> Option<CartAck> {
        self.transport
            .fetch_one::<Value>(ADD_TO_CART, &self.build_add_to_cart(product_id))
            .map(CartAck::new)
    }

    /// Cart lines in backend order; empty on any failure.
    pub fn list_cart_items(&self) -> Vec<CartItem> {
        self.transport
            .fetch_list(LIST_CART_ITEMS, &self.build_list_cart_items())
    }
}
