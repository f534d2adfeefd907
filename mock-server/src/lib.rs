use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

/// Token accepted by the seeded backend.
pub const DEMO_TOKEN: &str = "demo-token";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub price: f64,
    pub image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartItem {
    pub cart_item_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartAck {
    pub success: bool,
    pub message: String,
    pub product_id: i64,
}

/// In-memory backend: a fixed product list and one cart per token.
#[derive(Debug)]
pub struct Backend {
    products: Vec<Product>,
    tokens: Vec<String>,
    carts: RwLock<HashMap<String, Vec<CartItem>>>,
    add_requests: AtomicUsize,
    fail_products: AtomicBool,
    null_ack: AtomicBool,
}

pub type Db = Arc<Backend>;

impl Backend {
    pub fn new(products: Vec<Product>, tokens: &[&str]) -> Self {
        Self {
            products,
            tokens: tokens.iter().map(|t| (*t).to_string()).collect(),
            carts: RwLock::new(HashMap::new()),
            add_requests: AtomicUsize::new(0),
            fail_products: AtomicBool::new(false),
            null_ack: AtomicBool::new(false),
        }
    }

    /// Three products accepting `DEMO_TOKEN`.
    pub fn seeded() -> Self {
        Self::new(seed_products(), &[DEMO_TOKEN])
    }

    /// Number of `addToCart` requests received, accepted or not.
    pub fn add_requests(&self) -> usize {
        self.add_requests.load(Ordering::SeqCst)
    }

    /// Make `getProduct` answer 500.
    pub fn set_fail_products(&self, fail: bool) {
        self.fail_products.store(fail, Ordering::SeqCst);
    }

    /// Make `addToCart` acknowledge with `null`.
    pub fn set_null_ack(&self, null_ack: bool) {
        self.null_ack.store(null_ack, Ordering::SeqCst);
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| self.tokens.iter().any(|known| known == token))
            .map(str::to_string)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            product_id: 1,
            product_name: "Wireless Mouse With A Really Long Descriptive Name That Exceeds Forty Characters"
                .to_string(),
            price: 19.99,
            image_url: "img/1.png".to_string(),
        },
        Product {
            product_id: 2,
            product_name: "Mechanical Keyboard".to_string(),
            price: 89.5,
            image_url: "img/2.png".to_string(),
        },
        Product {
            product_id: 42,
            product_name: "USB-C Hub".to_string(),
            price: 35.0,
            image_url: "img/42.png".to_string(),
        },
    ]
}

pub fn app() -> Router {
    app_with(Arc::new(Backend::seeded()))
}

pub fn app_with(db: Db) -> Router {
    let home = Router::new()
        .route("/getProduct", get(list_products))
        .route("/addToCart/{id}", post(add_to_cart))
        .route("/getCartItems", get(list_cart_items));
    Router::new().nest("/api/Home", home).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

async fn list_products(State(db): State<Db>) -> Result<Json<Vec<Product>>, StatusCode> {
    if db.fail_products.load(Ordering::SeqCst) {
        tracing::warn!("getProduct forced to fail");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(db.products.clone()))
}

async fn add_to_cart(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    db.add_requests.fetch_add(1, Ordering::SeqCst);
    let token = db.authorize(&headers)?;
    let product = db
        .products
        .iter()
        .find(|p| p.product_id == id)
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut carts = db.carts.write().await;
    let cart = carts.entry(token).or_default();
    match cart.iter().position(|line| line.product_id == id) {
        Some(index) => cart[index].quantity += 1,
        None => {
            let cart_item_id = cart.len() as i64 + 1;
            cart.push(CartItem {
                cart_item_id,
                product_id: id,
                product_name: product.product_name.clone(),
                price: product.price,
                quantity: 1,
            });
        }
    }
    tracing::info!(product_id = id, "added to cart");

    if db.null_ack.load(Ordering::SeqCst) {
        return Ok(Json(Value::Null));
    }
    let ack = CartAck {
        success: true,
        message: "Product added to cart".to_string(),
        product_id: id,
    };
    serde_json::to_value(ack)
        .map(Json)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn list_cart_items(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<CartItem>>, StatusCode> {
    let token = db.authorize(&headers)?;
    let carts = db.carts.read().await;
    Ok(Json(carts.get(&token).cloned().unwrap_or_default()))
}
