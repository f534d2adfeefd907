//! Client core for the product catalog backend.
//!
//! # Overview
//! Lists products, adds products to the cart and lists cart items against a
//! `<base>/getProduct` / `addToCart` / `getCartItems` backend, plus a products
//! page binding that renders cards and confirms cart additions.
//!
//! # Design
//! - `Transport` performs one request/response cycle through an injectable
//!   `HttpExecutor` (host-does-IO); requests and responses are plain data.
//! - `CatalogClient` operations never fail outward: failures become an empty
//!   `Vec` or `None` and are handed to a `DiagnosticsSink`. `try_*` variants
//!   expose the `TransportError` for callers that want it.
//! - The bearer token is read from a `CredentialProvider` on every request;
//!   the client never stores or refreshes it.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod page;
pub mod transport;
pub mod types;

pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use credentials::{
    CredentialProvider, JsonFileStore, KeyValueStore, MemoryStore, NoCredentials, StaticToken,
    StoredToken, TOKEN_KEY,
};
pub use diagnostics::{Diagnostic, DiagnosticsSink, RecordingDiagnostics, TracingDiagnostics};
pub use error::{ConfigError, FailureKind, TransportError};
pub use http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};
pub use page::{Confirmation, PageState, ProductCard, ProductsPage};
pub use transport::{Auth, Transport};
pub use types::{CartAck, CartItem, Product, ProductId};
