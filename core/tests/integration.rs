//! Catalog client against the live mock server.
//!
//! # Design
//! Starts the mock backend on a random port, then drives every client
//! operation and the products page over real HTTP with the default `ureq`
//! executor. Failure paths use a backend switch or a closed port.

use std::sync::Arc;

use catalog_core::{
    CatalogClient, FailureKind, MemoryStore, PageState, ProductId, ProductsPage,
    RecordingDiagnostics, StoredToken, Transport, TransportError, TOKEN_KEY,
};
use mock_server::{Backend, DEMO_TOKEN};

struct Harness {
    backend: Arc<Backend>,
    store: Arc<MemoryStore>,
    diagnostics: Arc<RecordingDiagnostics>,
    client: CatalogClient,
    origin: String,
}

/// Start the mock server on a random port and build a client pointed at it.
fn start() -> Harness {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let backend = Arc::new(Backend::seeded());
    let served = Arc::clone(&backend);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, served).await
        })
        .unwrap();
    });

    let origin = format!("http://{addr}");
    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, DEMO_TOKEN);
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let client = CatalogClient::new(
        Transport::new(&format!("{origin}/api/Home"))
            .with_credentials(StoredToken::new(Arc::clone(&store)))
            .with_diagnostics(Arc::clone(&diagnostics)),
    );

    Harness {
        backend,
        store,
        diagnostics,
        client,
        origin,
    }
}

#[test]
fn list_products_matches_backend_payload() {
    let h = start();

    let products = h.client.list_products();
    let expected = mock_server::seed_products();
    assert_eq!(products.len(), expected.len());
    for (got, want) in products.iter().zip(&expected) {
        assert_eq!(got.product_id.as_i64(), want.product_id);
        assert_eq!(got.product_name, want.product_name);
        assert_eq!(got.price.to_string(), want.price.to_string());
        assert_eq!(got.image_url, want.image_url);
    }
    assert!(h.diagnostics.is_empty());
}

#[test]
fn cart_lifecycle() {
    let h = start();

    // Step 1: cart starts empty.
    assert!(h.client.list_cart_items().is_empty());

    // Step 2: add the same product twice; both requests reach the backend.
    let first = h.client.add_to_cart(ProductId::new(42)).expect("ack");
    assert!(first.is_truthy());
    assert_eq!(first.as_value()["ProductId"], 42);
    assert!(h.client.add_to_cart(ProductId::new(42)).is_some());
    assert_eq!(h.backend.add_requests(), 2);

    // Step 3: the cart reflects both additions.
    let items = h.client.list_cart_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, ProductId::new(42));
    assert_eq!(items[0].details["Quantity"], 2);

    assert!(h.diagnostics.is_empty());
}

#[test]
fn server_error_yields_empty_list_and_diagnostic() {
    let h = start();
    h.backend.set_fail_products(true);

    assert!(h.client.list_products().is_empty());

    let records = h.diagnostics.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].operation, "list_products");
    assert_eq!(records[0].kind, FailureKind::Http { status: 500 });
    assert!(records[0].url.ends_with("/api/Home/getProduct"));

    let err = h.client.try_list_products().unwrap_err();
    assert!(matches!(err, TransportError::Http { status: 500, .. }));
}

#[test]
fn missing_or_wrong_token_is_silent_no_op() {
    let h = start();

    h.store.remove(TOKEN_KEY);
    assert!(h.client.add_to_cart(ProductId::new(1)).is_none());
    assert!(h.client.list_cart_items().is_empty());

    h.store.set(TOKEN_KEY, "expired");
    assert!(h.client.add_to_cart(ProductId::new(1)).is_none());

    let kinds: Vec<FailureKind> = h.diagnostics.records().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![FailureKind::Http { status: 401 }; 3]);
    assert_eq!(h.backend.add_requests(), 2);

    // Token restored: the next call uses it.
    h.store.set(TOKEN_KEY, DEMO_TOKEN);
    assert!(h.client.add_to_cart(ProductId::new(1)).is_some());
}

#[test]
fn null_ack_is_absent_without_diagnostic() {
    let h = start();
    h.backend.set_null_ack(true);

    assert!(h.client.add_to_cart(ProductId::new(2)).is_none());
    assert!(matches!(h.client.try_add_to_cart(ProductId::new(2)), Ok(None)));
    assert!(h.diagnostics.is_empty());
}

#[test]
fn unreachable_backend_yields_sentinels() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let client = CatalogClient::new(
        Transport::new(&format!("http://{addr}/api/Home")).with_diagnostics(Arc::clone(&diagnostics)),
    );

    assert!(client.list_products().is_empty());
    assert!(client.add_to_cart(ProductId::new(1)).is_none());
    assert!(client.list_cart_items().is_empty());

    let records = diagnostics.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|d| d.kind == FailureKind::Network));
    let ops: Vec<&str> = records.iter().map(|d| d.operation).collect();
    assert_eq!(ops, vec!["list_products", "add_to_cart", "list_cart_items"]);
}

#[test]
fn products_page_renders_cards() {
    let h = start();
    let mut page = ProductsPage::new(&h.client, &h.origin);
    assert_eq!(page.state(), &PageState::Initial);
    assert!(page.cards().is_empty());

    page.mount();
    let cards = page.cards();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0].name, "Wireless Mouse With A Really Long Descri...");
    assert!(cards[0].name.ends_with("..."));
    assert_eq!(cards[0].price, "$19.99");
    assert_eq!(cards[0].image_url, format!("{}/img/1.png", h.origin));
    assert_eq!(cards[1].name, "Mechanical Keyboard");
    assert_eq!(cards[1].price, "$89.5");
    assert_eq!(cards[2].price, "$35");
}

#[test]
fn products_page_mounts_once() {
    let h = start();
    let mut page = ProductsPage::new(&h.client, &h.origin);

    page.mount();
    assert_eq!(page.products().len(), 3);

    // A second mount must not refetch: a failing backend would empty the list.
    h.backend.set_fail_products(true);
    page.mount();
    assert_eq!(page.products().len(), 3);
    assert!(h.diagnostics.is_empty());
}

#[test]
fn products_page_failed_load_renders_nothing() {
    let h = start();
    h.backend.set_fail_products(true);
    let mut page = ProductsPage::new(&h.client, &h.origin);

    page.mount();
    assert_eq!(page.state(), &PageState::Loaded(Vec::new()));
    assert!(page.cards().is_empty());
    assert_eq!(h.diagnostics.len(), 1);
}

#[test]
fn products_page_confirms_once_per_click() {
    let h = start();
    let mut page = ProductsPage::new(&h.client, &h.origin);
    page.mount();

    let first = page.add_to_cart(ProductId::new(42));
    assert_eq!(first.map(|c| c.to_string()).as_deref(), Some("Product added to cart!"));
    let second = page.add_to_cart(ProductId::new(42));
    assert!(second.is_some());
    assert_eq!(h.backend.add_requests(), 2);

    // Failure: no confirmation, nothing surfaced.
    h.store.remove(TOKEN_KEY);
    assert!(page.add_to_cart(ProductId::new(42)).is_none());
    assert_eq!(h.backend.add_requests(), 3);

    // Unmounted: the request still goes out but the result is dropped.
    h.store.set(TOKEN_KEY, DEMO_TOKEN);
    page.unmount();
    assert!(page.add_to_cart(ProductId::new(42)).is_none());
    assert_eq!(h.backend.add_requests(), 4);
    assert!(page.cards().is_empty());
}
