use aurum_api::{ApiClient, ApiConfig, ApiError, BackoffStrategy, CartLine, RetryPolicy};
use aurum_auth::{AuthToken, Credentials};
use aurum_commerce::checkout::OrderStatus;
use aurum_commerce::customer::Role;
use aurum_commerce::prelude::*;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(server.url("/api"))
        .with_retry(RetryPolicy::new(2).with_backoff(BackoffStrategy::None));
    ApiClient::new(config).unwrap()
}

fn product_json(id: i64, name: &str, price: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "Joya de prueba",
        "price": price,
        "stock": 4,
        "category_id": 1
    })
}

#[tokio::test]
async fn test_list_products() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([product_json(1, "Anillo Luna", 45990), product_json(2, "Aros Sol", 19990)]));
        })
        .await;

    let products = client_for(&server).products().list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Anillo Luna");
    assert_eq!(products[1].price, Money::clp(19990));
}

#[tokio::test]
async fn test_data_envelope_is_unwrapped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/categories");
            then.status(200).json_body(json!({
                "data": [{"id": 1, "name": "Anillos"}, {"id": 2, "name": "Collares"}]
            }));
        })
        .await;

    let categories = client_for(&server).categories().list().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "Collares");
}

#[tokio::test]
async fn test_error_status_uses_action_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/products");
            then.status(422).body("precio inválido");
        })
        .await;

    let draft = ProductDraft {
        name: "Collar".to_string(),
        ..Default::default()
    };
    let err = client_for(&server).products().create(&draft).await.unwrap_err();

    assert_eq!(err.to_string(), "Error al crear el producto (HTTP 422)");
    match err {
        ApiError::Status { status, detail, .. } => {
            assert_eq!(status, 422);
            assert_eq!(detail.as_deref(), Some("precio inválido"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_and_unauthorized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products/99");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(401);
        })
        .await;

    let client = client_for(&server);
    let missing = client.products().get(&ProductId::new("99")).await.unwrap_err();
    assert!(missing.is_not_found());

    let anonymous = client.auth().me().await.unwrap_err();
    assert!(anonymous.is_unauthorized());
}

#[tokio::test]
async fn test_get_retries_server_errors() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/collections");
            then.status(503);
        })
        .await;

    let err = client_for(&server).collections().list().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(mock.hits_async().await, 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/customers");
            then.status(403);
        })
        .await;

    let err = client_for(&server).customers().list().await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_writes_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/contacts");
            then.status(500);
        })
        .await;

    let form = ContactForm {
        name: "Ana".to_string(),
        email: "ana@correo.cl".to_string(),
        subject: "Consulta".to_string(),
        message: "¿Tienen este anillo en talla 12?".to_string(),
    };
    let err = client_for(&server).contacts().create(&form).await.unwrap_err();

    assert!(err.is_unavailable());
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/auth/me")
                .header("Authorization", "Bearer tok-123");
            then.status(200).json_body(json!({
                "id": 5,
                "name": "Ana",
                "email": "ana@correo.cl",
                "role": "admin"
            }));
        })
        .await;

    let client = client_for(&server);
    client.set_token(Some(AuthToken::new("tok-123").unwrap()));
    let me = client.auth().me().await.unwrap();

    mock.assert_async().await;
    assert_eq!(me.role, Role::Admin);
}

#[tokio::test]
async fn test_login_posts_credentials() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({"email": "ana@correo.cl", "password": "secreto"}));
            then.status(200).json_body(json!({
                "token": "abc",
                "user": {"id": 5, "name": "Ana", "email": "ana@correo.cl"}
            }));
        })
        .await;

    let response = client_for(&server)
        .auth()
        .login(&Credentials::new(" Ana@Correo.cl ", "secreto"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.token, "abc");
    assert_eq!(response.customer.id, CustomerId::new("5"));
}

#[tokio::test]
async fn test_cart_endpoints() {
    let server = MockServer::start_async().await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/carts/5");
            then.status(200).json_body(json!({
                "items": [
                    {"product_id": 1, "name": "Anillo Luna", "quantity": 2, "price": 45990},
                    {"product_id": 1, "name": "Anillo Luna", "quantity": 1, "price": 45990}
                ]
            }));
        })
        .await;
    let add = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/carts/5/items")
                .json_body(json!({"product_id": "2", "quantity": 3}));
            then.status(201).json_body(json!({"ok": true}));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/carts/5/items/2")
                .json_body(json!({"quantity": 1}));
            then.status(204);
        })
        .await;
    let remove = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/carts/5/items/2");
            then.status(204);
        })
        .await;
    let clear = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/carts/5");
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    let customer = CustomerId::new("5");
    let product = ProductId::new("2");

    let cart = client.carts().get(&customer).await.unwrap();
    assert_eq!(cart.unique_item_count(), 1);
    assert_eq!(cart.item_count(), 3);

    let line = CartLine {
        product_id: product.clone(),
        quantity: 3,
    };
    client.carts().add_item(&customer, &line).await.unwrap();
    client.carts().update_item(&customer, &product, 1).await.unwrap();
    client.carts().remove_item(&customer, &product).await.unwrap();
    client.carts().clear(&customer).await.unwrap();

    get.assert_async().await;
    add.assert_async().await;
    update.assert_async().await;
    remove.assert_async().await;
    clear.assert_async().await;
}

#[tokio::test]
async fn test_update_order_status() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/orders/10")
                .json_body(json!({"status": "shipped"}));
            then.status(200).json_body(json!({
                "id": 10,
                "status": "shipped",
                "items": [],
                "total": 0
            }));
        })
        .await;

    let order = client_for(&server)
        .orders()
        .update_status(&OrderId::new("10"), OrderStatus::Shipped)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(order.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_mark_contact_read() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/contacts/3")
                .json_body(json!({"read": true}));
            then.status(200).json_body(json!({
                "id": 3,
                "name": "Ana",
                "email": "ana@correo.cl",
                "subject": "Consulta",
                "message": "Hola, quería consultar",
                "read": true
            }));
        })
        .await;

    let message = client_for(&server)
        .contacts()
        .mark_read(&ContactId::new("3"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(message.read);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ApiConfig::new("http://127.0.0.1:9/api").with_retry(RetryPolicy::none());
    let client = ApiClient::new(config).unwrap();
    let err = client.products().list().await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(err.to_string().contains("obtener productos"));
}
