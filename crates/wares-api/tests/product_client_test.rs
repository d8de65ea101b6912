// Integration tests for `ProductClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wares_api::{Error, ListQuery, NewProduct, Product, ProductClient, ProductUpdate};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ProductClient) {
    let server = MockServer::start().await;
    let client = ProductClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn sample_product(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Wireless Mouse",
        "description": "2.4 GHz optical mouse",
        "price": 24.99,
        "category": "mobile-accessories",
        "stock": 42
    })
}

// ── Listing routing ─────────────────────────────────────────────────

#[tokio::test]
async fn test_plain_listing_sends_limit_and_skip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "20"))
        .and(query_param_is_missing("q"))
        .and(query_param_is_missing("delay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [sample_product(1), sample_product(2)],
            "total": 25
        })))
        .mount(&server)
        .await;

    let page = client
        .list_products(&ListQuery {
            skip: 20,
            ..ListQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.products.len(), 2);
    assert_eq!(page.products[0].title, "Wireless Mouse");
}

#[tokio::test]
async fn test_search_routes_to_search_endpoint_and_wins_over_category() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [sample_product(7)],
            "total": 1
        })))
        .mount(&server)
        .await;

    // Category is set too, but search takes priority in the routing.
    let page = client
        .list_products(&ListQuery {
            search: Some("phone".into()),
            category: Some("laptops".into()),
            ..ListQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.products[0].id, 7);
}

#[tokio::test]
async fn test_blank_search_falls_back_to_plain_listing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [],
            "total": 0
        })))
        .mount(&server)
        .await;

    let page = client
        .list_products(&ListQuery {
            search: Some("   ".into()),
            ..ListQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_category_listing_routes_to_category_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/category/laptops"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [sample_product(3)],
            "total": 1
        })))
        .mount(&server)
        .await;

    let page = client
        .list_products(&ListQuery {
            category: Some("laptops".into()),
            ..ListQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.products[0].id, 3);
}

#[tokio::test]
async fn test_category_all_sentinel_means_unfiltered() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [],
            "total": 0
        })))
        .mount(&server)
        .await;

    client
        .list_products(&ListQuery {
            category: Some(wares_api::CATEGORY_ALL.into()),
            ..ListQuery::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delay_hint_is_appended_when_positive() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("delay", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [],
            "total": 0
        })))
        .mount(&server)
        .await;

    client
        .list_products(&ListQuery {
            delay: Some(1000),
            ..ListQuery::default()
        })
        .await
        .unwrap();
}

// ── Categories ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_categories() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["beauty", "laptops", "tablets"])),
        )
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();

    assert_eq!(categories, vec!["beauty", "laptops", "tablets"]);
}

#[tokio::test]
async fn test_list_categories_non_array_payload_degrades_to_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "categories": ["beauty"] })),
        )
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();

    assert!(categories.is_empty());
}

#[tokio::test]
async fn test_list_categories_filters_non_string_and_blank_entries() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["beauty", 42, "", "  ", null, " tablets "])),
        )
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();

    assert_eq!(categories, vec!["beauty", "tablets"]);
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_product() {
    let (server, client) = setup().await;

    let draft = NewProduct {
        title: "Desk Lamp".into(),
        description: "Adjustable LED lamp".into(),
        price: 19.5,
        category: "home-decoration".into(),
        stock: 8,
    };

    Mock::given(method("POST"))
        .and(path("/products/add"))
        .and(body_json(&draft))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 101,
            "title": "Desk Lamp",
            "description": "Adjustable LED lamp",
            "price": 19.5,
            "category": "home-decoration",
            "stock": 8
        })))
        .mount(&server)
        .await;

    let created: Product = client.create_product(&draft).await.unwrap();

    assert_eq!(created.id, 101);
    assert_eq!(created.title, "Desk Lamp");
}

#[tokio::test]
async fn test_update_product_puts_id_in_path_and_body() {
    let (server, client) = setup().await;

    let update = ProductUpdate {
        id: 7,
        title: "Wireless Mouse v2".into(),
        description: "2.4 GHz optical mouse".into(),
        price: 29.99,
        category: "mobile-accessories".into(),
        stock: 40,
    };

    Mock::given(method("PUT"))
        .and(path("/products/7"))
        .and(body_json(&update))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Wireless Mouse v2",
            "description": "2.4 GHz optical mouse",
            "price": 29.99,
            "category": "mobile-accessories",
            "stock": 40
        })))
        .mount(&server)
        .await;

    let updated = client.update_product(&update).await.unwrap();

    assert_eq!(updated.price, 29.99);
}

#[tokio::test]
async fn test_delete_product_returns_deleted_record() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_product(7)))
        .mount(&server)
        .await;

    let deleted = client.delete_product(7).await.unwrap();

    assert_eq!(deleted.id, 7);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_404_with_message_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "message": "Product with id '999' not found" })),
        )
        .mount(&server)
        .await;

    let result = client.delete_product(999).await;

    match result {
        Err(Error::Service {
            status,
            ref message,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Product with id '999' not found");
        }
        other => panic!("expected Service error, got: {other:?}"),
    }
    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_error_500_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.list_products(&ListQuery::default()).await;

    match result {
        Err(ref err @ Error::Service { status, .. }) => {
            assert_eq!(status, 500);
            assert!(err.is_transient());
        }
        other => panic!("expected Service 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_product_list_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "a", "page"])))
        .mount(&server)
        .await;

    let result = client.list_products(&ListQuery::default()).await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization, got: {result:?}"
    );
}
