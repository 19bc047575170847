use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use storefront_api::app::{build_router, services::AppServices};
use storefront_infra::InMemoryStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, but with an explicit in-memory store and an
        // ephemeral port.
        let services = Arc::new(AppServices::new(Arc::new(InMemoryStore::new())));
        let app = build_router(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    price: f64,
) -> String {
    let res = client
        .post(format!("{}/products", base_url))
        .json(&json!({
            "name": name,
            "price": price,
            "sizes": [{ "size": "M", "quantity": 3 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_order(
    client: &reqwest::Client,
    base_url: &str,
    user_id: &str,
    items: serde_json::Value,
) -> String {
    let res = client
        .post(format!("{}/orders", base_url))
        .json(&json!({ "userId": user_id, "items": items }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_listing_omits_sizes_and_wraps_envelope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let id = create_product(&client, &srv.base_url, "Red Shirt", 25.0).await;

    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], id);
    assert_eq!(data[0]["name"], "Red Shirt");
    assert!(data[0].get("sizes").is_none());

    assert_eq!(body["page"]["next"], 10);
    assert_eq!(body["page"]["previous"], 0);
    assert_eq!(body["page"]["limit"], 1);
}

#[tokio::test]
async fn product_name_filter_is_case_insensitive_substring() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_product(&client, &srv.base_url, "Red Shirt", 25.0).await;
    create_product(&client, &srv.base_url, "shirt-style-2", 19.0).await;
    create_product(&client, &srv.base_url, "Pants", 30.0).await;

    let res = client
        .get(format!("{}/products?name=shirt", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Red Shirt", "shirt-style-2"]);
}

#[tokio::test]
async fn product_size_filter_matches_exact_label() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Helper always creates size "M".
    create_product(&client, &srv.base_url, "Tee", 10.0).await;

    let res = client
        .get(format!("{}/products?size=M", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/products?size=XL", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products?limit=0", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_limit");
}

#[tokio::test]
async fn user_orders_are_enriched_with_totals_and_product_details() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let p1 = create_product(&client, &srv.base_url, "Tee", 10.0).await;
    create_order(
        &client,
        &srv.base_url,
        "u1",
        json!([{ "productId": p1, "qty": 2 }]),
    )
    .await;

    let res = client
        .get(format!("{}/orders/u1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["total"], json!(20.0));

    let item = &data[0]["items"][0];
    assert_eq!(item["productId"], p1);
    assert_eq!(item["qty"], 2);
    assert_eq!(item["productDetails"]["id"], p1);
    assert_eq!(item["productDetails"]["price"], json!(10.0));
    // The joined product must not leak its sizes.
    assert!(item["productDetails"].get("sizes").is_none());

    assert_eq!(body["page"]["next"], 10);
    assert_eq!(body["page"]["previous"], 0);
    assert_eq!(body["page"]["limit"], 1);
}

#[tokio::test]
async fn order_referencing_only_unknown_products_is_absent() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_order(
        &client,
        &srv.base_url,
        "u1",
        json!([{ "productId": "p9", "qty": 1 }]),
    )
    .await;

    let res = client
        .get(format!("{}/orders/u1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn partially_matched_order_keeps_only_joined_items() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let p1 = create_product(&client, &srv.base_url, "Tee", 4.0).await;
    create_order(
        &client,
        &srv.base_url,
        "u1",
        json!([
            { "productId": p1, "qty": 1 },
            { "productId": "missing", "qty": 5 },
        ]),
    )
    .await;

    let res = client
        .get(format!("{}/orders/u1", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(data[0]["total"], json!(4.0));
}

#[tokio::test]
async fn unknown_user_yields_empty_page_not_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/orders/nobody", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["page"]["limit"], 0);
}

#[tokio::test]
async fn order_pagination_windows_whole_orders() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let p1 = create_product(&client, &srv.base_url, "Tee", 1.0).await;
    let mut order_ids = Vec::new();
    for _ in 0..3 {
        order_ids.push(
            create_order(
                &client,
                &srv.base_url,
                "u1",
                json!([{ "productId": p1, "qty": 1 }]),
            )
            .await,
        );
    }

    let res = client
        .get(format!("{}/orders/u1?limit=1&offset=1", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], order_ids[1]);
    assert_eq!(body["page"]["next"], 2);
    assert_eq!(body["page"]["previous"], 0);
    assert_eq!(body["page"]["limit"], 1);
}

#[tokio::test]
async fn repeated_reads_over_unchanged_data_are_identical() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let p1 = create_product(&client, &srv.base_url, "Tee", 3.5).await;
    create_order(
        &client,
        &srv.base_url,
        "u1",
        json!([{ "productId": p1, "qty": 2 }, { "productId": p1, "qty": 1 }]),
    )
    .await;

    let url = format!("{}/orders/u1?limit=5&offset=0", srv.base_url);
    let first: serde_json::Value =
        client.get(&url).send().await.unwrap().json().await.unwrap();
    let second: serde_json::Value =
        client.get(&url).send().await.unwrap().json().await.unwrap();

    assert_eq!(first, second);
    // Duplicate references each keep their own row.
    assert_eq!(first["data"][0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(first["data"][0]["total"], json!(10.5));
}

#[tokio::test]
async fn malformed_order_body_is_a_client_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // `items` missing entirely.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "userId": "u1" }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
}
