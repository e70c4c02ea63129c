// Smoke test over a real socket
//
// Starts the application with actix-test and talks to it with the awc client.

#[path = "../helpers/mod.rs"]
mod helpers;

use serde_json::Value;
use service_orders_api::middleware::API_KEY_HEADER;

use helpers::*;

#[actix_web::test]
async fn test_health_endpoint_over_http() {
    let ctx = TestContext::new();
    let srv = spawn_test_server(&ctx);

    let mut response = srv.get("/health").send().await.unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new();
    let srv = spawn_test_server(&ctx);

    let response = srv
        .get("/health")
        .insert_header(("x-request-id", "smoke-test-1"))
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("smoke-test-1")
    );
}

#[actix_web::test]
async fn test_cart_flow_over_http() {
    let ctx = TestContext::new();
    let srv = spawn_test_server(&ctx);

    let mut response = srv
        .post(COLLECTION_PATH)
        .insert_header((API_KEY_HEADER, ALICE_KEY))
        .send_json(&TestDataFactory::cart_payload())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let id = result_ids(&body)[0];

    let mut response = srv
        .get(CART_PATH)
        .insert_header((API_KEY_HEADER, ALICE_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], id);

    // hrefs are absolute
    let href = body["href"].as_str().unwrap();
    assert!(href.starts_with("http://"));
    assert!(href.ends_with(&TestDataFactory::resource_path(id)));

    let response = srv.get(CART_PATH).send().await.unwrap();
    assert_eq!(response.status(), 401);
}
