// Integration tests for the service order lifecycle
//
// Runs the full routing (API key middleware, controllers, service rules)
// against the in-memory stores.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use serde_json::{json, Value};
use service_orders_api::modules::service_orders::{ServiceOrderRepository, ServiceOrderState};

use helpers::*;

#[actix_web::test]
async fn test_create_without_state_is_a_cart() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let req = api_post(COLLECTION_PATH, ALICE_KEY, &TestDataFactory::cart_payload()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let created = &results(&body)[0];
    assert_eq!(created["state"], "cart");
    assert_eq!(created["name"], "shopping cart");
    assert_eq!(created["user_id"], ALICE_ID);
    assert!(created["placed_at"].is_null());
}

#[actix_web::test]
async fn test_create_ordered_is_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let payload = TestDataFactory::service_order_payload("service order", "ordered");
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_error(&body, "bad_request", "can't create an ordered service order");
    assert_eq!(ctx.repository.count_all().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_second_cart_is_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let payload = TestDataFactory::cart_payload();
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_error(&body, "bad_request", "a shopping cart already exists");
    assert_eq!(ctx.repository.count_all().await.unwrap(), 1);
}

#[actix_web::test]
async fn test_cart_alias_resolves_current_cart() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let wish = ctx
        .repository
        .create(ALICE_ID, "wish list", ServiceOrderState::Wish)
        .await
        .unwrap();
    let cart = ctx
        .repository
        .create(ALICE_ID, "shopping cart", ServiceOrderState::Cart)
        .await
        .unwrap();

    let resp = test::call_service(&app, api_get(CART_PATH, ALICE_KEY).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], cart.id);
    assert_ne!(body["id"], wish.id);
    assert!(body["href"]
        .as_str()
        .unwrap()
        .ends_with(&TestDataFactory::resource_path(cart.id)));
}

#[actix_web::test]
async fn test_cart_alias_without_cart_is_not_found() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    ctx.repository
        .create(ALICE_ID, "wish list", ServiceOrderState::Wish)
        .await
        .unwrap();

    let resp = test::call_service(&app, api_get(CART_PATH, ALICE_KEY).to_request()).await;
    assert_status(&resp, StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_error(&body, "not_found", "Couldn't find ServiceOrder");
}

#[actix_web::test]
async fn test_empty_list_is_a_success() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let resp = test::call_service(&app, api_get(COLLECTION_PATH, ALICE_KEY).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["subcount"], 0);
    assert_eq!(body["resources"], json!([]));
}

#[actix_web::test]
async fn test_batch_create_returns_every_record() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let payload = TestDataFactory::create_wishes_payload(&["wish 1", "wish 2"]);
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let names: Vec<_> = results(&body)
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["wish 1", "wish 2"]);
    assert_eq!(ctx.repository.count_all().await.unwrap(), 2);
}

#[actix_web::test]
async fn test_batch_create_reports_invalid_items_inline() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let payload = json!({
        "action": "create",
        "resources": [
            {"name": "wish", "state": "wish"},
            {"name": "placed", "state": "ordered"}
        ]
    });
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let entries = results(&body);
    assert_eq!(entries[0]["state"], "wish");
    assert_eq!(entries[1]["success"], false);
    assert!(entries[1]["message"]
        .as_str()
        .unwrap()
        .contains("can't create an ordered service order"));
    assert_eq!(ctx.repository.count_all().await.unwrap(), 1);
}

#[actix_web::test]
async fn test_edit_changes_only_targeted_fields() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let order = ctx
        .repository
        .create(ALICE_ID, "wish list", ServiceOrderState::Wish)
        .await
        .unwrap();

    let payload = TestDataFactory::edit_resource_payload(json!({"name": "renamed"}));
    let resp = test::call_service(
        &app,
        api_post(&TestDataFactory::resource_path(order.id), ALICE_KEY, &payload).to_request(),
    )
    .await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "renamed");
    assert_eq!(body["state"], "wish");
    assert_eq!(body["user_id"], ALICE_ID);
    assert_eq!(body["created_at"], order.created_at.to_rfc3339());
}

#[actix_web::test]
async fn test_batch_edit_returns_both_in_request_order() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let first = ctx
        .repository
        .create(ALICE_ID, "first", ServiceOrderState::Wish)
        .await
        .unwrap();
    let second = ctx
        .repository
        .create(ALICE_ID, "second", ServiceOrderState::Wish)
        .await
        .unwrap();

    let payload = TestDataFactory::edit_payload(vec![
        json!({"id": second.id, "name": "new name 2"}),
        json!({"href": format!("http://localhost:8080{}", TestDataFactory::resource_path(first.id)), "name": "new name 1"}),
    ]);
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(result_ids(&body), vec![second.id, first.id]);
    assert_eq!(results(&body)[0]["name"], "new name 2");
    assert_eq!(results(&body)[1]["name"], "new name 1");
}

#[actix_web::test]
async fn test_placing_an_order_is_final() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let cart = ctx
        .repository
        .create(ALICE_ID, "shopping cart", ServiceOrderState::Cart)
        .await
        .unwrap();
    let path = TestDataFactory::resource_path(cart.id);

    let place = TestDataFactory::edit_resource_payload(json!({"state": "ordered"}));
    let resp = test::call_service(&app, api_post(&path, ALICE_KEY, &place).to_request()).await;
    assert_status(&resp, StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"], "ordered");
    assert!(body["placed_at"].is_string());

    let reopen = TestDataFactory::edit_resource_payload(json!({"state": "cart"}));
    let resp = test::call_service(&app, api_post(&path, ALICE_KEY, &reopen).to_request()).await;
    assert_status(&resp, StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error(
        &body,
        "bad_request",
        "can't change the state of an ordered service order",
    );

    // a new cart can be opened once the old one is placed
    let resp = test::call_service(
        &app,
        api_post(COLLECTION_PATH, ALICE_KEY, &TestDataFactory::cart_payload()).to_request(),
    )
    .await;
    assert_status(&resp, StatusCode::OK);
}

#[actix_web::test]
async fn test_delete_verb_returns_no_content() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let order = ctx
        .repository
        .create(ALICE_ID, "wish", ServiceOrderState::Wish)
        .await
        .unwrap();
    ctx.repository
        .create(ALICE_ID, "kept", ServiceOrderState::Wish)
        .await
        .unwrap();

    let resp = test::call_service(
        &app,
        api_delete(&TestDataFactory::resource_path(order.id), ALICE_KEY).to_request(),
    )
    .await;
    assert_status(&resp, StatusCode::NO_CONTENT);
    assert_eq!(ctx.repository.count_all().await.unwrap(), 1);
}

#[actix_web::test]
async fn test_delete_action_returns_success_envelope() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let order = ctx
        .repository
        .create(ALICE_ID, "wish", ServiceOrderState::Wish)
        .await
        .unwrap();

    let resp = test::call_service(
        &app,
        api_post(
            &TestDataFactory::resource_path(order.id),
            ALICE_KEY,
            &json!({"action": "delete"}),
        )
        .to_request(),
    )
    .await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        format!("service_orders id: {} deleting", order.id)
    );
    assert_eq!(ctx.repository.count_all().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_batch_delete_removes_exactly_the_targets() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let order = ctx
            .repository
            .create(ALICE_ID, name, ServiceOrderState::Wish)
            .await
            .unwrap();
        ids.push(order.id);
    }

    let payload = TestDataFactory::delete_payload(&ids[..2]);
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(results(&body).iter().all(|r| r["success"] == true));
    assert_eq!(ctx.repository.count_all().await.unwrap(), 1);
    assert!(ctx
        .repository
        .find_by_id(ALICE_ID, ids[2])
        .await
        .unwrap()
        .is_some());
}

#[actix_web::test]
async fn test_batch_delete_reports_missing_items() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let order = ctx
        .repository
        .create(ALICE_ID, "wish", ServiceOrderState::Wish)
        .await
        .unwrap();

    let payload = TestDataFactory::delete_payload(&[order.id, 9999]);
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let entries = results(&body);
    assert_eq!(entries[0]["success"], true);
    assert_eq!(entries[1]["success"], false);
    assert_eq!(
        entries[1]["message"],
        "Couldn't find ServiceOrder with 'id'=9999"
    );
    assert_eq!(ctx.repository.count_all().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_round_trip() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    // create
    let payload = TestDataFactory::service_order_payload("round trip", "wish");
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let id = result_ids(&body)[0];
    let path = TestDataFactory::resource_path(id);

    // read
    let resp = test::call_service(&app, api_get(&path, ALICE_KEY).to_request()).await;
    assert_status(&resp, StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "round trip");

    // edit
    let edit = TestDataFactory::edit_resource_payload(json!({"name": "edited", "state": "cart"}));
    let resp = test::call_service(&app, api_post(&path, ALICE_KEY, &edit).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    // read again
    let resp = test::call_service(&app, api_get(&path, ALICE_KEY).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "edited");
    assert_eq!(body["state"], "cart");

    // delete
    let resp = test::call_service(&app, api_delete(&path, ALICE_KEY).to_request()).await;
    assert_status(&resp, StatusCode::NO_CONTENT);

    // gone
    let resp = test::call_service(&app, api_get(&path, ALICE_KEY).to_request()).await;
    assert_status(&resp, StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_error(&body, "not_found", &format!("'id'={}", id));
}

#[actix_web::test]
async fn test_names_round_trip_unchanged() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let payload = TestDataFactory::service_order_payload("  padded name  ", "wish");
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let path = TestDataFactory::resource_path(result_ids(&body)[0]);

    let resp = test::call_service(&app, api_get(&path, ALICE_KEY).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "  padded name  ");

    let edit = TestDataFactory::edit_resource_payload(json!({"name": " edited\t"}));
    let resp = test::call_service(&app, api_post(&path, ALICE_KEY, &edit).to_request()).await;
    assert_status(&resp, StatusCode::OK);

    let resp = test::call_service(&app, api_get(&path, ALICE_KEY).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], " edited\t");
}

#[actix_web::test]
async fn test_overlong_names_are_bad_requests() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;
    let overlong = "x".repeat(256);

    let payload = TestDataFactory::service_order_payload(&overlong, "wish");
    let resp = test::call_service(&app, api_post(COLLECTION_PATH, ALICE_KEY, &payload).to_request()).await;
    assert_status(&resp, StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error(&body, "bad_request", "name is too long");
    assert_eq!(ctx.repository.count_all().await.unwrap(), 0);

    let order = ctx
        .repository
        .create(ALICE_ID, "wish list", ServiceOrderState::Wish)
        .await
        .unwrap();
    let edit = TestDataFactory::edit_resource_payload(json!({"name": overlong}));
    let resp = test::call_service(
        &app,
        api_post(&TestDataFactory::resource_path(order.id), ALICE_KEY, &edit).to_request(),
    )
    .await;
    assert_status(&resp, StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error(&body, "bad_request", "name is too long");

    let unchanged = ctx.repository.find_by_id(ALICE_ID, order.id).await.unwrap().unwrap();
    assert_eq!(unchanged.name, "wish list");
}

#[actix_web::test]
async fn test_list_pages_with_limit_and_offset() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    for i in 0..5 {
        ctx.repository
            .create(ALICE_ID, &format!("wish {}", i), ServiceOrderState::Wish)
            .await
            .unwrap();
    }

    let resp = test::call_service(
        &app,
        api_get(
            &format!("{}?expand=resources&limit=2&offset=1", COLLECTION_PATH),
            ALICE_KEY,
        )
        .to_request(),
    )
    .await;
    assert_status(&resp, StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 5);
    assert_eq!(body["subcount"], 2);
    let names: Vec<_> = body["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["wish 1", "wish 2"]);
}

#[actix_web::test]
async fn test_unknown_action_is_a_bad_request() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.routes())).await;

    let resp = test::call_service(
        &app,
        api_post(COLLECTION_PATH, ALICE_KEY, &json!({"action": "checkout"})).to_request(),
    )
    .await;
    assert_status(&resp, StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_error(&body, "bad_request", "Unsupported action checkout");
}
