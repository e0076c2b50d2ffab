mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

fn new_order() -> serde_json::Value {
    json!({
        "customer_name": "Tata Motors",
        "material": "HR Coil",
        "quantity": 1200.0,
        "priority": "high",
        "destination": "Pune"
    })
}

#[tokio::test]
async fn order_lifecycle() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::POST, "/api/v1/orders", Some(new_order())).await;
    assert_eq!(status, StatusCode::CREATED);
    let order = &body["data"];
    assert_eq!(order["unit"], "tons");
    assert_eq!(order["origin_plant"], "Plant A");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["priority"], "high");
    let id = order["id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/v1/orders/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customer_name"], "Tata Motors");

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/api/v1/orders/{id}"),
            Some(json!({ "status": "dispatched", "quantity": 900.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "dispatched");
    assert_eq!(body["data"]["quantity"], 900.0);
    assert_eq!(body["data"]["material"], "HR Coil");

    let response = app
        .request(Method::DELETE, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/v1/orders/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = TestApp::new().await;
    app.post("/api/v1/ingest/orders").await;

    let (status, body) = app.get("/api/v1/orders?status=dispatched").await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer_name"], "JSW Steel");

    let (_, body) = app.get("/api/v1/orders?limit=2").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let app = TestApp::new().await;
    let mut payload = new_order();
    payload["quantity"] = json!(0);

    let (status, body) = app.json(Method::POST, "/api/v1/orders", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn unknown_rake_is_rejected() {
    let app = TestApp::new().await;
    let mut payload = new_order();
    payload["rake_id"] = json!(999);

    let (status, body) = app.json(Method::POST, "/api/v1/orders", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("rake 999"));
}

#[tokio::test]
async fn rake_can_be_assigned_and_cleared() {
    let app = TestApp::new().await;
    app.post("/api/v1/ingest/rakes").await;

    let mut payload = new_order();
    payload["rake_id"] = json!(1);
    let (status, body) = app.json(Method::POST, "/api/v1/orders", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["rake_id"], 1);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/api/v1/orders/{id}"),
            Some(json!({ "rake_id": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["rake_id"].is_null());
}

#[tokio::test]
async fn deleting_a_missing_order_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request(Method::DELETE, "/api/v1/orders/4242", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
