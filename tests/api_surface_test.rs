mod common;

use axum::http::{Method, StatusCode};
use common::*;
use rake_dispatch_api::middleware_helpers::REQUEST_ID_HEADER;

#[tokio::test]
async fn health_endpoints_report_components() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, body) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["details"]["record_store"]["status"], "up");
    assert_eq!(body["details"]["snapshots"]["status"], "up");

    let (status, body) = app.get("/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["service"], "rake-dispatch-api");
}

#[tokio::test]
async fn responses_carry_request_ids() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/data/orders", None).await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    let request_id = response.headers()[REQUEST_ID_HEADER]
        .to_str()
        .unwrap()
        .to_string();

    let body = response_json(response).await;
    assert_eq!(body["meta"]["request_id"], request_id.as_str());
}

#[tokio::test]
async fn route_lookup_works_from_snapshot() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/routes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "snapshot");
    assert_eq!(body["data"]["routes"].as_array().unwrap().len(), 3);

    let (status, body) = app
        .get("/api/v1/routes/lookup?origin=bokaro%20plant&destination=Durgapur")
        .await;
    assert_eq!(status, StatusCode::OK);
    let routes = body["data"].as_array().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["distance_km"], 190.0);

    let (_, body) = app.get("/api/v1/routes/lookup?origin=Bokaro%20Plant").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn route_lookup_errors() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/v1/routes/lookup").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .get("/api/v1/routes/lookup?origin=Bokaro%20Plant&destination=Chennai")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("Chennai"));
}

#[tokio::test]
async fn dashboard_metrics_follow_resolved_data() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/dashboard/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let metrics = body["data"].as_array().unwrap();
    assert_eq!(metrics.len(), 4);
    assert_eq!(metrics[0]["label"], "Total Rakes");
    assert_eq!(metrics[0]["value"], 3);
    // two of three rakes are out of the yard
    assert_eq!(metrics[1]["value"], "66.7%");
    assert_eq!(metrics[3]["value"], 1);
}

#[tokio::test]
async fn seeded_charts_are_reproducible() {
    let app = TestApp::new().await;

    let (status, first) = app.get("/api/v1/dashboard/charts?seed=7").await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = app.get("/api/v1/dashboard/charts?seed=7").await;
    assert_eq!(first["data"], second["data"]);

    let utilization = &first["data"]["rakeUtilization"];
    assert_eq!(utilization["labels"].as_array().unwrap().len(), 7);
    let materials = &first["data"]["materialDistribution"]["labels"];
    assert_eq!(materials, &serde_json::json!(["Coal", "Iron Ore"]));
}

#[tokio::test]
async fn snapshot_browser_lists_and_reads_files() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/snapshots").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, body) = app
        .get(&format!("/api/v1/snapshots/{}?limit=1", RAKES_FILE))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["record_count"], 1);
    assert_eq!(body["data"]["columns"][0], "rake_number");

    let (status, _) = app.get("/api/v1/snapshots/missing.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn snapshot_summary_reports_column_statistics() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get(&format!("/api/v1/snapshots/{}/summary", RAKES_FILE))
        .await;
    assert_eq!(status, StatusCode::OK);

    let summary = &body["data"];
    assert_eq!(summary["file_name"], RAKES_FILE);
    assert_eq!(summary["record_count"], 3);
    assert_eq!(
        summary["column_count"],
        summary["columns"].as_array().unwrap().len()
    );
    assert_eq!(summary["categorical_counts"]["status"]["Available"], 1);
    assert_eq!(summary["categorical_counts"]["rake_number"]["RK1002"], 1);
    assert_eq!(summary["numeric_statistics"]["capacity_tons"]["sum"], 11400.0);
    assert_eq!(summary["numeric_statistics"]["total_wagons"]["min"], 55.0);

    let (status, _) = app.get("/api/v1/snapshots/missing.csv/summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/data/{kind}"].is_object());
    assert!(body["paths"]["/api/v1/snapshots/{file_name}/summary"].is_object());
}
