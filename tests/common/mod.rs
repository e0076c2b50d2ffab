#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use rake_dispatch_api::{build_router, config::AppConfig, db, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ORDERS_CSV: &str = "\
order_id,customer_name,material,quantity,unit,status,priority,origin_plant,destination,rate_per_ton
1,Tata Steel,Iron Ore,1200,tons,pending,high,Bokaro Plant,Kolkata Port,850
2,JSW Steel,Coal,3400,tons,dispatched,normal,Bhilai Plant,Visakhapatnam,640
3,Jindal Steel,Steel Coils,800,tons,completed,low,Rourkela Plant,Mumbai,1320
";

pub const RAKES_CSV: &str = "\
rake_number,origin_plant,destination,status,capacity_tons,total_wagons,priority,transit_progress
RK1001,Bokaro Plant,Kolkata Port,Available,3800,58,high,0
RK1002,Bhilai Plant,Visakhapatnam,In Transit,4000,59,normal,45
RK1003,Rourkela Plant,Mumbai,Loading,3600,55,low,0
";

pub const INVENTORY_CSV: &str = "\
plant_location,product_name,material_grade,quantity,unit,storage_location,production_rate
Bokaro Plant,Iron Ore,Grade A,15000,tons,Yard 1,1200
Bhilai Plant,Coal,Grade B,22000,tons,Yard 3,1800
";

pub const ROUTES_CSV: &str = "\
origin,destination,distance_km,transit_time_days,preferred_route,alternate_route,track_capacity_wagons_per_day,route_constraints,expected_delays_days,railway_zone
Bokaro Plant,Kolkata Port,320,1,Bokaro-Asansol-Howrah,,240,,0,ER
Bhilai Plant,Visakhapatnam,720,3,Bhilai-Raipur-Vizianagaram,,180,Ghat section,1,SECR
Bokaro Plant,Durgapur,190,1,Bokaro-Adra-Durgapur,,260,,0,ER
";

/// Snapshot file names as configured by default.
pub const ORDERS_FILE: &str = "customer_orders.csv";
pub const RAKES_FILE: &str = "rake_wagon_details.csv";
pub const INVENTORY_FILE: &str = "production_inventory.csv";
pub const ROUTES_FILE: &str = "route_transport_info_updated.csv";

/// Application wired to an in-memory SQLite store and a temporary snapshot directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub snapshot_dir: TempDir,
}

impl TestApp {
    /// App with all four default snapshots present.
    pub async fn new() -> Self {
        Self::with_snapshots(&[
            (ORDERS_FILE, ORDERS_CSV),
            (RAKES_FILE, RAKES_CSV),
            (INVENTORY_FILE, INVENTORY_CSV),
            (ROUTES_FILE, ROUTES_CSV),
        ])
        .await
    }

    /// App whose snapshot directory holds exactly `files`.
    pub async fn with_snapshots(files: &[(&str, &str)]) -> Self {
        let snapshot_dir = TempDir::new().expect("create snapshot dir");
        for (name, contents) in files {
            std::fs::write(snapshot_dir.path().join(name), contents).expect("write snapshot");
        }

        let mut cfg = AppConfig::new("sqlite::memory:", snapshot_dir.path());
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.ingest_batch_size = 2;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self {
            router,
            state,
            snapshot_dir,
        }
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request and decode the JSON body.
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Method::POST, uri, None).await
    }
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response body is json")
}
