use std::sync::Arc;

use chrono::NaiveDate;
use farmstock_api::app::{self, services::AppServices};
use farmstock_core::{FarmId, ProductId};
use farmstock_infra::{ApplicationStatus, InMemoryFarmData, PlannedApplication};
use farmstock_stock::{Movement, Product, StockEngine};
use reqwest::StatusCode;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(data: Arc<InMemoryFarmData>) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let services = Arc::new(AppServices::in_memory(data, StockEngine::default()));
        let app = app::build_app(services);
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

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
}

fn seeded_farm(data: &InMemoryFarmData) -> FarmId {
    let farm = FarmId::new();
    data.insert_product(farm, Product::new("p", "Óleo mineral", "L"));
    data.insert_product(farm, Product::new("q", "Boro", "Kg"));
    data.insert_product(farm, Product::new("a", "água", "L"));
    data.record_movement(farm, Movement::entry("p", 100.0, 2.0, date(1)));
    data.record_movement(farm, Movement::entry("p", 50.0, 3.0, date(2)));
    data.record_movement(farm, Movement::exit("p", 30.0, date(3)));
    data.record_movement(farm, Movement::entry("ghost", 4.0, 1.0, date(4)));
    data.tag_product(farm, ProductId::new("p"), "Adjuvante");
    data.plan_application(
        farm,
        PlannedApplication::new(ApplicationStatus::Planned)
            .with_line("p", 20.0)
            .with_line("q", 15.0),
    );
    farm
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn(Arc::new(InMemoryFarmData::new())).await;

    let res = reqwest::get(format!("{}/health", server.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn lists_reconciled_stock_sorted_by_name() {
    let data = Arc::new(InMemoryFarmData::new());
    let farm = seeded_farm(&data);
    let server = TestServer::spawn(data).await;

    let res = reqwest::get(format!("{}/farms/{}/stock", server.base_url, farm))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["count"], 4);
    let names: Vec<&str> = body["balances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["product_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["água", "Boro", "Óleo mineral", "Produto não encontrado"]);

    let oil = &body["balances"][2];
    assert_eq!(oil["balance"], 120.0);
    assert_eq!(oil["predicted_quantity"], 100.0);
    assert_eq!(oil["categories"][0], "Adjuvante");

    let ghost = &body["balances"][3];
    assert_eq!(ghost["unit"], "-");

    assert_eq!(body["summary"]["shortfalls"], 1);
    assert_eq!(body["diagnostics"][0]["kind"], "unknown_product");
}

#[tokio::test]
async fn resorts_by_requested_column() {
    let data = Arc::new(InMemoryFarmData::new());
    let farm = seeded_farm(&data);
    let server = TestServer::spawn(data).await;

    let body: serde_json::Value = reqwest::get(format!(
        "{}/farms/{}/stock?sort=predicted_quantity&order=desc",
        server.base_url, farm
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    let ids: Vec<&str> = body["balances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["product_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["p", "ghost", "a", "q"]);
}

#[tokio::test]
async fn single_product_lookup() {
    let data = Arc::new(InMemoryFarmData::new());
    let farm = seeded_farm(&data);
    let server = TestServer::spawn(data).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/farms/{}/stock/q", server.base_url, farm))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let q: serde_json::Value = res.json().await.unwrap();
    assert_eq!(q["balance"], 0.0);
    assert_eq!(q["predicted_quantity"], -15.0);

    let res = client
        .get(format!("{}/farms/{}/stock/nope", server.base_url, farm))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejects_bad_farm_id_and_sort() {
    let data = Arc::new(InMemoryFarmData::new());
    let farm = seeded_farm(&data);
    let server = TestServer::spawn(data).await;

    let res = reqwest::get(format!("{}/farms/not-a-uuid/stock", server.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = reqwest::get(format!("{}/farms/{}/stock?sort=colour", server.base_url, farm))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_sort");
}

#[tokio::test]
async fn other_farms_see_nothing() {
    let data = Arc::new(InMemoryFarmData::new());
    seeded_farm(&data);
    let server = TestServer::spawn(data).await;

    let url = format!("{}/farms/{}/stock", server.base_url, FarmId::new());
    let body: serde_json::Value = reqwest::get(url)
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["count"], 0);
}
