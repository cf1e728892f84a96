// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/regions
// - GET /api/dashboard  (happy path, bad query, upstream failure,
//                        repeated seller=, seller list follows the region)
// - GET /api/sellers
// - GET /api/leaderboard

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use sales_dashboard::config::AppConfig;
use sales_dashboard::ingest::providers::FixtureSource;
use sales_dashboard::ingest::types::{CatalogQuery, LoadReport};
use sales_dashboard::{router, AppState, DashboardError, SalesSource};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

const CATALOG: &str = r#"[
  {"Produto":"Livro","Categoria do Produto":"livros","Preço":100.0,"Data da Compra":"05/01/2023","Vendedor":"Ana","Local da compra":"SP","lat":-22.19,"lon":-48.79},
  {"Produto":"Fone","Categoria do Produto":"eletronicos","Preço":200.0,"Data da Compra":"10/02/2023","Vendedor":"Bia","Local da compra":"SP","lat":-22.19,"lon":-48.79},
  {"Produto":"Livro","Categoria do Produto":"livros","Preço":50.0,"Data da Compra":"20/01/2023","Vendedor":"Ana","Local da compra":"RJ","lat":-22.25,"lon":-42.66},
  {"Produto":"Mesa","Categoria do Produto":"moveis","Preço":700.0,"Data da Compra":"03/03/2023","Vendedor":"Caio","Local da compra":"BA","lat":-13.29,"lon":-41.71}
]"#;

struct DownSource;

#[async_trait]
impl SalesSource for DownSource {
    async fn fetch(&self, _q: &CatalogQuery) -> Result<LoadReport, DashboardError> {
        Err(DashboardError::Transport("connection refused".into()))
    }

    fn name(&self) -> &'static str {
        "down"
    }
}

/// Serves a different seller roster per region, like the catalog does.
struct RegionalSource;

#[async_trait]
impl SalesSource for RegionalSource {
    async fn fetch(&self, q: &CatalogQuery) -> Result<LoadReport, DashboardError> {
        let seller = match q.regiao.as_str() {
            "sul" => "Silva, Ana",
            _ => "Caio",
        };
        let body = format!(
            r#"[{{"Categoria do Produto":"livros","Preço":10.0,"Data da Compra":"05/01/2023","Vendedor":"{seller}","Local da compra":"RS","lat":-30.17,"lon":-53.5}}]"#
        );
        sales_dashboard::ingest::parse_payload(&body)
    }

    fn name(&self) -> &'static str {
        "regional"
    }
}

fn test_router() -> Router {
    let source = Arc::new(FixtureSource::from_json_str(CATALOG));
    router(AppState::new(source, AppConfig::default()))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");
    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    assert_eq!(std::str::from_utf8(&bytes).unwrap().trim(), "OK");
}

#[tokio::test]
async fn api_regions_lists_all_six() {
    let (status, v) = get_json(test_router(), "/api/regions").await;
    assert_eq!(status, StatusCode::OK);
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 6);
    assert_eq!(arr[0]["label"], "Brasil");
    assert_eq!(arr[0]["value"], "");
    assert_eq!(arr[1]["value"], "centro-oeste");
}

#[tokio::test]
async fn api_dashboard_contract_for_ui() {
    let (status, v) = get_json(test_router(), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK, "body: {v}");

    assert_eq!(v["totals"]["count"], 4);
    assert_eq!(v["totals"]["revenue"], 1050.0);
    let tabs = v["tabs"].as_array().expect("tabs");
    assert_eq!(tabs.len(), 3);
    assert_eq!(tabs[0]["cards"][0]["value"], "R$ 1.05 mil");

    // Revenue map: BA (700) first, then SP (300), RJ (50)
    let geo = &tabs[0]["charts"][0];
    assert_eq!(geo["kind"], "geo");
    let labels: Vec<&str> = geo["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["BA", "SP", "RJ"]);

    // Sellers tab has both leaderboards by default
    assert_eq!(tabs[2]["charts"].as_array().unwrap().len(), 2);
    assert_eq!(v["rejected_rows"]["count"], 0);
}

#[tokio::test]
async fn api_dashboard_applies_seller_filter_and_top_n() {
    let (status, v) = get_json(
        test_router(),
        "/api/dashboard?sellers=Ana,Bia&top_n=2&metric=sum",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    assert_eq!(v["totals"]["count"], 3);
    assert_eq!(v["query"]["top_n"], 2);

    let board = &v["tabs"][2]["charts"][0];
    assert_eq!(board["title"], "Top 2 vendedores (receita)");
    assert_eq!(board["bars"][0]["label"], "Bia");
    assert_eq!(board["bars"][1]["label"], "Ana");
    // the multi-select still offers every seller of the fetch
    assert_eq!(v["sellers_available"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn api_dashboard_repeated_seller_keeps_commas_in_names() {
    let app = router(AppState::new(Arc::new(RegionalSource), AppConfig::default()));
    let (status, v) = get_json(
        app,
        "/api/dashboard?region=sul&seller=Silva%2C%20Ana&seller=Nobody",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    assert_eq!(v["query"]["sellers"], serde_json::json!(["Silva, Ana", "Nobody"]));
    assert_eq!(v["totals"]["count"], 1);
}

#[tokio::test]
async fn api_dashboard_seller_list_follows_the_region() {
    let app = router(AppState::new(Arc::new(RegionalSource), AppConfig::default()));
    let (_, sul) = get_json(app.clone(), "/api/dashboard?region=sul").await;
    let (_, norte) = get_json(app, "/api/dashboard?region=norte").await;
    assert_eq!(sul["sellers_available"], serde_json::json!(["Silva, Ana"]));
    assert_eq!(norte["sellers_available"], serde_json::json!(["Caio"]));
}

#[tokio::test]
async fn api_dashboard_rejects_out_of_range_inputs() {
    for uri in [
        "/api/dashboard?top_n=1",
        "/api/dashboard?top_n=11",
        "/api/dashboard?year=2030",
        "/api/dashboard?region=Marte",
    ] {
        let (status, v) = get_json(test_router(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(v["kind"], "invalid_query", "{uri}");
    }
}

#[tokio::test]
async fn api_dashboard_surfaces_upstream_failure() {
    let app = router(AppState::new(Arc::new(DownSource), AppConfig::default()));
    let (status, v) = get_json(app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["kind"], "transport");
    assert!(v["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn api_dashboard_surfaces_non_array_payload() {
    let src = Arc::new(FixtureSource::from_json_str(r#"{"oops":true}"#));
    let app = router(AppState::new(src, AppConfig::default()));
    let (status, v) = get_json(app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["kind"], "payload");
}

#[tokio::test]
async fn api_sellers_are_distinct_and_sorted() {
    let (status, v) = get_json(test_router(), "/api/sellers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, serde_json::json!(["Ana", "Bia", "Caio"]));
}

#[tokio::test]
async fn api_leaderboard_by_count() {
    let (status, v) = get_json(test_router(), "/api/leaderboard?metric=count&top_n=2").await;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    assert_eq!(v["metric"], "count");
    let rows = v["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["seller"], "Ana");
    assert_eq!(rows[0]["count"], 2);
}
