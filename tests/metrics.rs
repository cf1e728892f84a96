// tests/metrics.rs
use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use sales_dashboard::config::AppConfig;
use sales_dashboard::ingest::providers::FixtureSource;
use sales_dashboard::{router, AppState};

const CATALOG: &str = r#"[
  {"Categoria do Produto":"livros","Preço":10.0,"Data da Compra":"05/01/2021","Vendedor":"Ana","Local da compra":"SP","lat":-22.19,"lon":-48.79},
  {"Categoria do Produto":"livros","Preço":10.0,"Data da Compra":"bad","Vendedor":"Ana","Local da compra":"SP","lat":-22.19,"lon":-48.79}
]"#;

#[tokio::test]
async fn dashboard_build_shows_up_in_exposition() {
    let app = router(AppState::new(
        Arc::new(FixtureSource::from_json_str(CATALOG)),
        AppConfig::default(),
    ));

    let r = app
        .clone()
        .oneshot(Request::get("/api/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::OK);

    let m = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(m.status(), StatusCode::OK);
    let body = body::to_bytes(m.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "dashboard_fetch_total",
        "dashboard_rows_rejected_total",
        "dashboard_build_ms",
        "dashboard_last_build_ts",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
}
