//! HTTP trigger and status API
//!
//! Routes are organized into modules:
//! - routes::reports: start report generation, poll job status

pub mod error;
pub mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tally_config::Config;
use tally_core::ReportService;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportService>,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::reports::{api_report_state, api_reports_generate, api_reports_status};

    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/v1/reports",
            get(api_reports_status).post(api_reports_generate),
        )
        .route("/api/v1/reports/:name", get(api_report_state))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Serve the API until Ctrl-C
pub async fn start_server(config: Config, reports: Arc<ReportService>) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = AppState { reports };
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting tally server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - POST /api/v1/reports (start report generation)");
    log::info!("  - GET  /api/v1/reports (report status)");
    log::info!("  - GET  /api/v1/reports/:name (single report status)");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::path::Path;
    use std::time::Duration;
    use tally_core::ReportKind;
    use tower::ServiceExt;

    fn app(input: &Path, output: &Path) -> (Router, Arc<ReportService>) {
        let mut config = Config::default();
        config.data.input_dir = input.to_path_buf();
        config.data.output_dir = output.to_path_buf();
        let reports = Arc::new(ReportService::with_default_reader(config));
        let router = create_router(AppState {
            reports: reports.clone(),
        });
        (router, reports)
    }

    async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = app(dir.path(), dir.path());
        let response = router
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_starts_idle() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = app(dir.path(), dir.path());
        let (status, json) = send(router, "GET", "/api/v1/reports").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accounts.csv"], "idle");
        assert_eq!(json["yearly.csv"], "idle");
        assert_eq!(json["fs.csv"], "idle");
    }

    #[tokio::test]
    async fn test_generate_then_poll() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("file1.csv"), "2023-01-01,Cash,,100,0\n").unwrap();
        let (router, reports) = app(input.path(), output.path());

        let (status, json) = send(router.clone(), "POST", "/api/v1/reports").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "processing started");

        for _ in 0..200 {
            if ReportKind::ALL.iter().all(|k| !reports.state(*k).is_running()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let (_, json) = send(router, "GET", "/api/v1/reports").await;
        for name in ["accounts.csv", "yearly.csv", "fs.csv"] {
            let state = json[name].as_str().unwrap();
            assert!(state.contains("finished in"), "{}: {}", name, state);
        }
        assert_eq!(
            std::fs::read_to_string(output.path().join("fs.csv")).unwrap(),
            "category,balance\nAsset,100.00\n"
        );
    }

    #[tokio::test]
    async fn test_single_report_state() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = app(dir.path(), dir.path());

        let (status, json) = send(router.clone(), "GET", "/api/v1/reports/yearly").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["report"], "yearly.csv");
        assert_eq!(json["state"], "idle");

        let (status, json) = send(router, "GET", "/api/v1/reports/monthly").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("monthly"));
    }
}
