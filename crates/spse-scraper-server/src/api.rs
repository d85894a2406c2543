//! HTTP API exposing a scrape run.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use spse_scraper::{ScrapeError, Scraper};
use tower_http::cors::{Any, CorsLayer};

/// Shared state for all handlers.
pub struct ApiState {
    pub scraper: Scraper,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest {
    company_name: Option<String>,
}

/// Build the router: `GET /` liveness and `POST /scrape`.
pub fn router(scraper: Scraper) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/scrape", post(handle_scrape))
        .layer(cors)
        .with_state(Arc::new(ApiState { scraper }))
}

/// Bind `addr` and serve until the process stops.
pub async fn serve(addr: &str, scraper: Scraper) -> anyhow::Result<()> {
    let app = router(scraper);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_root() -> &'static str {
    "API is up"
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn handle_scrape(
    State(state): State<Arc<ApiState>>,
    body: Option<Json<ScrapeRequest>>,
) -> Response {
    let company = body
        .and_then(|Json(req)| req.company_name)
        .unwrap_or_default();

    match state.scraper.run(&company, false).await {
        Ok(records) => Json(records).into_response(),
        Err(ScrapeError::MissingOrganization) => {
            error_response(StatusCode::BAD_REQUEST, "Missing companyName")
        }
        Err(e) => {
            tracing::error!("scraping failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Scraping failed")
        }
    }
}
