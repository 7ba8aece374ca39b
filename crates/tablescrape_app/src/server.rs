//! HTTP host for the scrape operation.
//!
//! `POST /scrape` takes `{"url": "..."}` and answers with a JSON array of
//! records, or an [`ErrorBody`] with status 400 or 500. `GET /health` needs no
//! body.

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tablescrape_core::{ErrorBody, ErrorKind, FailureClass, ScrapeRequest};
use tablescrape_engine::ScrapeService;
use tablescrape_logging::{scrape_error, scrape_info, scrape_warn};
use tokio::net::TcpListener;

/// Build the router. The service is shared by reference across requests.
pub fn router(service: Arc<ScrapeService>) -> Router {
    Router::new()
        .route("/scrape", post(handle_scrape))
        .route("/health", get(handle_health))
        .with_state(service)
}

/// Serve `router` on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        scrape_info!("Scrape endpoint listening on http://{addr}/scrape");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn handle_scrape(
    State(service): State<Arc<ScrapeService>>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            scrape_warn!("Rejected scrape request body: {}", rejection.body_text());
            return error_response(ErrorBody::new(
                ErrorKind::InvalidRequest,
                rejection.body_text(),
            ));
        }
    };

    match service.handle(&request).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            match err.kind().class() {
                FailureClass::ServiceFault => {
                    scrape_error!("Scrape failed ({}): {}", err.status_code(), err)
                }
                FailureClass::CallerFault => {
                    scrape_warn!("Scrape failed ({}): {}", err.status_code(), err)
                }
            }
            error_response(err.to_body())
        }
    }
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn error_response(body: ErrorBody) -> Response {
    let status =
        StatusCode::from_u16(body.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}
