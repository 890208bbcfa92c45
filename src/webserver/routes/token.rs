use axum::{
    extract::{ Query, State },
    http::{ header, StatusCode },
    response::{ IntoResponse, Response },
    routing::get,
    Json,
    Router,
};
use serde::{ Deserialize, Serialize };
use std::sync::Arc;

use crate::webserver::state::AppState;

/// Freshness window expected by aggregator crawlers
const CACHE_CONTROL_OK: &str = "public, s-maxage=60, stale-while-revalidate=300";

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    meta: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Create token metrics routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/token/npro", get(get_token_metrics).options(token_preflight))
}

/// GET /api/v1/token/npro?meta={true|false}
async fn get_token_metrics(
    Query(params): Query<TokenQuery>,
    State(state): State<Arc<AppState>>
) -> Response {
    let include_meta = params.meta.as_deref() == Some("true");

    match state.metrics.build_response(include_meta).await {
        Ok(body) =>
            (
                StatusCode::OK,
                [
                    (header::CACHE_CONTROL, CACHE_CONTROL_OK),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
                ],
                Json(body),
            ).into_response(),
        Err(e) => {
            log::error!("Token metrics request failed: {}", e);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [
                    (header::CACHE_CONTROL, "no-store"),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                ],
                Json(ErrorBody {
                    error: "internal_error",
                    message: e.to_string(),
                }),
            ).into_response()
        }
    }
}

/// OPTIONS /api/v1/token/npro - CORS preflight
async fn token_preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    ).into_response()
}
