use axum::{
    extract::State,
    http::{ header, StatusCode },
    response::{ IntoResponse, Response },
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::webserver::state::AppState;

const CACHE_CONTROL_OK: &str = "public, s-maxage=60, stale-while-revalidate=300";

/// Create supply routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/total-supply", get(get_total_supply))
}

/// GET /api/v1/total-supply
///
/// Returns the total supply as a bare plain-text integer. Supply-tracking
/// aggregators expect the number with no JSON envelope around it.
async fn get_total_supply(State(state): State<Arc<AppState>>) -> Response {
    match state.supply_reader.get_supplies().await {
        Ok(supplies) =>
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/plain"),
                    (header::CACHE_CONTROL, CACHE_CONTROL_OK),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
                ],
                supplies.total_supply.to_string(),
            ).into_response(),
        Err(e) => {
            log::error!("Total supply request failed: {}", e);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                "Error fetching supply data",
            ).into_response()
        }
    }
}
