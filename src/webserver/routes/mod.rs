use axum::Router;
use std::sync::Arc;

use crate::webserver::state::AppState;

pub mod supply;
pub mod token;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new().nest("/api/v1", api_v1_routes()).with_state(state)
}

fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new().merge(token::routes()).merge(supply::routes())
}
