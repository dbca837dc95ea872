use axum::Router;

use crate::routes::api_router;
use crate::state::AppState;

pub mod config;
pub mod consts;
pub mod errors;
pub mod membership;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router(state.clone()))
        .with_state(state)
}
