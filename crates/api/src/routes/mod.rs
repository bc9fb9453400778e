//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod admin;
pub mod allocations;
pub mod applications;
pub mod errors;
pub mod health;
pub mod reports;

/// Creates the API router. Everything except the health check requires a bearer token.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(applications::routes())
        .merge(reports::routes())
        .merge(allocations::routes())
        .merge(admin::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
