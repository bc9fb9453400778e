//! Stateless allocation check.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;

use midyear_core::allocation::{AllocationSet, AllocationValidator};

use crate::{AppState, middleware::AuthUser};

/// Creates the allocation routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/allocations/validate", post(validate_allocations))
}

/// POST `/allocations/validate` - Check an allocation set without storing it.
///
/// Always answers 200; the verdict is in the body.
async fn validate_allocations(_auth: AuthUser, Json(set): Json<AllocationSet>) -> impl IntoResponse {
    let check = AllocationValidator::validate(&set);
    (
        StatusCode::OK,
        Json(json!({
            "is_valid": check.is_valid(),
            "allocation_check": check
        })),
    )
}
