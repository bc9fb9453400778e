//! Bearer-token authentication for protected routes.
//!
//! Tokens come from the external identity provider; this layer only verifies
//! them and exposes the claims to handlers through [`AuthUser`].

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, routes::errors::error_response};
use midyear_shared::{AppError, Claims, JwtError, UserRole};

fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(code: &'static str, message: &'static str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

/// Verifies the bearer token and stores its [`Claims`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token);

    let Some(token) = token else {
        return unauthorized(
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("TOKEN_EXPIRED", "Token has expired"),
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            unauthorized("INVALID_TOKEN", "Invalid or malformed token")
        }
    }
}

/// Claims of the caller, available to handlers behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller's user ID.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// The caller's organization, if the token carries one.
    #[must_use]
    pub fn organization_id(&self) -> Option<Uuid> {
        self.0.organization_id()
    }

    /// The caller's role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.0.role
    }

    /// The verified claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                error_response(&AppError::Unauthorized("Authentication required".into()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("abc.def"), None);
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_is_unauthorized() {
        async fn whoami(auth: AuthUser) -> String {
            auth.user_id().to_string()
        }
        let app: Router = Router::new().route("/whoami", get(whoami));

        let response = app
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
