//! Bearer-token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::infrastructure::crypto::jwt::{verify_token, AuthError, Claims, JwtConfig};
use crate::interfaces::http::common::ApiResponse;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity decoded from a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }

    /// Account reference recorded on reservations; `None` when the subject
    /// is not a UUID.
    pub fn account_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.account_id).ok()
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(request: &Request<Body>, auth_state: &AuthState) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = extract_token(auth_header).ok_or(AuthError::InvalidToken)?;
    verify_token(token, &auth_state.jwt_config).map(AuthenticatedUser::from_claims)
}

/// Rejects requests without a valid bearer token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&request, &auth_state) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Attaches the caller identity when a valid token is present; anonymous
/// requests pass through untouched.
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&request, &auth_state) {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(AuthError::MissingToken) => {}
        // A present but broken token is an error even on public routes
        Err(e) => return auth_error_response(e),
    }
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let body = Json(ApiResponse::<()>::error("UNAUTHORIZED", error.to_string()));
    (StatusCode::UNAUTHORIZED, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;
    use axum::extract::Extension;
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn auth_state() -> AuthState {
        AuthState {
            jwt_config: JwtConfig::new("middleware-secret", "hotel-identity"),
        }
    }

    async fn whoami(user: Option<Extension<AuthenticatedUser>>) -> String {
        user.map(|Extension(u)| u.username)
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app() -> Router {
        let state = auth_state();
        Router::new()
            .route(
                "/private",
                get(whoami).layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
            )
            .route(
                "/public",
                get(whoami).layer(middleware::from_fn_with_state(
                    state,
                    optional_auth_middleware,
                )),
            )
    }

    async fn call(path: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut req = Request::builder().uri(path);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let resp = app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn private_route_requires_token() {
        let (status, _) = call("/private", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = create_token(&Uuid::new_v4().to_string(), "ann", "staff", &auth_state().jwt_config).unwrap();
        let (status, body) = call("/private", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ann");
    }

    #[tokio::test]
    async fn public_route_allows_anonymous_but_not_garbage() {
        let (status, body) = call("/public", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");

        let (status, _) = call("/public", Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Bearer "), None);
    }
}
