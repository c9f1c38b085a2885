//! Access control for `/api/admin/*`.
//!
//! The router asks an [`AdminAccess`] implementation whether the request's
//! bearer token may use the admin routes. With no admin token configured the
//! service uses [`DenyAll`], which keeps the routes locked.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::{ApiState, error::ApiError};

pub trait AdminAccess: Send + Sync {
    /// `bearer` is the token after `Bearer `, if the header was present.
    fn authorize(&self, bearer: Option<&str>) -> bool;
}

/// Accepts exactly one shared token.
pub struct TokenAccess {
    token: String,
}

impl TokenAccess {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl AdminAccess for TokenAccess {
    fn authorize(&self, bearer: Option<&str>) -> bool {
        bearer.is_some_and(|b| constant_time_eq(b.as_bytes(), self.token.as_bytes()))
    }
}

/// Rejects every request.
pub struct DenyAll;

impl AdminAccess for DenyAll {
    fn authorize(&self, _bearer: Option<&str>) -> bool {
        false
    }
}

/// Pick the access policy for an optional configured token.
pub fn from_token(token: Option<&str>) -> Box<dyn AdminAccess> {
    match token {
        Some(t) => Box::new(TokenAccess::new(t)),
        None => {
            warn!("no admin token configured; /api/admin routes are locked");
            Box::new(DenyAll)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Middleware applied to the admin sub-router.
pub(super) async fn require_admin(
    State(state): State<ApiState>,
    req: Request,
    next: Next,
) -> Response {
    if state.admin.authorize(bearer_token(&req)) {
        return next.run(req).await;
    }
    warn!(path = %req.uri().path(), "admin request rejected");
    ApiError::Unauthorized.into_response()
}
