//! HTTP/JSON API served with axum.
//!
//! ## URL layout
//!
//! ```text
//! GET    /api/health
//! GET    /api/team
//! GET    /api/team/{id}
//! POST   /api/team
//! GET    /api/programs
//! GET    /api/initiatives?category=
//! POST   /api/contact
//! GET    /api/admin/contacts         (bearer token)
//! DELETE /api/admin/contacts/{id}    (bearer token)
//! GET    /api/stats
//! *                                  → 404 {error, path}
//! ```

pub mod admin;
pub mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{MethodRouter, delete, get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
#[cfg(feature = "cors")]
use tower_http::cors::CorsLayer;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

use crate::error::AppError;
use crate::store::Store;
use admin::AdminAccess;

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — all fields are reference-counted.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<Store>,
    pub admin: Arc<dyn AdminAccess>,
}

impl ApiState {
    pub fn new(store: Store, admin: Box<dyn AdminAccess>) -> Self {
        Self {
            store: Arc::new(store),
            admin: Arc::from(admin),
        }
    }
}

/// Endpoints logged at startup.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/api/health"),
    ("GET", "/api/team"),
    ("GET", "/api/programs"),
    ("GET", "/api/initiatives"),
    ("POST", "/api/contact"),
    ("GET", "/api/admin/contacts"),
    ("GET", "/api/stats"),
];

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: ApiState) -> Router {
    let admin_routes = [
        ("/contacts", get(handlers::list_contacts)),
        ("/contacts/{id}", delete(handlers::delete_contact)),
    ]
    .into_iter()
    .fold(Router::new(), |router, (path, method)| route_slashed(router, path, method))
    .route_layer(middleware::from_fn_with_state(
        state.clone(),
        admin::require_admin,
    ));

    let public_routes: [(&str, MethodRouter<ApiState>); 7] = [
        ("/api/health",      get(handlers::health)),
        ("/api/team",        get(handlers::list_team).post(handlers::create_team)),
        ("/api/team/{id}",   get(handlers::get_team)),
        ("/api/programs",    get(handlers::list_programs)),
        ("/api/initiatives", get(handlers::list_initiatives)),
        ("/api/contact",     post(handlers::submit_contact)),
        ("/api/stats",       get(handlers::stats)),
    ];

    let router = public_routes
        .into_iter()
        .fold(Router::new(), |router, (path, method)| route_slashed(router, path, method))
        .nest("/api/admin", admin_routes)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http());

    #[cfg(feature = "cors")]
    let router = router.layer(CorsLayer::permissive());

    router
}

/// Register `path` both bare and with one trailing slash.
fn route_slashed<S>(router: Router<S>, path: &str, method: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, method.clone())
        .route(&format!("{path}/"), method)
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Bind `bind_addr` and serve until `shutdown` is cancelled.
pub async fn serve(
    bind_addr: &str,
    state: ApiState,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    serve_on(listener, state, shutdown).await
}

/// Serve on an already-bound listener. Tests bind port 0 and pass it here.
pub async fn serve_on(
    listener: TcpListener,
    state: ApiState,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let local_addr = listener
        .local_addr()
        .map_err(|e| AppError::Server(format!("listener has no local address: {e}")))?;

    info!(%local_addr, "kerala ai backend listening");
    for (method, path) in ENDPOINTS {
        info!("  {method:<6} http://{local_addr}{path}");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("server shut down");
    Ok(())
}
