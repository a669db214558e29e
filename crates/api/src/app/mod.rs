//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: resolver wiring (in-memory or Postgres back end)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response DTOs and JSON mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use orgauth_infra::config::ServiceConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router over already-wired services.
pub fn build_app(jwt_secret: String, services: Arc<AppServices>) -> Router {
    let jwt = Arc::new(orgauth_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a verified principal.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}

/// Wire services from `config` and build the router (entrypoint used by `main.rs`).
pub async fn build_app_from_config(config: &ServiceConfig) -> anyhow::Result<Router> {
    let services = AppServices::from_config(config).await?;
    tracing::info!(backend = services.backend(), "authorization services ready");
    Ok(build_app(config.jwt_secret.clone(), Arc::new(services)))
}
