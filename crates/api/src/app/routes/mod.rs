use axum::{Router, routing::get};

pub mod common;
pub mod entities;
pub mod orgs;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/orgs/:org_id/authorizations", get(orgs::get_org_authorizations))
        .route(
            "/entities/:business_identifier/authorizations",
            get(entities::get_entity_authorizations),
        )
        .route("/users/@me/authorizations", get(users::get_my_authorizations))
}
