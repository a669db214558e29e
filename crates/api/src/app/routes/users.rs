use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// `GET /users/@me/authorizations`: one expanded entry per org the caller
/// belongs to.
pub async fn get_my_authorizations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services
        .resolver()
        .resolve_all_for_user(principal.keycloak_guid())
        .await
    {
        Ok(all) => {
            let authorizations = all
                .iter()
                .map(|resolved| dto::AuthorizationResponse::from_resolved(resolved, true))
                .collect();
            (
                StatusCode::OK,
                Json(dto::UserAuthorizationsResponse { authorizations }),
            )
                .into_response()
        }
        Err(e) => errors::resolve_error_to_response(e),
    }
}
