use std::sync::Arc;

use axum::extract::{Extension, Path, Query};

use orgauth_auth::Target;
use orgauth_infra::AuthorizationRequest;

use crate::app::dto;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// `GET /entities/:business_identifier/authorizations`
///
/// Ignores the `Product-Code` header: the entity already fixes the corp type.
pub async fn get_entity_authorizations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(business_identifier): Path<String>,
    Query(query): Query<dto::AuthorizationQuery>,
) -> axum::response::Response {
    let request = AuthorizationRequest::new(
        principal.principal().clone(),
        Target::Business(business_identifier),
    );

    let outcome = services.resolver().resolve(&request).await;
    common::authorization_response(outcome, query.expanded)
}
