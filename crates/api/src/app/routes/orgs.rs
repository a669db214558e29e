use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::HeaderMap,
};

use orgauth_auth::Target;
use orgauth_core::OrgId;
use orgauth_infra::{AuthorizationRequest, ResolveError};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// `GET /orgs/:org_id/authorizations`
///
/// A `Product-Code` header narrows user resolution to rows of that corp type
/// (or rows with no entity); for service accounts it is the corp type filter.
pub async fn get_org_authorizations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(org_id): Path<String>,
    Query(query): Query<dto::AuthorizationQuery>,
    headers: HeaderMap,
) -> axum::response::Response {
    let org_id: OrgId = match org_id.parse() {
        Ok(id) => id,
        Err(e) => return errors::resolve_error_to_response(ResolveError::from(e)),
    };

    let request = AuthorizationRequest {
        principal: Some(principal.principal().clone()),
        target: Some(Target::Org(org_id)),
        corp_type: common::product_code_header(&headers),
    };

    let outcome = services.resolver().resolve(&request).await;
    common::authorization_response(outcome, query.expanded)
}
