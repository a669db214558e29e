use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use orgauth_auth::ResolvedAuthorization;
use orgauth_infra::ResolveError;

use crate::app::{dto, errors};

/// Header carrying the corp type (or product) the caller acts for.
pub const PRODUCT_CODE_HEADER: &str = "product-code";

/// The `Product-Code` header, when present and non-blank.
pub fn product_code_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(PRODUCT_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Render a resolver outcome. Nothing resolved is `200 { "roles": [] }`.
pub fn authorization_response(
    outcome: Result<Option<ResolvedAuthorization>, ResolveError>,
    expanded: bool,
) -> axum::response::Response {
    match outcome {
        Ok(resolved) => (
            StatusCode::OK,
            Json(dto::AuthorizationResponse::from_optional(resolved.as_ref(), expanded)),
        )
            .into_response(),
        Err(e) => errors::resolve_error_to_response(e),
    }
}
