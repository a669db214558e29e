use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orgauth_infra::ResolveError;

pub fn resolve_error_to_response(err: ResolveError) -> axum::response::Response {
    match err {
        ResolveError::MissingIdentity => {
            json_error(StatusCode::UNAUTHORIZED, "missing_identity", "missing identity")
        }
        ResolveError::MissingTarget => {
            json_error(StatusCode::BAD_REQUEST, "missing_target", "missing target")
        }
        ResolveError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
        ResolveError::Store(msg) => {
            tracing::warn!(error = %msg, "authorization store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_errors_map_to_status_codes() {
        let cases = [
            (ResolveError::MissingIdentity, StatusCode::UNAUTHORIZED),
            (ResolveError::MissingTarget, StatusCode::BAD_REQUEST),
            (ResolveError::InvalidInput("corp type must not be blank".into()), StatusCode::BAD_REQUEST),
            (ResolveError::Store("pool closed".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(resolve_error_to_response(err).status(), status);
        }
    }
}
