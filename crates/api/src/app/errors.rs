use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use farmstock_infra::ReportError;

pub fn report_error_to_response(err: ReportError) -> axum::response::Response {
    match err {
        ReportError::Fetch { collaborator, source } => {
            tracing::error!(collaborator, error = %source, "stock report fetch failed");
            json_error(
                StatusCode::BAD_GATEWAY,
                "failed_to_load",
                format!("failed to load {collaborator}"),
            )
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
