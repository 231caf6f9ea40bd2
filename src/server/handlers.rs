use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::Value;

use crate::estimate::{self, validate_with, FieldError, RawInput};
use crate::output::{ErrorReport, EstimateReport};

/// Rejections for `POST /estimate`. Both map to 400 with a field-level list.
#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<FieldError>),
    BadBody(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = match self {
            ApiError::Validation(errors) => ErrorReport::from_field_errors(&errors),
            ApiError::BadBody(message) => ErrorReport::body(message),
        };
        (StatusCode::BAD_REQUEST, Json(report)).into_response()
    }
}

pub async fn estimate(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EstimateReport>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("Rejected body: {}", rejection.body_text());
        ApiError::BadBody(rejection.body_text())
    })?;

    let Value::Object(map) = body else {
        return Err(ApiError::BadBody("expected a JSON object".to_string()));
    };
    let (raw, type_errors) = RawInput::from_json(&map).map_err(ApiError::BadBody)?;

    let input = validate_with(&raw, type_errors).map_err(|errors| {
        tracing::debug!("Rejected input with {} field errors", errors.len());
        ApiError::Validation(errors)
    })?;

    let result = estimate::estimate(&input);
    tracing::info!(
        days = result.days,
        total = result.total,
        method = %input.shipping_method,
        "Estimated delivery time"
    );

    Ok(Json(EstimateReport::from(&result)))
}

pub async fn health_check() -> &'static str {
    "OK"
}
