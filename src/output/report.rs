use serde::Serialize;

use crate::estimate::{Estimate, FieldError};

/// JSON body for a successful estimate, shared by `estimate --format json`
/// and `POST /estimate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    pub estimated_days: f64,
    pub breakdown: Vec<(&'static str, f64)>,
}

impl From<&Estimate> for EstimateReport {
    fn from(estimate: &Estimate) -> Self {
        Self {
            estimated_days: estimate.days,
            breakdown: estimate.breakdown.pairs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldErrorReport {
    pub field: String,
    pub message: String,
}

impl From<&FieldError> for FieldErrorReport {
    fn from(error: &FieldError) -> Self {
        Self {
            field: error.field.name().to_string(),
            message: error.problem.to_string(),
        }
    }
}

/// JSON body for a rejected request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub errors: Vec<FieldErrorReport>,
}

impl ErrorReport {
    pub fn from_field_errors(errors: &[FieldError]) -> Self {
        Self {
            errors: errors.iter().map(FieldErrorReport::from).collect(),
        }
    }

    /// A single error not tied to an input field (e.g. malformed JSON).
    pub fn body(message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldErrorReport {
                field: "body".to_string(),
                message: message.into(),
            }],
        }
    }
}
