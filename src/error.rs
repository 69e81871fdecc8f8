//! Error types for the dashboard.

use std::path::PathBuf;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to read dataset {path}: {source}")]
    DatasetLoad {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed dataset {path} at line {line}: {message}")]
    DatasetParse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("failed to read model artifact {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact {path} is not a serialized logistic regression: {source}")]
    ModelFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model expects {found} features, dashboard supplies {expected}")]
    IncompatibleModel { expected: usize, found: usize },

    #[error("{field} must be between {min} and {max}, got {value}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            DashboardError::Inference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
