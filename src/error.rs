use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::domain::ClaimStatus;
use crate::geo::GeometryError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Patta not found: {0}")]
    PattaNotFound(String),

    #[error("Socio-economic record not found: {0}")]
    SocioNotFound(String),

    #[error("Claim {0} already has a socio-economic record")]
    SocioAlreadyExists(String),

    #[error("Claim {claim_id} cannot move from {from} to {to}")]
    InvalidTransition {
        claim_id: String,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    #[error("Invalid polygon: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::ClaimNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::PattaNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::SocioNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::SocioAlreadyExists(_) => (StatusCode::CONFLICT, self.to_string()),
            ServerError::InvalidTransition { .. } => (StatusCode::CONFLICT, self.to_string()),
            ServerError::Geometry(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Config(_) | ServerError::Database(_) | ServerError::Json(_) | ServerError::Io(_) => {
                tracing::error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
