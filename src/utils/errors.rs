//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid check-in step: {0}")]
    CheckinStep(String),

    #[error("Invalid contract status: {0}")]
    ContractState(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: "Unauthorized".to_string(),
                        message: msg,
                        details: None,
                        code: Some("UNAUTHORIZED".to_string()),
                    },
                )
            }

            AppError::Forbidden(msg) => {
                warn!("Forbidden access: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse {
                        error: "Forbidden".to_string(),
                        message: msg,
                        details: None,
                        code: Some("FORBIDDEN".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::CheckinStep(msg) => {
                warn!("Check-in step guard: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Invalid Check-in Step".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CHECKIN_STEP".to_string()),
                    },
                )
            }

            AppError::ContractState(msg) => {
                warn!("Contract status guard: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Invalid Contract Status".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONTRACT_STATUS".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: "JWT Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("JWT_ERROR".to_string()),
                    },
                )
            }

            AppError::Hash(msg) => {
                error!("Hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Hash Error".to_string(),
                        message: "An error occurred while processing credentials".to_string(),
                        details: Some(json!({ "hash_error": msg })),
                        code: Some("HASH_ERROR".to_string()),
                    },
                )
            }

            AppError::ExternalApi(msg) => {
                error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "External API Error".to_string(),
                        message: "An error occurred while communicating with external service".to_string(),
                        details: Some(json!({ "external_api_error": msg })),
                        code: Some("EXTERNAL_API_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Función helper para crear errores de paso de check-in
pub fn checkin_step_error(expected: i32, actual: i32) -> AppError {
    AppError::CheckinStep(format!(
        "La sesión está en el paso {}, se esperaba el paso {}",
        actual, expected
    ))
}

/// Función helper para crear errores de estado de contrato
pub fn contract_state_error(operation: &str, status: &str) -> AppError {
    AppError::ContractState(format!(
        "No se puede {} un contrato en estado '{}'",
        operation, status
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkin_step_error_message() {
        let err = checkin_step_error(3, 2);
        match err {
            AppError::CheckinStep(msg) => {
                assert!(msg.contains("paso 2"));
                assert!(msg.contains("paso 3"));
            }
            _ => panic!("expected CheckinStep"),
        }
    }

    #[test]
    fn test_contract_state_error_message() {
        let err = contract_state_error("firmar", "draft");
        match err {
            AppError::ContractState(msg) => assert!(msg.contains("draft")),
            _ => panic!("expected ContractState"),
        }
    }
}
