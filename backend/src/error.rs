//! Error handling for the AgroStock inventory dashboard
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::sheet::SheetError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Spreadsheet ingestion errors
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External service errors
    #[error("AGROFIT token missing or rejected")]
    AgrofitToken,

    #[error("AGROFIT API error: {0}")]
    AgrofitError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// User-facing Portuguese message for each sheet failure
fn sheet_message_pt(err: &SheetError) -> String {
    match err {
        SheetError::HeaderNotFound => {
            "Cabeçalho não encontrado. Preciso de 'Produto' e 'Quantidade'.".to_string()
        }
        SheetError::RequiredColumnMissing { columns } => format!(
            "Colunas obrigatórias não encontradas. Colunas da planilha: {}",
            columns.join(", ")
        ),
        SheetError::NoValidRows { .. } => "Nenhum dado válido na planilha.".to_string(),
        SheetError::UnrecognizedFormat => "Formato não reconhecido.".to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Sheet(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "SHEET_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_pt: sheet_message_pt(err),
                    field: None,
                },
            ),
            AppError::InvalidUpload(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_UPLOAD".to_string(),
                    message_en: msg.clone(),
                    message_pt: format!("Arquivo inválido: {}", msg),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_pt,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado", resource),
                    field: None,
                },
            ),
            AppError::AgrofitToken => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "AGROFIT_TOKEN".to_string(),
                    message_en: "AGROFIT token is missing or was rejected".to_string(),
                    message_pt: "Token AGROFIT ausente ou inválido. Verifique a configuração."
                        .to_string(),
                    field: None,
                },
            ),
            AppError::AgrofitError(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "AGROFIT_ERROR".to_string(),
                    message_en: format!("AGROFIT API error: {}", msg),
                    message_pt: format!("Erro na API AGROFIT: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_pt: format!("Erro de configuração: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_pt: "Ocorreu um erro interno no servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
