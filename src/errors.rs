// src/errors.rs

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Błędy warstwy usług (wywołania zewnętrznego API produktów).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Błąd połączenia z API produktów: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API produktów zwróciło status {status}: {message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Nie znaleziono produktu")]
    NotFound,

    #[error("API odrzuciło dane produktu: {0}")]
    Validation(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Błędy obsługi żądań HTTP samego panelu.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Nie znaleziono zasobu")]
    NotFound,

    #[error("Nieprawidłowe dane wejściowe: {0}")]
    UnprocessableEntity(String),

    #[error("Wewnętrzny błąd serwera")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Nie znaleziono zasobu".to_string()),
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::InternalServerError(message) => {
                tracing::error!("Wewnętrzny błąd serwera: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Błąd przetwarzania Multipart: {:?}", err);
        AppError::UnprocessableEntity(format!("Błąd przetwarzania danych formularza: {}", err))
    }
}
