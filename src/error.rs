use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

const SERVER_ERROR_MESSAGE: &str =
    "The server encountered a problem and could not process your request.";
const NOT_FOUND_MESSAGE: &str = "The requested resource could not be found.";

#[derive(Debug)]
pub enum AppError {
    MalformedInput(String),
    ValidationFailed,
    NotFound,
    MethodNotAllowed(Method),
    Database(sqlx::Error),
    Session(tower_sessions::session::Error),
    SessionLayerMissing,
}

fn error_envelope(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn server_error() -> Response {
    error_envelope(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedInput(reason) => error_envelope(StatusCode::BAD_REQUEST, reason),
            AppError::ValidationFailed => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "status": "failure" }))).into_response()
            }
            AppError::NotFound => error_envelope(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            AppError::MethodNotAllowed(method) => error_envelope(
                StatusCode::METHOD_NOT_ALLOWED,
                format!("The {method} method is not supported for this resource."),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                server_error()
            }
            AppError::Session(e) => {
                tracing::error!("Session error: {e}");
                server_error()
            }
            AppError::SessionLayerMissing => {
                tracing::error!("Session layer is not installed on this route");
                server_error()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound,
            e => AppError::Database(e),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Session(e)
    }
}
