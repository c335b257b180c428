use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::AppError;

pub const MAX_BODY_BYTES: usize = 1_048_576;

/// JSON body extractor that reports every parse problem as
/// [`AppError::MalformedInput`] with a readable reason. Unlike `axum::Json`
/// it does not insist on a `Content-Type` header.
pub struct JsonInput<T>(pub T);

impl<T, S> FromRequest<S> for JsonInput<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedInput(rejection.body_text()))?;

        parse_body(&body).map(JsonInput)
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::MalformedInput("body must not be empty".to_string()));
    }

    serde_json::from_slice(body).map_err(|e| {
        let reason = match e.classify() {
            Category::Syntax | Category::Eof => {
                let (line, column) = (e.line(), e.column());
                format!("body contains badly-formed JSON (at line {line} column {column})")
            }
            Category::Data => format!("body contains incorrect JSON: {e}"),
            Category::Io => format!("body could not be read: {e}"),
        };
        AppError::MalformedInput(reason)
    })
}
