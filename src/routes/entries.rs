use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::AppError;
use crate::gate::SubmissionGate;
use crate::json::JsonInput;
use crate::models::{NewEntry, SortOrder};

#[derive(Deserialize)]
pub struct ListQuery {
    sort: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/entries", get(list_entries).post(create_entry))
}

fn status_payload(status: &'static str) -> Json<serde_json::Value> {
    Json(json!({ "status": status }))
}

async fn create_entry(
    State(state): State<AppState>,
    gate: SubmissionGate,
    input: Result<JsonInput<NewEntry>, AppError>,
) -> Result<Response, AppError> {
    // A repeat submission is turned away before the body is even looked at.
    if gate.has_submitted().await? {
        return Ok((StatusCode::CREATED, status_payload("failure")).into_response());
    }

    let JsonInput(entry) = input?;

    if !entry.is_valid() {
        return Err(AppError::ValidationFailed);
    }

    state.entries.insert(&entry).await?;
    gate.mark_submitted().await?;

    tracing::info!(rating = entry.rating, "Guestbook entry created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, "/")],
        status_payload("success"),
    )
        .into_response())
}

async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Unrecognised orderings fall back to store order.
    let sort = query
        .ok()
        .and_then(|Query(query)| query.sort)
        .and_then(|sort| sort.parse::<SortOrder>().ok());

    let entries = state.entries.list_all(sort).await?;

    Ok(Json(json!({ "entries": entries })))
}
