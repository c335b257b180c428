use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;

const HAS_ENTRY_KEY: &str = "hasEntry";

/// Per-session "already submitted" flag.
///
/// The check and the set are two separate store round trips. Two racing
/// requests in one session may both pass the check.
pub struct SubmissionGate(Session);

impl<S> FromRequestParts<S> for SubmissionGate
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::SessionLayerMissing)?;

        Ok(SubmissionGate(session))
    }
}

impl SubmissionGate {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Unset flags read as false.
    pub async fn has_submitted(&self) -> Result<bool, tower_sessions::session::Error> {
        let flag: Option<bool> = self.0.get(HAS_ENTRY_KEY).await?;
        Ok(flag.unwrap_or(false))
    }

    pub async fn mark_submitted(&self) -> Result<(), tower_sessions::session::Error> {
        self.0.insert(HAS_ENTRY_KEY, true).await
    }
}
