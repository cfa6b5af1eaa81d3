pub mod health;
pub mod recognition;
pub mod tts;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Json,
};

use crate::error::{AppError, AppResult};

/// Parameters from the JSON body when one is sent, otherwise from the query string.
/// Malformed input is reported as sent, never replaced by a generic message.
pub(crate) fn body_or_query<T>(
    query: Result<Query<T>, QueryRejection>,
    body: Result<Json<T>, JsonRejection>,
) -> AppResult<T> {
    match body {
        Ok(Json(params)) => Ok(params),
        Err(JsonRejection::MissingJsonContentType(_)) => query
            .map(|Query(params)| params)
            .map_err(|e| AppError::BadRequest(e.body_text())),
        Err(e) => Err(AppError::BadRequest(e.body_text())),
    }
}
