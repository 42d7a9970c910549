//! `/radar.json`: latest message over plain HTTP.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_TYPE, HeaderName};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracing::warn;

use crate::services::relay::{self, PublishError};
use crate::state::AppState;

/// Response header carrying the sequence number of the returned message.
pub const SEQ_HEADER: &str = "x-radar-seq";

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// `GET /radar.json`: newest message, `204` before the first publish.
pub async fn latest(State(state): State<AppState>) -> Response {
    let Some(published) = state.latest() else {
        return StatusCode::NO_CONTENT.into_response();
    };
    (
        [
            (CONTENT_TYPE, "application/json".to_owned()),
            (HeaderName::from_static(SEQ_HEADER), published.seq.to_string()),
        ],
        published.raw.clone(),
    )
        .into_response()
}

/// `POST /radar.json?token=`: publish one message.
pub async fn publish(State(state): State<AppState>, Query(query): Query<TokenQuery>, body: String) -> Response {
    let result = relay::authorize(&state.config, query.token.as_deref()).and_then(|()| relay::publish(&state, &body));
    match result {
        Ok(published) => (StatusCode::ACCEPTED, Json(serde_json::json!({ "seq": published.seq }))).into_response(),
        Err(e) => {
            warn!(error = %e, "radar: publish rejected");
            (publish_error_to_status(&e), e.to_string()).into_response()
        }
    }
}

pub(crate) fn publish_error_to_status(err: &PublishError) -> StatusCode {
    match err {
        PublishError::Unauthorized => StatusCode::UNAUTHORIZED,
        PublishError::Invalid(_) => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
#[path = "radar_test.rs"]
mod tests;
