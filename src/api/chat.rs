//! End-user chat endpoints

use std::convert::Infallible;

use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::{stream, StreamExt};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, ChatResponse, Json, JsonRejection};
use crate::domain::StreamEvent;
use crate::infrastructure::services::GenerateRequest;

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = GenerateRequest::from(request);
    debug!(workflow_id = ?request.workflow_id, "Chat request");

    let result = state.relay.generate(&request).await?;
    Ok(Json(ChatResponse::new(result)))
}

/// POST /api/chat/stream
///
/// An unreadable body still answers with an event stream carrying the error.
pub async fn chat_stream(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let events = match payload {
        Ok(Json(request)) => {
            let request = GenerateRequest::from(request);
            debug!(workflow_id = ?request.workflow_id, "Streaming chat request");

            state.relay.clone().stream(request).boxed()
        }
        Err(rejection) => {
            warn!(
                status = %rejection.status(),
                error = rejection.message(),
                "Rejected stream request body"
            );

            stream::iter([
                StreamEvent::Start,
                StreamEvent::error(rejection.message()),
                StreamEvent::Done,
            ])
            .boxed()
        }
    };

    let events = events.map(|event| Ok::<_, Infallible>(Event::default().data(event.data())));

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
}
