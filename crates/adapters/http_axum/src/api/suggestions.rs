//! Suggestion sessions and the per-user Server-Sent Events stream.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};
use homewise_app::suggestion::{SuggestionState, SuggestionUpdateKind};
use homewise_domain::id::{UserId, parse};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the session and state endpoints.
pub enum SessionResponse {
    Ok(Json<SuggestionState>),
    NoContent,
}

impl IntoResponse for SessionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/users/:id/suggestions/session`
pub async fn start_session<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<SessionResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&id)?;
    state.user_service.get_user(user_id).await?;
    let handle = state.suggestions.start_session(user_id);
    Ok(SessionResponse::Ok(Json(handle.state())))
}

/// `DELETE /api/users/:id/suggestions/session`
pub async fn end_session<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<SessionResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&id)?;
    state.suggestions.end_session(user_id);
    Ok(SessionResponse::NoContent)
}

/// `GET /api/users/:id/suggestions`: current scheduler state.
///
/// Starts a session when none is running.
pub async fn state<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<SessionResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    start_session(State(state), Path(id)).await
}

/// `GET /api/users/:id/suggestions/stream`: SSE stream of the user's
/// suggestion updates.
///
/// Subscribes before starting the session so the first evaluation is not
/// missed. Each update is sent as a JSON `data:` frame whose SSE event name
/// is the update type (`suggestion` or `banner`). The stream holds a session
/// lease, so the session ends once the last client disconnects.
pub async fn stream<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&id)?;
    state.user_service.get_user(user_id).await?;

    let updates = state.suggestion_updates.subscribe();
    let lease = state.suggestions.attach(user_id);

    let event_stream = BroadcastStream::new(updates).filter_map(move |result| match result {
        Ok(update) if update.user_id == lease.user_id() => {
            let name = match update.kind {
                SuggestionUpdateKind::Suggestion { .. } => "suggestion",
                SuggestionUpdateKind::Banner { .. } => "banner",
            };
            match serde_json::to_string(&update) {
                Ok(json) => Some(Ok(Event::default().event(name).data(json))),
                Err(err) => {
                    tracing::warn!(%err, "failed to serialize suggestion update for SSE stream");
                    None
                }
            }
        }
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(
                %user_id,
                skipped = n,
                "SSE subscriber lagged, some suggestion updates were dropped"
            );
            None
        }
    });

    Ok(Sse::new(event_stream).keep_alive(KeepAlive::default()))
}
