use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, Sse};
use serde::Deserialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};
use tokio_stream::StreamExt;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::ActivityEvent;
use crate::services::access::require_club_access;
use crate::state::AppState;

use super::auth::{authenticate, authenticate_token};

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct EventsQuery {
    pub token: Option<String>,
    pub last_id: Option<i64>,
}

/// Ticks every `period`, starting one period from now rather than immediately.
fn keepalive_ticks(period: Duration) -> IntervalStream {
    let start = tokio::time::Instant::now() + period;
    IntervalStream::new(tokio::time::interval_at(start, period))
}

fn to_sse(event: &ActivityEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_default();
    Event::default()
        .id(event.id.to_string())
        .event("activity")
        .data(data)
}

// GET /api/clubs/:id/events
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(club_id): Path<String>,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    // EventSource can't set headers, so the token may come in the query string
    let user = match query.token.as_deref() {
        Some(token) => authenticate_token(&state, token)?,
        None => authenticate(&state, &headers)?,
    };

    // Subscribe before the catch-up read so nothing falls between the two
    let rx = state.activity_tx.subscribe();
    let catchup = {
        let db = state.db()?;
        require_club_access(&db, &user, &club_id)?;
        queries::get_activity_since(&db, &club_id, query.last_id.unwrap_or(0))?
    };
    let last_seen = catchup.last().map(|e| e.id).unwrap_or(query.last_id.unwrap_or(0));

    tracing::debug!(club_id = %club_id, user_id = %user.id, catchup = catchup.len(), "activity stream opened");

    let catchup_stream =
        tokio_stream::iter(catchup.into_iter().map(|event| Ok::<_, Infallible>(to_sse(&event))));

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.club_id == club_id && event.id > last_seen => Some(Ok(to_sse(&event))),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "activity stream lagged");
            None
        }
    });

    let keepalive_stream =
        keepalive_ticks(KEEPALIVE_INTERVAL).map(|_| Ok(Event::default().comment("keepalive")));

    let merged = catchup_stream.chain(live_stream).merge(keepalive_stream);

    Ok(Sse::new(merged))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keepalive_waits_a_full_period() {
        let mut ticks = keepalive_ticks(Duration::from_millis(200));

        let early = tokio::time::timeout(Duration::from_millis(50), ticks.next()).await;
        assert!(early.is_err(), "keepalive fired on connect");

        let first = tokio::time::timeout(Duration::from_secs(2), ticks.next()).await;
        assert!(matches!(first, Ok(Some(_))));
    }
}
