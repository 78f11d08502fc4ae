use std::{convert::Infallible, str::FromStr};

use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures_util::Stream;
use services::services::events::Table;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tracing::debug;

use crate::{AppState, error::ApiError};

/// One SSE stream per watched table. Each write to the table shows up as an
/// event named after the row operation; subscribers refetch on any of them.
/// Lagged receivers drop the missed notifications, which is safe because
/// consumers never patch state from event payloads.
pub async fn stream_table_events(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let table = Table::from_str(&table)
        .map_err(|_| ApiError::BadRequest(format!("unknown table: {table}")))?;
    debug!(table = %table, "sse subscriber attached");

    let rx = state.bus().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| {
        let event = msg.ok()?;
        if event.table != table {
            return None;
        }
        let payload = Event::default()
            .event(event.op.to_string())
            .json_data(&event)
            .ok()?;
        Some(Ok::<_, Infallible>(payload))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().route("/events/{table}", get(stream_table_events))
}
