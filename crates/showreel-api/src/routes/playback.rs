//! Routes for playback: snapshot, jumps and the event stream.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use showreel_core::event::DomainEvent;
use showreel_playback::application::query_handlers::PlaybackView;
use showreel_playback::domain::events::{PlaybackEvent, PlaybackEventKind};
use showreel_playback::domain::orchestrator::OrchestratorState;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Frames buffered per SSE connection.
const SSE_BUFFER: usize = 16;

/// Request body for POST /select-group and POST /select-unit.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// Target index.
    pub index: usize,
}

/// GET /
async fn get_playback(State(state): State<AppState>) -> Json<PlaybackView> {
    Json(state.player.snapshot())
}

/// POST /select-group
#[instrument(skip(state, request), fields(index = request.index))]
async fn select_group(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<PlaybackView>, ApiError> {
    let view = state.player.select_group(request.index).await?;
    Ok(Json(view))
}

/// POST /select-unit
#[instrument(skip(state, request), fields(index = request.index))]
async fn select_unit(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<PlaybackView>, ApiError> {
    let view = state.player.select_unit_in_group(request.index).await?;
    Ok(Json(view))
}

/// GET /events
///
/// One SSE frame per playback event; the frame's `event:` is the event type,
/// its `id:` the sequence number and its `data:` the JSON event. The stream
/// ends after `playback.stopped`.
async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.player.subscribe();
    let mut snapshot = state.player.snapshot_updates();
    let stopped = snapshot.borrow_and_update().state == OrchestratorState::Stopped;
    let (frames, stream) = mpsc::channel(SSE_BUFFER);
    if stopped {
        debug!("playback already stopped; closing event stream");
    } else {
        tokio::spawn(forward_events(receiver, snapshot, frames));
    }
    Sse::new(ReceiverStream::new(stream)).keep_alive(KeepAlive::default())
}

/// Forwards events into `frames` until playback stops or the client leaves.
///
/// A subscriber that joined after `playback.stopped` was published never
/// receives it, so a snapshot that reports `Stopped` also ends the stream.
/// Queued events are drained before the snapshot is consulted.
async fn forward_events(
    mut events: broadcast::Receiver<PlaybackEvent>,
    mut snapshot: watch::Receiver<PlaybackView>,
    frames: mpsc::Sender<Result<Event, Infallible>>,
) {
    loop {
        let received = tokio::select! {
            biased;

            received = events.recv() => received,
            changed = snapshot.changed() => {
                if changed.is_err()
                    || snapshot.borrow_and_update().state == OrchestratorState::Stopped
                {
                    debug!("playback stopped; closing event stream");
                    break;
                }
                continue;
            }
        };
        let event = match received {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event stream subscriber lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let last = matches!(event.kind, PlaybackEventKind::PlaybackStopped { .. });
        if frames.send(Ok(to_frame(&event))).await.is_err() {
            debug!("event stream client disconnected");
            break;
        }
        if last {
            break;
        }
    }
}

fn to_frame(event: &PlaybackEvent) -> Event {
    let frame = Event::default()
        .event(event.event_type())
        .id(event.metadata().sequence_number.to_string());
    match serde_json::to_string(event) {
        Ok(json) => frame.data(json),
        Err(err) => {
            warn!(error = %err, "failed to serialize playback event");
            frame.comment("unserializable event")
        }
    }
}

/// Returns the router for playback.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_playback))
        .route("/select-group", post(select_group))
        .route("/select-unit", post(select_unit))
        .route("/events", get(events))
}
