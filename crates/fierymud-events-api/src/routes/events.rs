//! Event submission endpoint for out-of-process producers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use fierymud_events_core::category::GameEventType;
use fierymud_events_core::clock::Clock;
use fierymud_events_core::event::GameEvent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/v1/events.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventRequest {
    /// Event category name, e.g. `"CHAT_SAY"`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Human-readable description.
    pub message: String,
    /// Player the event concerns.
    pub player_name: Option<String>,
    /// Zone the event happened in.
    pub zone_id: Option<i32>,
    /// Room the event happened in, as `"zone:local"`.
    pub room_id: Option<String>,
    /// Additional structured fields.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Response body returned once an event has been handed to the publisher.
#[derive(Debug, Serialize)]
pub struct PublishEventResponse {
    /// Channel the event was routed to.
    pub channel: &'static str,
}

impl PublishEventRequest {
    fn into_event(self, clock: &dyn Clock) -> Result<GameEvent, ApiError> {
        let event_type: GameEventType = self.event_type.parse()?;

        let mut event = GameEvent::create_at(event_type, self.message, clock);
        event.player_name = self.player_name;
        event.zone_id = self.zone_id;
        event.room_id = self.room_id;
        event.metadata = self.metadata;
        Ok(event)
    }
}

/// POST /api/v1/events
///
/// Accepted means queued (or counted as dropped), never delivered.
#[instrument(skip(state, request), fields(event_type = %request.event_type))]
async fn publish_event(
    State(state): State<AppState>,
    Json(request): Json<PublishEventRequest>,
) -> Result<(StatusCode, Json<PublishEventResponse>), ApiError> {
    let event = request.into_event(state.clock.as_ref())?;
    let channel = event.channel();

    debug!(channel, "relaying event");
    state.publisher.publish(&event);

    Ok((StatusCode::ACCEPTED, Json(PublishEventResponse { channel })))
}

/// Returns the router for event submission.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(publish_event))
}
