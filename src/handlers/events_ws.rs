//! WebSocket handler for vendor dashboard events
//!
//! Provides `/api/events/ws` so the dashboard can update counters without
//! refetching after a contact is logged or a lead purchased. Delivery is
//! best-effort: a missed event only costs the client a refetch.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::common::ErrorResponse;
use crate::models::event::VendorEvent;
use crate::AppState;

/// Shared fan-out for vendor events
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<VendorEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1000);
        Self { tx }
    }

    /// Broadcast an event to all subscribers. No subscribers is fine.
    pub fn broadcast(&self, event: VendorEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VendorEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Browsers cannot set headers on WebSocket upgrades, so the token rides
/// in the query string
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: String,
}

pub async fn vendor_events_ws(
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let identity = match state.identity.resolve(&query.token).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Not authenticated".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Identity resolution failed: {}", e),
                }),
            )
                .into_response();
        }
    };

    let rx = state.events.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, rx, identity.vendor_id))
}

async fn handle_socket(
    socket: WebSocket,
    mut rx: broadcast::Receiver<VendorEvent>,
    vendor_id: Uuid,
) {
    debug!(vendor_id = %vendor_id, "Vendor event stream connected");
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) if event.vendor_id == vendor_id => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!("Failed to serialize vendor event: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                // Event for another vendor; skip
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(vendor_id = %vendor_id, skipped, "Event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) if text.as_str() == "ping" => {
                    if sender.send(Message::Text("pong".into())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    debug!(vendor_id = %vendor_id, "Vendor event stream disconnected");
}
