//! WebSocket Support for Realtime Room Events
//!
//! One socket per participant per room. Outbound frames are the room's
//! ordered `RoomEvent` stream (preceded by a backlog replay so late
//! subscribers converge); inbound frames are the participant's actions,
//! funneled into the room manager which is the single source of truth for
//! call order.

use super::handlers::AppState;
use crate::bridge::{RealtimeBridge, RoomEvent, RoomStatus};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Frames a participant may send over the socket
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Call a number on the participant's turn
    Call { number: u8 },
    /// Flip the participant's ready flag
    Ready { ready: bool },
    /// Host starts the game
    Start,
    /// The participant completed 5 lines locally
    Winner { name: String },
}

/// Connection identity passed as query parameters
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub player_id: String,
}

/// WebSocket endpoint handler
/// GET /ws/{code}?player_id={id}
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(code): Path<String>,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state, code, params.player_id))
}

async fn handle_connection(socket: WebSocket, state: Arc<AppState>, code: String, player_id: String) {
    // Subscribe first, replay second: events published between the two
    // arrive through the subscription and the duplicate-drop rules in the
    // manager keep replays harmless.
    let mut events = match state.rooms.subscribe(&code).await {
        Ok(events) => events,
        Err(e) => {
            warn!("WebSocket rejected for room {}: {}", code, e);
            return;
        }
    };
    let backlog = match state.rooms.backlog(&code) {
        Ok(backlog) => backlog,
        Err(e) => {
            warn!("WebSocket rejected for room {}: {}", code, e);
            return;
        }
    };

    info!("Player {} connected to room {}", player_id, code);
    let (mut sender, mut receiver) = socket.split();

    for event in backlog {
        if send_event(&mut sender, &event).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut sender, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // The client fell behind the room stream; it can no
                    // longer be trusted to hold a consistent ledger.
                    warn!("Player {} lagged {} events in room {}", player_id, skipped, code);
                    break;
                }
                Err(RecvError::Closed) => break,
            },
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle_frame(&state, &code, &player_id, &text).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Player {} left room {}", player_id, code);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WebSocket error from player {}: {}", player_id, e);
                    break;
                }
            },
        }
    }

    info!("Player {} disconnected from room {}", player_id, code);
}

async fn send_event(
    sender: &mut (impl SinkExt<Message> + Unpin),
    event: &RoomEvent,
) -> Result<(), ()> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to serialize room event: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(text)).await.map_err(|_| ())
}

async fn handle_frame(state: &Arc<AppState>, code: &str, player_id: &str, text: &str) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("Ignoring malformed frame from {}: {}", player_id, e);
            return;
        }
    };

    let result = match frame {
        ClientFrame::Call { number } => state.rooms.publish_call(code, number).await,
        ClientFrame::Ready { ready } => state.rooms.publish_player(code, player_id, ready).await,
        ClientFrame::Start => state.rooms.set_room_status(code, RoomStatus::Playing).await,
        ClientFrame::Winner { name } => state.rooms.publish_winner(code, &name).await,
    };

    if let Err(e) = result {
        warn!("Frame from {} in room {} rejected: {}", player_id, code, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_frame_parsing() {
        let frame: ClientFrame = serde_json::from_str(r#"{"type":"call","number":12}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Call { number: 12 }));

        let frame: ClientFrame = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Start));
    }

    #[test]
    fn test_malformed_frame_is_error() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"exit"}"#).is_err());
    }
}
