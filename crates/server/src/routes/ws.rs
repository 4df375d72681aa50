//! Realtime WebSocket channel.
//!
//! A fresh socket listens on the global stream. Sending
//! `{"type": "join_cart", "cartId": "..."}` switches it to that cart's
//! topic; `{"type": "leave_cart"}` drops back to the global stream. A
//! socket follows at most one cart at a time.
//!
//! Server pushes are [`ServerEvent`]s serialized as JSON. Slow consumers
//! that fall behind the broadcast buffer lose the skipped events and keep
//! going; every push carries the full cart so the next one catches them up.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, instrument, warn};

use swarmcart_core::CartId;

use crate::broadcast::ServerEvent;
use crate::state::AppState;

/// Messages a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinCart { cart_id: CartId },
    LeaveCart,
}

/// GET /ws
#[instrument(skip_all)]
pub async fn upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run(socket, state))
}

async fn run(mut socket: WebSocket, state: AppState) {
    let mut events = state.hub().subscribe_global();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "WebSocket consumer lagged behind");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(subscription) = handle_client_message(&state, &text) {
                        events = subscription;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // ping/pong handled by axum, binary ignored
                Some(Err(err)) => {
                    debug!(error = %err, "WebSocket receive failed");
                    break;
                }
            },
        }
    }
}

/// Parse one client message and return the replacement subscription, if
/// the message asks for one. Malformed messages are logged and dropped.
fn handle_client_message(
    state: &AppState,
    text: &str,
) -> Option<broadcast::Receiver<ServerEvent>> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::JoinCart { cart_id }) => {
            debug!(cart_id = %cart_id, "Socket joined cart topic");
            Some(state.hub().subscribe(&cart_id))
        }
        Ok(ClientMessage::LeaveCart) => {
            debug!("Socket left cart topic");
            Some(state.hub().subscribe_global())
        }
        Err(err) => {
            debug!(error = %err, "Ignoring malformed client message");
            None
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(payload) => socket.send(Message::Text(payload.into())).await,
        Err(err) => {
            // Serialization of our own types failing would be a bug; skip
            // the event rather than killing the socket.
            warn!(error = %err, "Failed to serialize server event");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_parse_wire_shape() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join_cart","cartId":"c-1"}"#).expect("parse");
        assert!(matches!(msg, ClientMessage::JoinCart { cart_id } if cart_id.as_str() == "c-1"));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"leave_cart"}"#).expect("parse");
        assert!(matches!(msg, ClientMessage::LeaveCart));
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"shout"}"#).is_err());
    }
}
