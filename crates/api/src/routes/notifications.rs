//! Websocket stream of approval notifications.

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use expensa_core::workflow::{Actor, TransitionEvent};
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{debug, warn};

use crate::notifier::is_relevant;
use crate::{AppState, middleware::AuthUser};

/// Creates the notification routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ws/notifications", get(notifications_ws))
}

/// GET /ws/notifications
///
/// Streams every transition relevant to the caller as a JSON text frame.
async fn notifications_ws(
    State(state): State<AppState>,
    auth: AuthUser,
    ws: WebSocketUpgrade,
) -> Response {
    let events = state.notifier.subscribe();
    let actor = auth.actor().clone();
    ws.on_upgrade(move |socket| stream_events(socket, events, actor))
}

async fn stream_events(mut socket: WebSocket, mut events: Receiver<TransitionEvent>, actor: Actor) {
    debug!(user_id = %actor.user_id, "Notification stream opened");
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if !is_relevant(&event, &actor) {
                        continue;
                    }
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(error = %e, "Failed to serialize notification");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(user_id = %actor.user_id, skipped, "Notification subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!(user_id = %actor.user_id, "Notification stream closed");
}
