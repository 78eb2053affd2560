pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::Session;

/// How often an armed countdown is pushed to the client
const TIMER_TICK: Duration = Duration::from_secs(1);

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_json(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize server message: {}", e);
            true
        }
    }
}

/// Countdown update for an armed timer. The expired tick goes out once per
/// deadline; `expired_deadline` remembers which one it was sent for.
fn timer_tick(
    session: &Session,
    now: DateTime<Utc>,
    expired_deadline: &mut Option<DateTime<Utc>>,
) -> Option<ServerMessage> {
    let end = session.timer_end?;
    if *expired_deadline == Some(end) {
        return None;
    }
    let expired = session.timer_expired(now);
    if expired {
        *expired_deadline = Some(end);
    }
    Some(ServerMessage::Timer {
        remaining_secs: session.timer_remaining(now).unwrap_or_default(),
        expired,
        server_now: now.to_rfc3339(),
    })
}

/// Handle one connection. The connection owns its session; it lives exactly
/// as long as the socket.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut session = Session::new();

    tracing::info!("WebSocket connected, session {}", session.id);

    let welcome = ServerMessage::Welcome {
        protocol: "1.0".to_string(),
        ai_available: state.llm.is_some(),
        packs: state.packs.list_packs(),
        state: session.snapshot(Utc::now()),
    };
    if !send_json(&mut sender, &welcome).await {
        tracing::error!("Failed to send welcome message");
        return;
    }

    let mut ticker = tokio::time::interval(TIMER_TICK);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut expired_deadline = None;

    loop {
        tokio::select! {
            // Refresh the countdown display while a timer is armed
            _ = ticker.tick() => {
                if let Some(tick) = timer_tick(&session, Utc::now(), &mut expired_deadline) {
                    if !send_json(&mut sender, &tick).await {
                        break;
                    }
                }
            }

            // Handle client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text.as_str());

                        let response = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                handlers::handle_message(client_msg, &mut session, &state).await
                            }
                            Err(e) => {
                                tracing::error!("Failed to parse client message: {}", e);
                                Some(ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("Invalid message format: {}", e),
                                })
                            }
                        };

                        if let Some(response) = response {
                            if !send_json(&mut sender, &response).await {
                                tracing::error!("Failed to send response");
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    tracing::info!(
        "WebSocket connection closed, session {} ended after {} round(s)",
        session.id,
        session.round
    );
}
