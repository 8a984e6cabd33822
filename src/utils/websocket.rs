use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::chat::{ChatMessage, ChatMessageType};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    message_type: String,
    player_name: String,
    content: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    room: String,
}

impl WireMessage {
    fn to_chat_message(&self) -> ChatMessage {
        let message_type = match self.message_type.as_str() {
            "mafia" => ChatMessageType::Mafia,
            "private" => ChatMessageType::Private,
            "system" => ChatMessageType::System,
            _ => ChatMessageType::Public,
        };
        ChatMessage::new(self.player_name.clone(), self.content.clone(), message_type)
    }
}

pub async fn handler(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_name))
}

/// One connection: incoming messages are appended to the room's chat log
/// and fanned out on the room channel; the send half relays everything
/// broadcast for this room. Subscribers are woken on append, never polled.
/// The store lock is taken only to append; sends happen outside it.
pub async fn handle_socket(ws: WebSocket, state: AppState, room_name: String) {
    info!("websocket connected for room {}", room_name);
    let tx = state.get_or_create_room_channel(&room_name).await;

    let (mut sender, mut receiver) = ws.split();
    let mut rx = tx.subscribe();

    let recv_state = state.clone();
    let recv_room = room_name.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Text(text) = msg {
                match serde_json::from_str::<WireMessage>(&text) {
                    Ok(mut wire) => {
                        wire.room = recv_room.clone();
                        wire.timestamp = chrono::Utc::now().to_rfc3339();
                        let chat_message = wire.to_chat_message();
                        {
                            let mut rooms = recv_state.rooms.lock().await;
                            if let Some(room) = rooms.get_mut(&recv_room) {
                                room.chat.add_message(chat_message);
                            }
                        }
                        if let Ok(response) = serde_json::to_string(&wire) {
                            if tx.send(Message::Text(response)).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        let error = WireMessage {
                            message_type: "error".to_string(),
                            player_name: "System".to_string(),
                            content: format!("invalid message format: {}", e),
                            timestamp: chrono::Utc::now().to_rfc3339(),
                            room: recv_room.clone(),
                        };
                        if let Ok(response) = serde_json::to_string(&error) {
                            let _ = tx.send(Message::Text(response));
                        }
                    }
                }
            }
        }
    });

    let send_room = room_name.clone();
    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if let Message::Text(text) = &msg {
                // Skip messages addressed to a different room sharing the
                // channel map.
                if let Ok(wire) = serde_json::from_str::<WireMessage>(text) {
                    if !wire.room.is_empty() && wire.room != send_room {
                        continue;
                    }
                }
            }
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    // A disconnected subscriber simply stops consuming; nothing exclusive
    // is held.
    let _ = tokio::join!(receive_task, send_task);
    info!("websocket closed for room {}", room_name);
}
