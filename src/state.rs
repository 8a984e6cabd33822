use axum::extract::ws::Message;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{broadcast, Mutex};

use crate::models::room::Room;

/// Shared server state: the room store plus one broadcast channel per room
/// for chat and phase notifications. The store is passed explicitly to every
/// handler; there is no ambient singleton.
///
/// All decision-feeding reads and their writes happen under the single
/// store lock. Channel sends never block, so notifying subscribers while
/// outside the critical section is safe.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<Mutex<HashMap<String, Room>>>,
    pub channel: Arc<Mutex<HashMap<String, broadcast::Sender<Message>>>>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            channel: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get_or_create_room_channel(&self, room_name: &str) -> broadcast::Sender<Message> {
        let mut channels = self.channel.lock().await;
        if let Some(channel) = channels.get(room_name) {
            channel.clone()
        } else {
            let (tx, _) = broadcast::channel(1000);
            channels.insert(room_name.to_string(), tx.clone());
            tx
        }
    }

    /// Pushes a phase-change notification onto the room channel. Called
    /// after the store lock has been released.
    pub async fn broadcast_phase_change(&self, room_name: &str, from_phase: &str, to_phase: &str) {
        let tx = self.get_or_create_room_channel(room_name).await;

        let notification = serde_json::json!({
            "message_type": "phase_change",
            "from_phase": from_phase,
            "to_phase": to_phase,
            "room": room_name,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Ok(text) = serde_json::to_string(&notification) {
            // No subscribers is fine; the log is still in the room.
            let _ = tx.send(Message::Text(text));
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
