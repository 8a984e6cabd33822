use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: String,
    pub player_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub message_type: ChatMessageType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ChatMessageType {
    /// Open table talk, visible to everyone.
    Public,
    /// Mafia-only channel during the night.
    Mafia,
    /// Private messages (check results and the like).
    Private,
    System,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn add_system_message(&mut self, content: String) {
        self.add_message(ChatMessage::new(
            "System".to_string(),
            content,
            ChatMessageType::System,
        ));
    }
}

impl ChatMessage {
    pub fn new(player_name: String, content: String, message_type: ChatMessageType) -> Self {
        ChatMessage {
            message_id: uuid::Uuid::new_v4().to_string(),
            player_name,
            content,
            timestamp: Utc::now(),
            message_type,
        }
    }
}
