use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GameError {
    #[error("Room not found or expired")]
    RoomNotFound,
    #[error("Total role count ({roles}) must equal number of players ({players})")]
    QuotaMismatch { roles: usize, players: usize },
    #[error("No roles configured")]
    EmptyQuota,
    #[error("Roles have not been assigned yet")]
    RolesNotAssigned,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
    #[error("Action not allowed in the {0} phase")]
    WrongPhase(String),
    #[error("Action not allowed at the current night step")]
    WrongStep,
    #[error("{0} is already eliminated")]
    AlreadyEliminated(String),
    #[error("Player not found: {0}")]
    NotFound(String),
    #[error("The game is over")]
    GameOver,
    #[error("The game has already started")]
    GameStarted,
    #[error("Name already taken: {0}")]
    NameTaken(String),
    #[error("Room already exists: {0}")]
    RoomExists(String),
}

impl GameError {
    pub fn status(&self) -> StatusCode {
        match self {
            GameError::RoomNotFound | GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::Unauthorized(_) => StatusCode::FORBIDDEN,
            GameError::NameTaken(_) | GameError::RoomExists(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
