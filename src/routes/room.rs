use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{error::GameError, services::room_service, state::AppState, utils::websocket};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRequest {
    pub name: String,
    pub device_id: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // Room creation
        // curl -X POST http://localhost:8080/api/room/create -d '{"name":"den"}'
        .route("/create", post(create_room))
        // Room listing
        // curl http://localhost:8080/api/room/rooms
        .route("/rooms", get(list_rooms))
        // Lobby view of one room
        // curl http://localhost:8080/api/room/{room}
        .route("/:room", get(get_room))
        // Join / leave
        // curl -X POST http://localhost:8080/api/room/{room}/join -d '{"name":"ann","device_id":"d1"}'
        .route("/:room/join", post(join_room))
        .route("/:room/leave", post(leave_room))
        // Explicit teardown
        // curl -X DELETE http://localhost:8080/api/room/{room}/delete
        .route("/:room/delete", delete(delete_room))
        // Chat websocket
        // websocat ws://localhost:8080/api/room/{room}/ws
        .route("/:room/ws", get(websocket::handler))
        .with_state(state)
}

async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, GameError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(GameError::InvalidTarget("empty room name".to_string()));
    }
    room_service::create_room(&state, &name).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "room": name }))))
}

async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let rooms = room_service::list_rooms(&state).await;
    (StatusCode::OK, Json(rooms))
}

async fn get_room(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let overview = room_service::get_room_overview(&state, &room_name).await?;
    Ok((StatusCode::OK, Json(overview)))
}

async fn join_room(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<impl IntoResponse, GameError> {
    let joined = room_service::join_room(&state, &room_name, &req.name, &req.device_id).await?;
    Ok((StatusCode::OK, Json(joined)))
}

async fn leave_room(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<impl IntoResponse, GameError> {
    room_service::leave_room(&state, &room_name, &req.name, &req.device_id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    room_service::delete_room(&state, &room_name).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
