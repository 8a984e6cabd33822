use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::GameError, models::night::ActionKind, services::game_service, state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct AddRoleRequest {
    pub name: String,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub faction: Option<String>,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NightActionRequest {
    pub player: String,
    pub action: ActionKind,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LynchRequest {
    pub target: String,
    #[serde(default)]
    pub secondary_target: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KillRequest {
    pub target: String,
}

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub viewer: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .nest(
            "/:room",
            Router::new()
                // Role quota configuration
                // curl -X POST .../api/game/{room}/roles -d '{"name":"Mafia","count":2}'
                .route("/roles", post(add_role))
                .route("/roles/:index", delete(remove_role))
                .route("/roles/reset", post(reset_roles))
                // Assignment and game start
                .route("/assign", post(assign_roles))
                .route("/start", post(start_game))
                // Night flow
                .route("/night/start", post(start_night))
                .route("/night/action", post(night_action))
                .route("/night/advance", post(advance_night_step))
                .route("/day/start", post(start_day))
                // Day eliminations
                .route("/lynch", post(lynch))
                .route("/kill", post(host_kill))
                // Lifecycle and state
                .route("/restart", post(restart))
                .route("/state", get(get_state)),
        )
        .with_state(state)
}

async fn add_role(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(req): Json<AddRoleRequest>,
) -> Result<impl IntoResponse, GameError> {
    game_service::add_role(&state, &room, &req.name, req.count, req.faction).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

async fn remove_role(
    State(state): State<AppState>,
    Path((room, index)): Path<(String, usize)>,
) -> Result<impl IntoResponse, GameError> {
    game_service::remove_role(&state, &room, index).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

async fn reset_roles(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    game_service::reset_roles(&state, &room).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

async fn assign_roles(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    game_service::assign_roles(&state, &room).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

async fn start_game(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    game_service::start_game(&state, &room).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "phase": "night" }))))
}

async fn start_night(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    game_service::start_night(&state, &room).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "phase": "night" }))))
}

async fn night_action(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(req): Json<NightActionRequest>,
) -> Result<impl IntoResponse, GameError> {
    let result =
        game_service::submit_night_action(&state, &room, &req.player, req.action, req.target)
            .await?;
    Ok((StatusCode::OK, Json(result)))
}

async fn advance_night_step(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let status = game_service::advance_night_step(&state, &room).await?;
    Ok((StatusCode::OK, Json(status)))
}

async fn start_day(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let daybreak = game_service::start_day(&state, &room).await?;
    Ok((StatusCode::OK, Json(daybreak)))
}

async fn lynch(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(req): Json<LynchRequest>,
) -> Result<impl IntoResponse, GameError> {
    let result = game_service::lynch(&state, &room, &req.target, req.secondary_target).await?;
    Ok((StatusCode::OK, Json(result)))
}

async fn host_kill(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(req): Json<KillRequest>,
) -> Result<impl IntoResponse, GameError> {
    let result = game_service::host_kill(&state, &room, &req.target).await?;
    Ok((StatusCode::OK, Json(result)))
}

async fn restart(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    game_service::restart(&state, &room).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

async fn get_state(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<StateQuery>,
) -> Result<impl IntoResponse, GameError> {
    let view = game_service::get_state(&state, &room, query.viewer.as_deref()).await?;
    Ok((StatusCode::OK, Json(view)))
}
