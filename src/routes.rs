use crate::state::AppState;
use axum::{routing::get, Router};

mod game;
mod room;

async fn healthz() -> &'static str {
    "ok"
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/api/room", room::routes(state.clone()))
        .nest("/api/game", game::routes(state))
        .route("/healthz", get(healthz))
}
