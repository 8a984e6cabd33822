use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mafia_server::{app::create_app, state::AppState};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

/// Seeds a room over HTTP and then pins the assignments directly through
/// the state handle, so scenarios can address roles by player name.
async fn setup_game(state: &AppState, app: &Router, assignments: &[(&str, &str, &str)]) {
    let (status, _) = send(
        app,
        json_request("POST", "/api/room/create", json!({ "name": "den" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for (i, (player, _, _)) in assignments.iter().enumerate() {
        let (status, _) = send(
            app,
            json_request(
                "POST",
                "/api/room/den/join",
                json!({ "name": player, "device_id": format!("dev-{}", i) }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    {
        let mut rooms = state.rooms.lock().await;
        let room = rooms.get_mut("den").unwrap();
        for (player, role, faction) in assignments {
            room.assignments.insert(player.to_string(), role.to_string());
            room.assignment_factions
                .insert(player.to_string(), faction.to_string());
        }
        room.game_started = true;
    }

    let (status, _) = send(app, json_request("POST", "/api/game/den/start", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn healthz_responds() {
    let app = create_app(AppState::new());
    let response = app.oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn lobby_to_assignment_over_http() {
    let state = AppState::new();
    let app = create_app(state.clone());

    send(
        &app,
        json_request("POST", "/api/room/create", json!({ "name": "den" })),
    )
    .await;
    for (i, name) in ["ann", "bob", "cid"].iter().enumerate() {
        send(
            &app,
            json_request(
                "POST",
                "/api/room/den/join",
                json!({ "name": name, "device_id": format!("dev-{}", i) }),
            ),
        )
        .await;
    }
    send(
        &app,
        json_request("POST", "/api/game/den/roles", json!({ "name": "Mafia", "count": 1 })),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/api/game/den/roles",
            json!({ "name": "Villager", "count": 2 }),
        ),
    )
    .await;

    let (status, _) = send(&app, json_request("POST", "/api/game/den/assign", json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    // Every player holds exactly one role drawn from the quota.
    let rooms = state.rooms.lock().await;
    let room = rooms.get("den").unwrap();
    assert_eq!(room.assignments.len(), 3);
    let mafia_count = room
        .assignments
        .values()
        .filter(|r| r.as_str() == "Mafia")
        .count();
    assert_eq!(mafia_count, 1);
}

#[tokio::test]
async fn night_kill_resolves_at_daybreak() {
    let state = AppState::new();
    let app = create_app(state.clone());
    setup_game(
        &state,
        &app,
        &[
            ("mara", "Mafia", "mafia"),
            ("vic", "Villager", "villagers"),
            ("wes", "Villager", "villagers"),
            ("zoe", "Villager", "villagers"),
        ],
    )
    .await;

    let (status, submit) = send(
        &app,
        json_request(
            "POST",
            "/api/game/den/night/action",
            json!({ "player": "mara", "action": "mafia_final", "target": "vic" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submit["accepted"], true);

    let (status, daybreak) = send(
        &app,
        json_request("POST", "/api/game/den/day/start", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(daybreak["killed"], json!(["vic"]));
    assert_eq!(daybreak["phase"], "day");
    assert_eq!(daybreak["winner"], Value::Null);

    let (_, view) = send(&app, get_request("/api/game/den/state")).await;
    assert_eq!(view["alive"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn check_reveals_framed_target_as_mafia() {
    let state = AppState::new();
    let app = create_app(state.clone());
    setup_game(
        &state,
        &app,
        &[
            ("gia", "Godfather", "mafia"),
            ("finn", "Framer", "mafia"),
            ("cole", "Cop", "villagers"),
            ("bob", "Villager", "villagers"),
            ("dana", "Villager", "villagers"),
        ],
    )
    .await;

    // Godfather passes on the kill, framer frames bob, cop checks bob.
    for body in [
        json!({ "player": "gia", "action": "mafia_final" }),
        json!({ "player": "finn", "action": "frame", "target": "bob" }),
    ] {
        let (status, _) = send(
            &app,
            json_request("POST", "/api/game/den/night/action", body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, submit) = send(
        &app,
        json_request(
            "POST",
            "/api/game/den/night/action",
            json!({ "player": "cole", "action": "check", "target": "bob" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submit["reveal"], "Mafia");

    // Checking the godfather always reads innocent.
    let (_, resubmit) = send(
        &app,
        json_request(
            "POST",
            "/api/game/den/night/action",
            json!({ "player": "cole", "action": "check", "target": "gia" }),
        ),
    )
    .await;
    assert_eq!(resubmit["reveal"], "Villager");
}

#[tokio::test]
async fn unauthorized_and_invalid_submissions_are_rejected() {
    let state = AppState::new();
    let app = create_app(state.clone());
    setup_game(
        &state,
        &app,
        &[
            ("mara", "Mafia", "mafia"),
            ("vic", "Villager", "villagers"),
            ("wes", "Villager", "villagers"),
            ("zoe", "Villager", "villagers"),
        ],
    )
    .await;

    // A villager may not submit the mafia kill.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/game/den/night/action",
            json!({ "player": "vic", "action": "mafia_final", "target": "wes" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().is_some());

    // Unknown target.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/game/den/night/action",
            json!({ "player": "mara", "action": "mafia_final", "target": "nobody" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn host_kill_then_villagers_win() {
    let state = AppState::new();
    let app = create_app(state.clone());
    setup_game(
        &state,
        &app,
        &[
            ("mara", "Mafia", "mafia"),
            ("vic", "Villager", "villagers"),
            ("wes", "Villager", "villagers"),
        ],
    )
    .await;

    let (status, result) = send(
        &app,
        json_request("POST", "/api/game/den/kill", json!({ "target": "mara" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["winner"], "villagers");
    assert_eq!(result["phase"], "finished");

    // The game is over: further night submissions fail.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/game/den/night/action",
            json!({ "player": "vic", "action": "check", "target": "wes" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The game is over");
}

#[tokio::test]
async fn lynched_bomber_takes_secondary_down() {
    let state = AppState::new();
    let app = create_app(state.clone());
    setup_game(
        &state,
        &app,
        &[
            ("sam", "Suicide Bomber", "mafia"),
            ("mara", "Mafia", "mafia"),
            ("vic", "Villager", "villagers"),
            ("wes", "Villager", "villagers"),
            ("zoe", "Villager", "villagers"),
        ],
    )
    .await;

    let (status, result) = send(
        &app,
        json_request(
            "POST",
            "/api/game/den/lynch",
            json!({ "target": "sam", "secondary_target": "vic" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["lynched"], "sam");
    assert_eq!(result["chained_kill"], "vic");

    let (_, view) = send(&app, get_request("/api/game/den/state")).await;
    let eliminated: Vec<String> = view["eliminated"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(eliminated.contains(&"sam".to_string()));
    assert!(eliminated.contains(&"vic".to_string()));
}

#[tokio::test]
async fn restart_returns_to_lobby_keeping_roster() {
    let state = AppState::new();
    let app = create_app(state.clone());
    setup_game(
        &state,
        &app,
        &[
            ("mara", "Mafia", "mafia"),
            ("vic", "Villager", "villagers"),
            ("wes", "Villager", "villagers"),
        ],
    )
    .await;

    let (status, _) = send(
        &app,
        json_request("POST", "/api/game/den/restart", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, view) = send(&app, get_request("/api/game/den/state")).await;
    assert_eq!(view["phase"], "lobby");
    assert_eq!(view["players"].as_array().unwrap().len(), 3);
    assert_eq!(view["game_started"], false);
    assert_eq!(view["winner"], Value::Null);
}
