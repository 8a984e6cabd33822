use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    error::GameError,
    models::{player::Player, room::Room},
    state::AppState,
    utils::config::CONFIG,
};

/// Removes the room if its host has been inactive past the TTL, then hands
/// back a mutable borrow. Expiry is lazy: it only happens on lookup.
pub fn get_room_or_expire<'a>(
    rooms: &'a mut HashMap<String, Room>,
    room_name: &str,
) -> Result<&'a mut Room, GameError> {
    let expired = rooms
        .get(room_name)
        .map(|r| r.is_expired(CONFIG.room_ttl_seconds))
        .unwrap_or(false);
    if expired {
        rooms.remove(room_name);
    }
    rooms.get_mut(room_name).ok_or(GameError::RoomNotFound)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomSummary {
    pub name: String,
    pub player_count: usize,
    pub phase: String,
    pub game_started: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomOverview {
    pub name: String,
    pub phase: String,
    pub players: Vec<String>,
    pub count: usize,
    pub roles: Vec<crate::models::room::RoleSlot>,
    pub quota_total: usize,
    pub game_started: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct JoinResult {
    /// Effective player name: a rejoin from a known device resumes the
    /// identity it had, whatever name was submitted.
    pub name: String,
    pub rejoined: bool,
}

pub async fn create_room(state: &AppState, room_name: &str) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    // A stale room with the same name does not block re-creation.
    let _ = get_room_or_expire(&mut rooms, room_name);
    if rooms.contains_key(room_name) {
        return Err(GameError::RoomExists(room_name.to_string()));
    }
    rooms.insert(room_name.to_string(), Room::new(room_name.to_string()));
    Ok(())
}

pub async fn list_rooms(state: &AppState) -> Vec<RoomSummary> {
    let rooms = state.rooms.lock().await;
    rooms
        .values()
        .map(|r| RoomSummary {
            name: r.name.clone(),
            player_count: r.players.len(),
            phase: r.phase.to_string(),
            game_started: r.game_started,
        })
        .collect()
}

pub async fn get_room_overview(
    state: &AppState,
    room_name: &str,
) -> Result<RoomOverview, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    Ok(RoomOverview {
        name: room.name.clone(),
        phase: room.phase.to_string(),
        players: room.players.iter().map(|p| p.name.clone()).collect(),
        count: room.players.len(),
        roles: room.roles.clone(),
        quota_total: room.quota_total(),
        game_started: room.game_started,
    })
}

/// Joins a player to a lobby. The device identity is the stable pairing
/// key: the same device resumes its player; a new device may not take an
/// existing name.
pub async fn join_room(
    state: &AppState,
    room_name: &str,
    name: &str,
    device_id: &str,
) -> Result<JoinResult, GameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GameError::InvalidTarget("empty name".to_string()));
    }

    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;

    if let Some(existing) = room.player_by_device(device_id) {
        return Ok(JoinResult {
            name: existing.name.clone(),
            rejoined: true,
        });
    }
    if room.game_started {
        return Err(GameError::GameStarted);
    }
    if room.find_player(name).is_some() {
        return Err(GameError::NameTaken(name.to_string()));
    }

    room.players
        .push(Player::new(name.to_string(), device_id.to_string()));
    Ok(JoinResult {
        name: name.to_string(),
        rejoined: false,
    })
}

/// Removes a player, but only from the lobby and only when both name and
/// device match.
pub async fn leave_room(
    state: &AppState,
    room_name: &str,
    name: &str,
    device_id: &str,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;

    if room.game_started {
        return Err(GameError::GameStarted);
    }
    let before = room.players.len();
    room.players
        .retain(|p| !(p.name_matches(name) && p.device_id == device_id));
    if room.players.len() == before {
        return Err(GameError::NotFound(name.to_string()));
    }
    room.assignments.remove(name);
    room.assignment_factions.remove(name);
    Ok(())
}

pub async fn delete_room(state: &AppState, room_name: &str) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    rooms
        .remove(room_name)
        .map(|_| ())
        .ok_or(GameError::RoomNotFound)
}
