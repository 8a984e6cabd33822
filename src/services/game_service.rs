use serde::{Deserialize, Serialize};

use crate::{
    engine::{actions, assign, phase},
    error::GameError,
    models::{
        catalog,
        night::{ActionKind, NightOutcome, NIGHT_STEPS},
        role::is_mafia_faction,
        room::{DayEvents, Phase, RoleSlot, Winner},
    },
    services::room_service::get_room_or_expire,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct StepStatus {
    pub advanced: bool,
    pub step: usize,
    pub current_action: Option<ActionKind>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResult {
    pub accepted: bool,
    /// Immediate reveal, present only for check-kind actions with a target.
    pub reveal: Option<String>,
    pub step: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayBreak {
    #[serde(flatten)]
    pub outcome: NightOutcome,
    pub phase: String,
    pub winner: Option<Winner>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LynchResult {
    pub lynched: Option<String>,
    pub chained_kill: Option<String>,
    pub winner: Option<Winner>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KillResult {
    pub eliminated: String,
    pub winner: Option<Winner>,
    pub phase: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisibleRole {
    pub name: String,
    pub role: String,
}

/// Viewer-scoped snapshot of a room. Role visibility is faction-scoped: a
/// Mafia-faction viewer additionally sees the living Mafia roster.
#[derive(Debug, Serialize, Deserialize)]
pub struct StateView {
    pub phase: String,
    pub night_step: Option<usize>,
    pub current_action: Option<ActionKind>,
    pub players: Vec<String>,
    pub alive: Vec<String>,
    pub eliminated: Vec<String>,
    pub game_started: bool,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub last_night_events: Option<NightOutcome>,
    pub last_day_events: Option<DayEvents>,
    pub your_role: Option<String>,
    pub your_faction: Option<String>,
    pub your_description: Option<String>,
    pub visible_roles: Vec<VisibleRole>,
    pub night_report: Option<String>,
}

pub async fn add_role(
    state: &AppState,
    room_name: &str,
    role_name: &str,
    count: usize,
    faction: Option<String>,
) -> Result<(), GameError> {
    if role_name.trim().is_empty() || count < 1 {
        return Err(GameError::InvalidTarget("invalid role slot".to_string()));
    }
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    room.roles.push(RoleSlot {
        name: role_name.trim().to_string(),
        count,
        faction: faction.filter(|f| !f.trim().is_empty()),
    });
    Ok(())
}

pub async fn remove_role(state: &AppState, room_name: &str, index: usize) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    if index >= room.roles.len() {
        return Err(GameError::NotFound(format!("role slot {}", index)));
    }
    room.roles.remove(index);
    Ok(())
}

pub async fn reset_roles(state: &AppState, room_name: &str) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    room.roles.clear();
    room.assignments.clear();
    room.assignment_factions.clear();
    room.game_started = false;
    Ok(())
}

pub async fn assign_roles(state: &AppState, room_name: &str) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    assign::assign_roles(room)
}

pub async fn start_game(state: &AppState, room_name: &str) -> Result<(), GameError> {
    let from;
    {
        let mut rooms = state.rooms.lock().await;
        let room = get_room_or_expire(&mut rooms, room_name)?;
        room.touch();
        from = room.phase.to_string();
        phase::start_game(room)?;
        room.chat
            .add_system_message("The game has started. Night falls.".to_string());
    }
    state.broadcast_phase_change(room_name, &from, "night").await;
    Ok(())
}

pub async fn start_night(state: &AppState, room_name: &str) -> Result<(), GameError> {
    let from;
    {
        let mut rooms = state.rooms.lock().await;
        let room = get_room_or_expire(&mut rooms, room_name)?;
        room.touch();
        from = room.phase.to_string();
        phase::start_night(room)?;
        room.chat.add_system_message("Night falls.".to_string());
    }
    state.broadcast_phase_change(room_name, &from, "night").await;
    Ok(())
}

pub async fn submit_night_action(
    state: &AppState,
    room_name: &str,
    actor: &str,
    kind: ActionKind,
    target: Option<String>,
) -> Result<SubmitResult, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    let reveal = actions::submit_night_action(room, actor, kind, target)?;
    Ok(SubmitResult {
        accepted: true,
        reveal,
        step: room.night_step,
    })
}

pub async fn advance_night_step(
    state: &AppState,
    room_name: &str,
) -> Result<StepStatus, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    let (advanced, step) = phase::advance_step(room);
    Ok(StepStatus {
        advanced,
        step,
        current_action: room.current_step(),
    })
}

pub async fn start_day(state: &AppState, room_name: &str) -> Result<DayBreak, GameError> {
    let daybreak;
    {
        let mut rooms = state.rooms.lock().await;
        let room = get_room_or_expire(&mut rooms, room_name)?;
        room.touch();
        let outcome = phase::start_day(room)?;
        let summary = if outcome.killed.is_empty() {
            "Day breaks. Nobody died tonight.".to_string()
        } else {
            format!("Day breaks. Died tonight: {}.", outcome.killed.join(", "))
        };
        room.chat.add_system_message(summary);
        daybreak = DayBreak {
            outcome,
            phase: room.phase.to_string(),
            winner: room.winner,
        };
    }
    state
        .broadcast_phase_change(room_name, "night", &daybreak.phase)
        .await;
    Ok(daybreak)
}

pub async fn lynch(
    state: &AppState,
    room_name: &str,
    target: &str,
    secondary_target: Option<String>,
) -> Result<LynchResult, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    let events = phase::lynch(room, target, secondary_target)?;
    let mut summary = format!("{} was lynched.", target);
    if let Some(chained) = &events.chained_kill {
        summary.push_str(&format!(" {} was taken down with them.", chained));
    }
    room.chat.add_system_message(summary);
    Ok(LynchResult {
        lynched: events.lynched,
        chained_kill: events.chained_kill,
        winner: room.winner,
    })
}

pub async fn host_kill(
    state: &AppState,
    room_name: &str,
    target: &str,
) -> Result<KillResult, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    phase::host_kill(room, target)?;
    room.chat
        .add_system_message(format!("{} was eliminated by the host.", target));
    Ok(KillResult {
        eliminated: target.to_string(),
        winner: room.winner,
        phase: room.phase.to_string(),
    })
}

/// Clears all per-game state, retaining players and the role quota.
pub async fn restart(state: &AppState, room_name: &str) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;
    room.touch();
    room.reset_game();
    room.chat
        .add_system_message("The game has been restarted.".to_string());
    Ok(())
}

pub async fn get_state(
    state: &AppState,
    room_name: &str,
    viewer: Option<&str>,
) -> Result<StateView, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = get_room_or_expire(&mut rooms, room_name)?;

    let mut visible_roles = Vec::new();
    let mut your_role = None;
    let mut your_faction = None;
    let mut your_description = None;
    let mut night_report = None;

    if let Some(viewer) = viewer {
        if let Some(player) = room.find_player(viewer) {
            let viewer_name = player.name.clone();
            if let Some(role) = room.role_of(&viewer_name) {
                your_role = Some(role.to_string());
                your_description = Some(catalog::describe(role));
                your_faction = Some(room.faction_of(&viewer_name).to_string());
            }
            night_report = room.night_reports.get(&viewer_name).cloned();

            // Mafia see their living teammates; everyone else sees only
            // their own assignment.
            if is_mafia_faction(room.faction_of(&viewer_name)) {
                for name in room.alive_players() {
                    if name != viewer_name && is_mafia_faction(room.faction_of(&name)) {
                        if let Some(role) = room.role_of(&name) {
                            visible_roles.push(VisibleRole {
                                name: name.clone(),
                                role: role.to_string(),
                            });
                        }
                    }
                }
            }
        }
    }

    Ok(StateView {
        phase: room.phase.to_string(),
        night_step: (room.phase == Phase::Night && room.night_step < NIGHT_STEPS.len())
            .then_some(room.night_step),
        current_action: room.current_step(),
        players: room.players.iter().map(|p| p.name.clone()).collect(),
        alive: room.alive_players(),
        eliminated: room.eliminated_players.clone(),
        game_started: room.game_started,
        game_over: room.game_over,
        winner: room.winner,
        last_night_events: room.last_night_events.clone(),
        last_day_events: room.last_day_events.clone(),
        your_role,
        your_faction,
        your_description,
        visible_roles,
        night_report,
    })
}
