use crate::error::GameError;
use crate::models::{
    night::{ActionKind, NightLedger, NightOutcome, NIGHT_STEPS},
    role::{is_mafia_faction, RoleId},
    room::{DayEvents, Phase, Room},
};

use super::{actions, resolve, win};

/// True if some living player is expected to act at this step. For the
/// mafia step that is the finalizer (or, failing one, any living
/// Mafia-faction member); for every other step, a living holder of the
/// matching role capability.
fn step_has_actor(room: &Room, kind: ActionKind) -> bool {
    if kind == ActionKind::MafiaFinal {
        let finalizer_alive = room
            .night
            .finalizer
            .as_deref()
            .map(|f| room.is_alive(f))
            .unwrap_or(false);
        return finalizer_alive
            || room
                .alive_players()
                .iter()
                .any(|p| is_mafia_faction(room.faction_of(p)));
    }
    room.alive_players()
        .iter()
        .any(|p| room.role_id_of(p).and_then(RoleId::night_action) == Some(kind))
}

/// Skips past night steps that cannot or need not act. The loop is bounded
/// so an inconsistent permission matrix degrades to staying on the current
/// step instead of spinning.
pub fn auto_advance(room: &mut Room) {
    if room.phase != Phase::Night {
        return;
    }
    for _ in 0..NIGHT_STEPS.len() + 2 {
        let Some(kind) = room.current_step() else {
            break;
        };
        if !step_has_actor(room, kind) || room.night.acted(kind) {
            room.night_step += 1;
        } else {
            break;
        }
    }
}

fn begin_night(room: &mut Room) {
    room.night = NightLedger::new();
    room.night.finalizer = actions::resolve_finalizer(room);
    room.night_step = 0;
    room.last_night_events = None;
    room.phase = Phase::Night;
    auto_advance(room);
}

/// First host-driven start: enters the first night, provided roles have
/// already been assigned.
pub fn start_game(room: &mut Room) -> Result<(), GameError> {
    if room.game_over {
        return Err(GameError::GameOver);
    }
    if room.assignments.is_empty() {
        return Err(GameError::RolesNotAssigned);
    }
    if room.phase != Phase::Lobby {
        // Already running; starting again is a no-op.
        return Ok(());
    }
    begin_night(room);
    Ok(())
}

/// Day -> night transition: resets the ledger and the one-shot night
/// summary, recomputes the finalizer, runs auto-advance.
pub fn start_night(room: &mut Room) -> Result<(), GameError> {
    if room.game_over || room.phase == Phase::Finished {
        return Err(GameError::GameOver);
    }
    if room.assignments.is_empty() {
        return Err(GameError::RolesNotAssigned);
    }
    if room.phase == Phase::Night {
        return Ok(());
    }
    begin_night(room);
    Ok(())
}

/// Host-only manual override of auto-advance. Returns whether a step was
/// consumed and the step index now current.
pub fn advance_step(room: &mut Room) -> (bool, usize) {
    if room.phase != Phase::Night || room.night_step >= NIGHT_STEPS.len() {
        return (false, room.night_step);
    }
    room.night_step += 1;
    auto_advance(room);
    (true, room.night_step)
}

/// Night -> day transition: resolves the ledger, persists private check
/// reports, then evaluates the win condition. On a win the room lands in
/// `finished` instead of `day`.
pub fn start_day(room: &mut Room) -> Result<NightOutcome, GameError> {
    if room.game_over {
        return Err(GameError::GameOver);
    }
    if room.phase != Phase::Night {
        return Err(GameError::WrongPhase(room.phase.to_string()));
    }

    let outcome = resolve::resolve_night(room);
    for check in &outcome.checks {
        room.night_reports.insert(
            check.investigator.clone(),
            format!("{} appears to be {}", check.target, check.revealed),
        );
    }
    room.last_night_events = Some(outcome.clone());

    if win::apply(room).is_none() {
        room.phase = Phase::Day;
    }
    Ok(outcome)
}

/// Day-phase elimination by vote. A lynched bomber takes their chosen
/// secondary down with them: an explicit `secondary_target` from the host
/// wins over a pre-submitted one.
pub fn lynch(
    room: &mut Room,
    target: &str,
    secondary_target: Option<String>,
) -> Result<DayEvents, GameError> {
    if room.game_over {
        return Err(GameError::GameOver);
    }
    if room.find_player(target).is_none() {
        return Err(GameError::NotFound(target.to_string()));
    }
    if !room.is_alive(target) {
        return Err(GameError::AlreadyEliminated(target.to_string()));
    }

    let mut events = DayEvents {
        lynched: Some(target.to_string()),
        ..DayEvents::default()
    };
    room.eliminate(target);

    if room.role_id_of(target) == Some(RoleId::SuicideBomber) {
        let presubmitted = room
            .night
            .actor(ActionKind::SuicideTarget)
            .filter(|a| a.eq_ignore_ascii_case(target))
            .and_then(|_| room.night.target(ActionKind::SuicideTarget))
            .map(str::to_string);
        if let Some(secondary) = secondary_target.or(presubmitted) {
            if room.is_alive(&secondary) {
                room.eliminate(&secondary);
                events
                    .notes
                    .push(format!("Suicide bomber {} took {} with them", target, secondary));
                events.chained_kill = Some(secondary);
            }
        }
    }

    win::apply(room);
    room.last_day_events = Some(events.clone());
    Ok(events)
}

/// Direct host elimination outside the night cycle.
pub fn host_kill(room: &mut Room, target: &str) -> Result<(), GameError> {
    if room.game_over {
        return Err(GameError::GameOver);
    }
    if room.find_player(target).is_none() {
        return Err(GameError::NotFound(target.to_string()));
    }
    if !room.is_alive(target) {
        return Err(GameError::AlreadyEliminated(target.to_string()));
    }
    room.eliminate(target);
    win::apply(room);
    Ok(())
}
