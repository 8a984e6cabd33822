use crate::error::GameError;
use crate::models::{
    night::ActionKind,
    role::{is_mafia_faction, normalize_faction, RoleId},
    room::{Phase, Room},
};

use super::phase;

/// Picks tonight's mafia-kill finalizer: a living Godfather, else a living
/// Framer, else the lexicographically-first living Mafia-faction member.
/// Deterministic so the night flow stays testable.
pub fn resolve_finalizer(room: &Room) -> Option<String> {
    let alive = room.alive_players();
    if let Some(gf) = alive
        .iter()
        .find(|p| room.role_id_of(p) == Some(RoleId::Godfather))
    {
        return Some(gf.clone());
    }
    if let Some(framer) = alive
        .iter()
        .find(|p| room.role_id_of(p) == Some(RoleId::Framer))
    {
        return Some(framer.clone());
    }
    alive
        .into_iter()
        .filter(|p| is_mafia_faction(room.faction_of(p)))
        .min()
}

/// What an investigation into `target` reveals tonight. The Godfather check
/// runs before the frame check; that precedence is load-bearing (a framed
/// Godfather still reads as innocent).
pub fn check_reveal(room: &Room, target: &str) -> String {
    if let Some(role) = room.role_of(target) {
        if role.trim().eq_ignore_ascii_case("godfather") {
            return "Villager".to_string();
        }
    }
    if let Some(framed) = room.night.target(ActionKind::Frame) {
        if framed.eq_ignore_ascii_case(target) {
            return "Mafia".to_string();
        }
    }
    normalize_faction(room.faction_of(target))
}

/// Validates and records one night submission. Returns the immediate reveal
/// for check-kind actions, `None` otherwise.
///
/// Rule priority follows the permission matrix: live-target check first,
/// then role/capability, then the finalizer rule, then step placement.
pub fn submit_night_action(
    room: &mut Room,
    actor: &str,
    kind: ActionKind,
    target: Option<String>,
) -> Result<Option<String>, GameError> {
    if room.game_over {
        return Err(GameError::GameOver);
    }
    if room.phase != Phase::Night {
        return Err(GameError::WrongPhase(room.phase.to_string()));
    }

    if let Some(t) = target.as_deref() {
        if !room.is_alive(t) {
            return Err(GameError::InvalidTarget(t.to_string()));
        }
    }

    if !room.is_alive(actor) {
        return Err(GameError::Unauthorized(format!(
            "{} is not a living player",
            actor
        )));
    }

    if kind == ActionKind::MafiaFinal {
        match room.night.finalizer.clone() {
            Some(finalizer) => {
                if !finalizer.eq_ignore_ascii_case(actor) {
                    return Err(GameError::Unauthorized(format!(
                        "only {} may finalize the mafia kill",
                        finalizer
                    )));
                }
            }
            // No resolvable finalizer: any living Mafia-faction member may
            // submit the final target.
            None => {
                if !is_mafia_faction(room.faction_of(actor)) {
                    return Err(GameError::Unauthorized(
                        "only the mafia may finalize the kill".to_string(),
                    ));
                }
            }
        }
    } else {
        let allowed = room
            .role_id_of(actor)
            .and_then(RoleId::night_action)
            .map(|k| k == kind)
            .unwrap_or(false);
        if !allowed {
            return Err(GameError::Unauthorized(format!(
                "your role may not submit {}",
                kind
            )));
        }
    }

    // The finalizer may act out of step; the bomber's target is a
    // pre-submission accepted at any step. Everything else must match the
    // current step, except a resubmission by the same actor, which
    // overwrites the earlier value for this night.
    if kind != ActionKind::MafiaFinal && kind != ActionKind::SuicideTarget {
        let resubmission = room
            .night
            .actor(kind)
            .map(|a| a.eq_ignore_ascii_case(actor))
            .unwrap_or(false);
        if room.current_step() != Some(kind) && !resubmission {
            return Err(GameError::WrongStep);
        }
    }

    room.night.record(kind, actor, target.clone());

    // Retroactive promotion: a living Framer becomes finalizer the moment
    // they frame, provided no Godfather is alive.
    if kind == ActionKind::Frame {
        let godfather_alive = room
            .alive_players()
            .iter()
            .any(|p| room.role_id_of(p) == Some(RoleId::Godfather));
        if !godfather_alive {
            room.night.finalizer = Some(actor.to_string());
        }
    }

    let reveal = if kind == ActionKind::Check {
        target.as_deref().map(|t| {
            let revealed = check_reveal(room, t);
            room.night_reports.insert(
                actor.to_string(),
                format!("{} appears to be {}", t, revealed),
            );
            revealed
        })
    } else {
        None
    };

    phase::auto_advance(room);
    Ok(reveal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::game_room;

    #[test]
    fn finalizer_prefers_godfather_then_framer_then_lex_mafia() {
        let room = game_room(&[
            ("M1", "Mafia", "mafia"),
            ("F1", "Framer", "mafia"),
            ("G1", "Godfather", "mafia"),
        ]);
        assert_eq!(resolve_finalizer(&room), Some("G1".to_string()));

        let mut room = room;
        room.eliminate("G1");
        assert_eq!(resolve_finalizer(&room), Some("F1".to_string()));

        room.eliminate("F1");
        assert_eq!(resolve_finalizer(&room), Some("M1".to_string()));

        room.eliminate("M1");
        assert_eq!(resolve_finalizer(&room), None);
    }

    #[test]
    fn lexicographic_tiebreak_among_plain_mafia() {
        let room = game_room(&[
            ("Zed", "Mafia", "mafia"),
            ("Ann", "Mafia", "mafia"),
            ("Bob", "Villager", "villagers"),
        ]);
        assert_eq!(resolve_finalizer(&room), Some("Ann".to_string()));
    }

    #[test]
    fn godfather_reveals_villager_even_when_framed() {
        let mut room = game_room(&[
            ("Cop", "Cop", "villagers"),
            ("Framer", "Framer", "villagers"),
            ("GF", "Godfather", "mafia"),
        ]);
        room.night.record(ActionKind::Frame, "Framer", Some("GF".to_string()));
        assert_eq!(check_reveal(&room, "GF"), "Villager");
    }

    #[test]
    fn framed_villager_reveals_mafia() {
        let mut room = game_room(&[
            ("Cop", "Cop", "villagers"),
            ("Framer", "Framer", "villagers"),
            ("Bob", "Villager", "villagers"),
        ]);
        room.night.record(ActionKind::Frame, "Framer", Some("Bob".to_string()));
        assert_eq!(check_reveal(&room, "Bob"), "Mafia");
    }

    #[test]
    fn unframed_target_reveals_normalized_faction() {
        let room = game_room(&[("Cop", "Cop", "villagers"), ("Bob", "Villager", "villagers")]);
        assert_eq!(check_reveal(&room, "Bob"), "Villager");
    }

    #[test]
    fn unknown_faction_reveals_unknown() {
        let room = game_room(&[("Cop", "Cop", "villagers"), ("J", "Jester", "")]);
        assert_eq!(check_reveal(&room, "J"), "Unknown");
    }
}
