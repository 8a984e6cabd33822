use crate::models::{
    night::{ActionKind, CheckResult, NightOutcome},
    room::Room,
};

use super::actions::check_reveal;

struct Attempt {
    target: String,
    cancelled: bool,
}

/// Resolves one night's ledger into deaths, saves, reveals and notes.
/// Deterministic single pass, applied exactly once per night-to-day
/// transition; eliminations are appended to the room idempotently.
///
/// Order matters: collect kill attempts, cancel doctor saves, apply the
/// bodyguard substitution, dedupe, then chain the bomber's final act.
pub fn resolve_night(room: &mut Room) -> NightOutcome {
    let mut outcome = NightOutcome::default();

    // Kill attempts against targets that are no longer alive are dropped
    // silently.
    let mut attempts: Vec<Attempt> = Vec::new();
    for kind in [ActionKind::MafiaFinal, ActionKind::VigilanteKill] {
        if let Some(target) = room.night.target(kind) {
            if room.is_alive(target) {
                attempts.push(Attempt {
                    target: target.to_string(),
                    cancelled: false,
                });
            }
        }
    }

    // Doctor save cancels every attempt on the saved player.
    if let Some(saved) = room.night.target(ActionKind::DoctorSave) {
        let saved = saved.to_string();
        let mut any = false;
        for attempt in attempts.iter_mut() {
            if attempt.target.eq_ignore_ascii_case(&saved) {
                attempt.cancelled = true;
                any = true;
            }
        }
        if any {
            outcome.saved.push(saved);
        }
    }

    // Bodyguard dies in place of the protected player. Every un-cancelled
    // attempt on the protected target is redirected to the guard; the dedupe
    // below collapses them to a single death.
    let guard = room
        .night
        .actor(ActionKind::BodyguardSave)
        .map(str::to_string);
    let protected = room
        .night
        .target(ActionKind::BodyguardSave)
        .map(str::to_string);
    if let (Some(guard), Some(protected)) = (guard, protected) {
        if room.is_alive(&guard) {
            let mut intercepted = false;
            for attempt in attempts.iter_mut() {
                if !attempt.cancelled && attempt.target.eq_ignore_ascii_case(&protected) {
                    attempt.target = guard.clone();
                    intercepted = true;
                }
            }
            if intercepted {
                outcome
                    .notes
                    .push(format!("{} died protecting {}", guard, protected));
            }
        }
    }

    // A player targeted twice dies once.
    for attempt in attempts.iter().filter(|a| !a.cancelled) {
        if !outcome
            .killed
            .iter()
            .any(|k| k.eq_ignore_ascii_case(&attempt.target))
        {
            outcome.killed.push(attempt.target.clone());
        }
    }

    // The bomber's final act: if they die tonight and pre-submitted a
    // secondary target who is still alive, the secondary dies too.
    if let (Some(bomber), Some(secondary)) = (
        room.night.actor(ActionKind::SuicideTarget).map(str::to_string),
        room.night
            .target(ActionKind::SuicideTarget)
            .map(str::to_string),
    ) {
        let bomber_dies = outcome.killed.iter().any(|k| k.eq_ignore_ascii_case(&bomber));
        let secondary_spared = !outcome
            .killed
            .iter()
            .any(|k| k.eq_ignore_ascii_case(&secondary));
        if bomber_dies && secondary_spared && room.is_alive(&secondary) {
            outcome.killed.push(secondary.clone());
            outcome
                .notes
                .push(format!("Suicide bomber {} took {} with them", bomber, secondary));
        }
    }

    // Recorded for the day-phase UI only; the engine does not enforce it.
    outcome.muted = room
        .night
        .target(ActionKind::SheriffMute)
        .map(str::to_string);

    // Re-confirm check reveals with the same rules as the immediate path,
    // so the day summary and the night reveal can never disagree.
    if let (Some(investigator), Some(target)) = (
        room.night.actor(ActionKind::Check).map(str::to_string),
        room.night.target(ActionKind::Check).map(str::to_string),
    ) {
        let revealed = check_reveal(room, &target);
        outcome.checks.push(CheckResult {
            investigator,
            target,
            revealed,
        });
    }

    for killed in &outcome.killed {
        room.eliminate(killed);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::game_room;
    use crate::models::night::ActionKind;

    #[test]
    fn mafia_kill_goes_through_without_saves() {
        let mut room = game_room(&[
            ("Mafia1", "Mafia", "mafia"),
            ("Villager1", "Villager", "villagers"),
            ("Villager2", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "Mafia1", Some("Villager1".into()));

        let outcome = resolve_night(&mut room);
        assert_eq!(outcome.killed, vec!["Villager1"]);
        assert!(outcome.saved.is_empty());
        assert_eq!(room.alive_players().len(), 2);
    }

    #[test]
    fn doctor_save_cancels_the_kill() {
        let mut room = game_room(&[
            ("Alice", "Mafia", "mafia"),
            ("Bob", "Villager", "villagers"),
            ("Carol", "Doctor", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "Alice", Some("Bob".into()));
        room.night
            .record(ActionKind::DoctorSave, "Carol", Some("Bob".into()));

        let outcome = resolve_night(&mut room);
        assert!(outcome.killed.is_empty());
        assert_eq!(outcome.saved, vec!["Bob"]);
        assert!(room.is_alive("Bob"));
    }

    #[test]
    fn doctor_save_cancels_the_vigilante_too() {
        let mut room = game_room(&[
            ("V", "Vigilante", "villagers"),
            ("Doc", "Doctor", "villagers"),
            ("X", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::VigilanteKill, "V", Some("X".into()));
        room.night
            .record(ActionKind::DoctorSave, "Doc", Some("X".into()));

        let outcome = resolve_night(&mut room);
        assert!(outcome.killed.is_empty());
        assert!(room.is_alive("X"));
    }

    #[test]
    fn bodyguard_dies_in_place_of_the_protected() {
        let mut room = game_room(&[
            ("M", "Mafia", "mafia"),
            ("B", "Bodyguard", "villagers"),
            ("X", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "M", Some("X".into()));
        room.night
            .record(ActionKind::BodyguardSave, "B", Some("X".into()));

        let outcome = resolve_night(&mut room);
        assert_eq!(outcome.killed, vec!["B"]);
        assert!(room.is_alive("X"));
        assert!(!room.is_alive("B"));
    }

    #[test]
    fn bodyguard_intercepts_every_attempt_on_the_protected() {
        let mut room = game_room(&[
            ("M", "Mafia", "mafia"),
            ("V", "Vigilante", "villagers"),
            ("B", "Bodyguard", "villagers"),
            ("X", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "M", Some("X".into()));
        room.night
            .record(ActionKind::VigilanteKill, "V", Some("X".into()));
        room.night
            .record(ActionKind::BodyguardSave, "B", Some("X".into()));

        let outcome = resolve_night(&mut room);
        assert_eq!(outcome.killed, vec!["B"]);
        assert!(room.is_alive("X"));
        assert!(!room.is_alive("B"));
        assert_eq!(
            outcome.notes.iter().filter(|n| n.contains("protecting")).count(),
            1
        );
    }

    #[test]
    fn doctor_save_preempts_bodyguard_substitution() {
        let mut room = game_room(&[
            ("M", "Mafia", "mafia"),
            ("D", "Doctor", "villagers"),
            ("B", "Bodyguard", "villagers"),
        ]);
        // Mafia targets D; doctor saves themselves; bodyguard also guards D.
        room.night
            .record(ActionKind::MafiaFinal, "M", Some("D".into()));
        room.night
            .record(ActionKind::DoctorSave, "D", Some("D".into()));
        room.night
            .record(ActionKind::BodyguardSave, "B", Some("D".into()));

        let outcome = resolve_night(&mut room);
        assert!(outcome.killed.is_empty());
        assert!(room.is_alive("D"));
        assert!(room.is_alive("B"));
    }

    #[test]
    fn duplicate_targets_die_once() {
        let mut room = game_room(&[
            ("M", "Mafia", "mafia"),
            ("V", "Vigilante", "villagers"),
            ("X", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "M", Some("X".into()));
        room.night
            .record(ActionKind::VigilanteKill, "V", Some("X".into()));

        let outcome = resolve_night(&mut room);
        assert_eq!(outcome.killed, vec!["X"]);
        assert_eq!(room.eliminated_players, vec!["X"]);
    }

    #[test]
    fn bomber_killed_at_night_chains_their_secondary() {
        let mut room = game_room(&[
            ("Sam", "Suicide Bomber", "mafia"),
            ("Tina", "Mafia", "mafia"),
            ("Liam", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "Tina", Some("Sam".into()));
        room.night
            .record(ActionKind::SuicideTarget, "Sam", Some("Liam".into()));

        let outcome = resolve_night(&mut room);
        assert!(outcome.killed.contains(&"Sam".to_string()));
        assert!(outcome.killed.contains(&"Liam".to_string()));
        assert!(outcome.notes.iter().any(|n| n.contains("Suicide bomber")));
    }

    #[test]
    fn surviving_bomber_does_not_chain() {
        let mut room = game_room(&[
            ("Sam", "Suicide Bomber", "mafia"),
            ("Tina", "Mafia", "mafia"),
            ("Liam", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::SuicideTarget, "Sam", Some("Liam".into()));

        let outcome = resolve_night(&mut room);
        assert!(outcome.killed.is_empty());
        assert!(room.is_alive("Liam"));
    }

    #[test]
    fn attempt_on_already_dead_target_is_dropped() {
        let mut room = game_room(&[
            ("M", "Mafia", "mafia"),
            ("X", "Villager", "villagers"),
            ("Y", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "M", Some("X".into()));
        room.eliminate("X");

        let outcome = resolve_night(&mut room);
        assert!(outcome.killed.is_empty());
    }

    #[test]
    fn sheriff_mute_is_recorded_not_enforced() {
        let mut room = game_room(&[
            ("S", "Sheriff", "villagers"),
            ("X", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::SheriffMute, "S", Some("X".into()));

        let outcome = resolve_night(&mut room);
        assert_eq!(outcome.muted.as_deref(), Some("X"));
        assert!(room.is_alive("X"));
    }

    #[test]
    fn check_results_match_the_immediate_reveal() {
        let mut room = game_room(&[
            ("Cop", "Cop", "villagers"),
            ("Framer", "Framer", "mafia"),
            ("Bob", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::Frame, "Framer", Some("Bob".into()));
        room.night
            .record(ActionKind::Check, "Cop", Some("Bob".into()));

        let outcome = resolve_night(&mut room);
        assert_eq!(outcome.checks.len(), 1);
        assert_eq!(outcome.checks[0].target, "Bob");
        assert_eq!(outcome.checks[0].revealed, "Mafia");
    }

    #[test]
    fn resolution_depends_only_on_final_ledger_state() {
        let mut room = game_room(&[
            ("M", "Mafia", "mafia"),
            ("X", "Villager", "villagers"),
            ("Y", "Villager", "villagers"),
        ]);
        room.night
            .record(ActionKind::MafiaFinal, "M", Some("X".into()));
        room.night
            .record(ActionKind::MafiaFinal, "M", Some("Y".into()));

        let outcome = resolve_night(&mut room);
        assert_eq!(outcome.killed, vec!["Y"]);
        assert!(room.is_alive("X"));
    }
}
