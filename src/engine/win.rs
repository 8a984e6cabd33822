use crate::models::{
    role::is_mafia_faction,
    room::{Phase, Room, Winner},
};

/// Pure win-condition check over the current alive set: Villagers win once
/// no Mafia-faction member lives; Mafia wins at numeric parity or better.
pub fn evaluate(room: &Room) -> Option<Winner> {
    let alive = room.alive_players();
    let mafia = alive
        .iter()
        .filter(|p| is_mafia_faction(room.faction_of(p)))
        .count();
    let villagers = alive.len() - mafia;

    if mafia == 0 {
        Some(Winner::Villagers)
    } else if mafia >= std::cmp::max(1, villagers) {
        Some(Winner::Mafia)
    } else {
        None
    }
}

/// Re-evaluates after an elimination-producing event and, on a win, flips
/// the room into its terminal state. A winner, once set, never changes.
pub fn apply(room: &mut Room) -> Option<Winner> {
    if room.winner.is_some() {
        return room.winner;
    }
    if !room.game_started {
        return None;
    }
    let winner = evaluate(room)?;
    room.game_over = true;
    room.winner = Some(winner);
    room.phase = Phase::Finished;
    Some(winner)
}
