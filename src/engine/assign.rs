use rand::seq::SliceRandom;

use crate::error::GameError;
use crate::models::{catalog, room::Room};

/// Assigns the configured role quota to the room's players: the
/// quota-expanded role list is shuffled and zipped against players in join
/// order, so every quota slot is used exactly once and every player gets
/// exactly one role instance.
///
/// Also derives each player's faction from the slot's declared faction,
/// falling back to the catalog; unresolved roles get the empty faction.
/// Marks the room as game-started but does not leave the lobby.
pub fn assign_roles(room: &mut Room) -> Result<(), GameError> {
    if room.roles.is_empty() {
        return Err(GameError::EmptyQuota);
    }
    let total = room.quota_total();
    if total != room.players.len() {
        return Err(GameError::QuotaMismatch {
            roles: total,
            players: room.players.len(),
        });
    }

    let mut expanded: Vec<(String, Option<String>)> = Vec::with_capacity(total);
    for slot in &room.roles {
        let declared = slot
            .faction
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        for _ in 0..slot.count {
            expanded.push((slot.name.clone(), declared.clone()));
        }
    }
    expanded.shuffle(&mut rand::thread_rng());

    room.assignments.clear();
    room.assignment_factions.clear();
    for (player, (role_name, declared)) in room.players.iter().zip(expanded) {
        let faction = declared
            .or_else(|| catalog::faction_for(&role_name).map(str::to_string))
            .unwrap_or_default();
        room.assignments.insert(player.name.clone(), role_name);
        room.assignment_factions.insert(player.name.clone(), faction);
    }
    room.game_started = true;
    Ok(())
}
