/// Built-in role catalog: player-facing description plus the faction the
/// role belongs to when the host does not declare one.
///
/// Lookup order everywhere: exact name, then case-insensitive, then
/// substring against the known names.
pub struct CatalogEntry {
    pub name: &'static str,
    pub faction: &'static str,
    pub description: &'static str,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Villager",
        faction: "villagers",
        description: "An ordinary townsperson. You have no night action; \
                      find the Mafia and vote them out during the day.",
    },
    CatalogEntry {
        name: "Mafia",
        faction: "mafia",
        description: "Member of the Mafia. Each night the Mafia agree on one \
                      player to eliminate.",
    },
    CatalogEntry {
        name: "Godfather",
        faction: "mafia",
        description: "Head of the Mafia. You choose the night kill, and \
                      investigations into you always come back innocent.",
    },
    CatalogEntry {
        name: "Framer",
        faction: "mafia",
        description: "Mafia member. Each night you may frame one player so \
                      that investigations see them as Mafia tonight.",
    },
    CatalogEntry {
        name: "Cop",
        faction: "villagers",
        description: "Each night you investigate one player and learn which \
                      side they appear to be on.",
    },
    CatalogEntry {
        name: "Investigator",
        faction: "villagers",
        description: "Each night you investigate one player and learn which \
                      side they appear to be on.",
    },
    CatalogEntry {
        name: "Doctor",
        faction: "villagers",
        description: "Each night you choose one player to protect from being \
                      killed that night.",
    },
    CatalogEntry {
        name: "Bodyguard",
        faction: "villagers",
        description: "Each night you guard one player. If they are attacked, \
                      you die in their place.",
    },
    CatalogEntry {
        name: "Vigilante",
        faction: "villagers",
        description: "A villager with a gun. Each night you may shoot one \
                      player you suspect of being Mafia.",
    },
    CatalogEntry {
        name: "Sheriff",
        faction: "villagers",
        description: "Each night you may silence one player; they may not \
                      speak during the next day.",
    },
    CatalogEntry {
        name: "Suicide Bomber",
        faction: "mafia",
        description: "If you die, you take one player of your choice down \
                      with you.",
    },
];

fn find(role_name: &str) -> Option<&'static CatalogEntry> {
    let trimmed = role_name.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(entry) = CATALOG.iter().find(|e| e.name == trimmed) {
        return Some(entry);
    }
    if let Some(entry) = CATALOG
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(trimmed))
    {
        return Some(entry);
    }
    let lower = trimmed.to_ascii_lowercase();
    CATALOG.iter().find(|e| {
        let known = e.name.to_ascii_lowercase();
        lower.contains(&known) || known.contains(&lower)
    })
}

pub fn describe(role_name: &str) -> String {
    match find(role_name) {
        Some(entry) => entry.description.to_string(),
        None if role_name.trim().is_empty() => "No role assigned yet.".to_string(),
        None => format!(
            "You are a {}. No specific description available for this role.",
            role_name
        ),
    }
}

/// Catalog faction lookup, used when the host did not declare a faction for
/// a configured role.
pub fn faction_for(role_name: &str) -> Option<&'static str> {
    find(role_name).map(|e| e.faction)
}
