use serde::{Deserialize, Serialize};
use std::fmt;

use super::night::ActionKind;

/// Closed set of role identities the engine understands. Hosts may configure
/// arbitrary role names; each name is classified into exactly one `RoleId`
/// (keyword containment, case-insensitive) and everything downstream keys off
/// the identity instead of re-matching strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleId {
    Godfather,
    Framer,
    Mafia,
    Investigator,
    Doctor,
    Bodyguard,
    Vigilante,
    Sheriff,
    SuicideBomber,
    Villager,
    Other,
}

impl RoleId {
    /// Most specific keyword wins; "godfather" must be tested before "mafia"
    /// and "bodyguard" before any shorter guard keyword.
    pub fn classify(role_name: &str) -> RoleId {
        let name = role_name.to_ascii_lowercase();
        if name.contains("godfather") {
            RoleId::Godfather
        } else if name.contains("framer") {
            RoleId::Framer
        } else if name.contains("suicide") || name.contains("bomber") {
            RoleId::SuicideBomber
        } else if name.contains("mafia") {
            RoleId::Mafia
        } else if name.contains("cop") || name.contains("invest") || name.contains("detective") {
            RoleId::Investigator
        } else if name.contains("doctor") || name.contains("medic") {
            RoleId::Doctor
        } else if name.contains("bodyguard") {
            RoleId::Bodyguard
        } else if name.contains("vigilante") {
            RoleId::Vigilante
        } else if name.contains("sheriff") {
            RoleId::Sheriff
        } else if name.contains("villager") {
            RoleId::Villager
        } else {
            RoleId::Other
        }
    }

    /// The night action this role is entitled to submit, if any.
    pub fn night_action(self) -> Option<ActionKind> {
        match self {
            RoleId::Godfather | RoleId::Mafia => Some(ActionKind::MafiaFinal),
            RoleId::Framer => Some(ActionKind::Frame),
            RoleId::Investigator => Some(ActionKind::Check),
            RoleId::Doctor => Some(ActionKind::DoctorSave),
            RoleId::Bodyguard => Some(ActionKind::BodyguardSave),
            RoleId::Vigilante => Some(ActionKind::VigilanteKill),
            RoleId::Sheriff => Some(ActionKind::SheriffMute),
            RoleId::SuicideBomber => Some(ActionKind::SuicideTarget),
            RoleId::Villager | RoleId::Other => None,
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoleId::Godfather => "Godfather",
            RoleId::Framer => "Framer",
            RoleId::Mafia => "Mafia",
            RoleId::Investigator => "Investigator",
            RoleId::Doctor => "Doctor",
            RoleId::Bodyguard => "Bodyguard",
            RoleId::Vigilante => "Vigilante",
            RoleId::Sheriff => "Sheriff",
            RoleId::SuicideBomber => "Suicide Bomber",
            RoleId::Villager => "Villager",
            RoleId::Other => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// Normalize a stored faction string for display and for check reveals:
/// "mafia" -> "Mafia", "villagers"/"villager" -> "Villager",
/// "neutral" -> "Neutral", "" -> "Unknown", anything else capitalized.
pub fn normalize_faction(faction: &str) -> String {
    let f = faction.trim().to_ascii_lowercase();
    match f.as_str() {
        "mafia" => "Mafia".to_string(),
        "villager" | "villagers" => "Villager".to_string(),
        "neutral" => "Neutral".to_string(),
        "" => "Unknown".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => "Unknown".to_string(),
            }
        }
    }
}

/// True if a stored faction string denotes the Mafia coalition.
pub fn is_mafia_faction(faction: &str) -> bool {
    faction.trim().eq_ignore_ascii_case("mafia")
}
