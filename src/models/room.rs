use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::chat::ChatLog;
use super::night::{ActionKind, NightLedger, NightOutcome, NIGHT_STEPS};
use super::player::Player;
use super::role::RoleId;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lobby,
    Night,
    Day,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Lobby => "lobby",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Finished => "finished",
        };
        write!(f, "{}", s)
    }
}

/// The winning coalition. Serialized lowercase on the wire.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Mafia,
    Villagers,
}

/// One entry of the host's configured role quota.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleSlot {
    pub name: String,
    pub count: usize,
    /// Host-declared faction; empty/None falls back to the catalog.
    #[serde(default)]
    pub faction: Option<String>,
}

/// Summary of the latest lynch, surfaced to clients after a day elimination.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DayEvents {
    pub lynched: Option<String>,
    pub chained_kill: Option<String>,
    pub notes: Vec<String>,
}

/// One game instance. All game state lives here; the store owns the map of
/// rooms and every mutation happens under the store lock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub phase: Phase,
    /// Index into `NIGHT_STEPS`; equal to the sequence length once every
    /// step has been passed. Meaningful only while `phase == Night`.
    pub night_step: usize,
    pub players: Vec<Player>,
    pub roles: Vec<RoleSlot>,
    /// Player name -> assigned role-instance name. Populated once per game
    /// start, cleared on restart.
    pub assignments: HashMap<String, String>,
    /// Player name -> faction, derived at assignment time.
    pub assignment_factions: HashMap<String, String>,
    pub eliminated_players: Vec<String>,
    pub night: NightLedger,
    /// Private per-player results (an investigator's last finding),
    /// persisted until overwritten.
    pub night_reports: HashMap<String, String>,
    pub last_night_events: Option<NightOutcome>,
    pub last_day_events: Option<DayEvents>,
    pub game_started: bool,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub chat: ChatLog,
    pub created_at: DateTime<Utc>,
    pub last_host_activity: DateTime<Utc>,
}

impl Room {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Room {
            name,
            phase: Phase::Lobby,
            night_step: 0,
            players: Vec::new(),
            roles: Vec::new(),
            assignments: HashMap::new(),
            assignment_factions: HashMap::new(),
            eliminated_players: Vec::new(),
            night: NightLedger::new(),
            night_reports: HashMap::new(),
            last_night_events: None,
            last_day_events: None,
            game_started: false,
            game_over: false,
            winner: None,
            chat: ChatLog::new(),
            created_at: now,
            last_host_activity: now,
        }
    }

    /// Refreshes the inactivity clock; called on every host-driven request.
    pub fn touch(&mut self) {
        self.last_host_activity = Utc::now();
    }

    pub fn is_expired(&self, ttl_seconds: i64) -> bool {
        (Utc::now() - self.last_host_activity).num_seconds() > ttl_seconds
    }

    pub fn find_player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name_matches(name))
    }

    pub fn player_by_device(&self, device_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.device_id == device_id)
    }

    pub fn is_alive(&self, name: &str) -> bool {
        self.find_player(name).is_some()
            && !self
                .eliminated_players
                .iter()
                .any(|e| e.eq_ignore_ascii_case(name))
    }

    pub fn alive_players(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| self.is_alive(&p.name))
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn role_of(&self, name: &str) -> Option<&str> {
        self.assignments.get(name).map(|r| r.as_str())
    }

    pub fn role_id_of(&self, name: &str) -> Option<RoleId> {
        self.role_of(name).map(RoleId::classify)
    }

    pub fn faction_of(&self, name: &str) -> &str {
        self.assignment_factions
            .get(name)
            .map(|f| f.as_str())
            .unwrap_or("")
    }

    /// Appends to `eliminated_players`, never double-adding.
    pub fn eliminate(&mut self, name: &str) {
        if !self
            .eliminated_players
            .iter()
            .any(|e| e.eq_ignore_ascii_case(name))
        {
            self.eliminated_players.push(name.to_string());
        }
    }

    pub fn quota_total(&self) -> usize {
        self.roles.iter().map(|r| r.count).sum()
    }

    /// The action kind expected at the current night step, if the night is
    /// not yet exhausted.
    pub fn current_step(&self) -> Option<ActionKind> {
        if self.phase == Phase::Night {
            NIGHT_STEPS.get(self.night_step).copied()
        } else {
            None
        }
    }

    /// Clears per-game state but retains the player roster and role quota.
    pub fn reset_game(&mut self) {
        self.phase = Phase::Lobby;
        self.night_step = 0;
        self.assignments.clear();
        self.assignment_factions.clear();
        self.eliminated_players.clear();
        self.night = NightLedger::new();
        self.night_reports.clear();
        self.last_night_events = None;
        self.last_day_events = None;
        self.game_started = false;
        self.game_over = false;
        self.winner = None;
    }
}
