use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Every kind of night submission the ledger accepts. Serialized names match
/// the wire keys clients send (`action` field of the night-action request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    MafiaFinal,
    Frame,
    Check,
    DoctorSave,
    BodyguardSave,
    VigilanteKill,
    SheriffMute,
    SuicideTarget,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::MafiaFinal => "mafia_final",
            ActionKind::Frame => "frame",
            ActionKind::Check => "check",
            ActionKind::DoctorSave => "doctor_save",
            ActionKind::BodyguardSave => "bodyguard_save",
            ActionKind::VigilanteKill => "vigilante_kill",
            ActionKind::SheriffMute => "sheriff_mute",
            ActionKind::SuicideTarget => "suicide_target",
        };
        write!(f, "{}", s)
    }
}

/// Ordered night step sequence. `suicide_target` is deliberately absent: the
/// bomber pre-submits it at any step and it never gates auto-advance.
pub const NIGHT_STEPS: [ActionKind; 7] = [
    ActionKind::MafiaFinal,
    ActionKind::Frame,
    ActionKind::Check,
    ActionKind::DoctorSave,
    ActionKind::BodyguardSave,
    ActionKind::VigilanteKill,
    ActionKind::SheriffMute,
];

/// One ledger slot. `Acted(None)` is an explicit "do nothing" and still
/// counts as having acted for step-advancement purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Submission {
    NotActed,
    Acted(Option<String>),
}

impl Submission {
    pub fn target(&self) -> Option<&str> {
        match self {
            Submission::Acted(Some(t)) => Some(t.as_str()),
            _ => None,
        }
    }
}

/// Per-night record of submitted actions. Reset every time night starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NightLedger {
    entries: HashMap<ActionKind, Submission>,
    /// Which player submitted each kind; needed for the suicide chain and
    /// for private check reports.
    actors: HashMap<ActionKind, String>,
    /// The single player authorized to submit `mafia_final` tonight.
    pub finalizer: Option<String>,
}

impl NightLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a submission, overwriting any earlier one for the same kind.
    pub fn record(&mut self, kind: ActionKind, actor: &str, target: Option<String>) {
        self.entries.insert(kind, Submission::Acted(target));
        self.actors.insert(kind, actor.to_string());
    }

    /// Key presence, not value, signals "this role acted".
    pub fn acted(&self, kind: ActionKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn target(&self, kind: ActionKind) -> Option<&str> {
        self.entries.get(&kind).and_then(|s| s.target())
    }

    pub fn actor(&self, kind: ActionKind) -> Option<&str> {
        self.actors.get(&kind).map(|s| s.as_str())
    }
}

/// Outcome of one night resolution, surfaced to clients after `start_day`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NightOutcome {
    pub killed: Vec<String>,
    pub saved: Vec<String>,
    pub muted: Option<String>,
    pub checks: Vec<CheckResult>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub investigator: String,
    pub target: String,
    pub revealed: String,
}
