use serde::{Deserialize, Serialize};

/// A participant in a room. `device_id` is the stable pairing key supplied
/// by the client layer; a rejoin from the same device resumes this identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub device_id: String,
}

impl Player {
    pub fn new(name: String, device_id: String) -> Self {
        Self { name, device_id }
    }

    /// Names are unique case-insensitively within a room.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}
