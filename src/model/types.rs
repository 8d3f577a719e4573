use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tee group never holds more than a 4-ball.
pub const MAX_GROUP_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// # Errors
    ///
    /// Will return `Err` if the input is not `male` or `female`
    pub fn parse(input: &str) -> Result<Self, String> {
        match input.trim().to_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(format!("unrecognized sex '{other}'")),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// One player on the sheet, member or guest, identified by a namespaced id
/// (`m<n>` for members, `g<n>` for guests) so the two tables never collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: String,
    pub name: String,
    pub is_guest: bool,
    pub handicap_index: Option<f64>,
    pub sex: Option<Sex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeeGroup {
    pub id: i64,
    pub time: NaiveDateTime,
    pub players: Vec<PlayerRef>,
}

impl TeeGroup {
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_GROUP_SIZE
    }
}

/// The in-memory tee sheet the generator produces and the editor mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeeSheet {
    pub start_time: NaiveDateTime,
    pub interval_minutes: i64,
    pub groups: Vec<TeeGroup>,
}

impl TeeSheet {
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.groups.iter().map(|g| g.players.len()).sum()
    }

    #[must_use]
    pub fn group(&self, group_id: i64) -> Option<&TeeGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_mut(&mut self, group_id: i64) -> Option<&mut TeeGroup> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }
}

/// The wire/durable shape of one group: a tee time and the player ids in
/// tee-off order. Player attributes are rehydrated from the tables on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredGroup {
    pub time_iso: String,
    pub player_ids: Vec<String>,
}

/// The durable shape of a saved sheet, including the playing-handicap
/// snapshot taken at save time. A `None` entry means the value could not be
/// computed and must display as a placeholder, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTeeSheet {
    pub start_time: NaiveDateTime,
    pub interval_minutes: i64,
    pub groups: Vec<StoredGroup>,
    pub handicaps: HashMap<String, Option<i32>>,
}

impl StoredTeeSheet {
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.groups.iter().map(|g| g.player_ids.len()).sum()
    }
}

/// Outcome of a save: what was written and whether the verify read agreed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveReport {
    pub verified: bool,
    pub saved_group_count: usize,
    pub saved_player_count: usize,
}
