use ahash::RandomState;
use chrono::Duration;
use std::collections::HashSet;

use crate::error::CoreError;
use crate::model::types::{MAX_GROUP_SIZE, PlayerRef, TeeGroup, TeeSheet};
use crate::model::utils::TimeHm;

/// Addresses a player location: a real group on the sheet, or the virtual
/// unassigned pool (no capacity limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSlot {
    Group(i64),
    Unassigned,
}

/// One editing session over one tee sheet. Owned by the caller and passed by
/// reference into each mutation; there is no hidden shared state. Every
/// operation validates fully before touching the sheet, so a rejected edit
/// leaves nothing half-applied.
#[derive(Debug, Clone)]
pub struct EditSession {
    sheet: TeeSheet,
    unassigned: Vec<PlayerRef>,
    saved_signature: Option<String>,
    dirty: bool,
}

impl EditSession {
    /// Start a session over a freshly generated (unsaved) sheet.
    #[must_use]
    pub fn new(sheet: TeeSheet) -> Self {
        EditSession {
            sheet,
            unassigned: Vec::new(),
            saved_signature: None,
            dirty: true,
        }
    }

    /// Resume a session over a sheet that matches the durable copy.
    #[must_use]
    pub fn resume_saved(sheet: TeeSheet) -> Self {
        let signature = group_signature(&sheet);
        EditSession {
            sheet,
            unassigned: Vec::new(),
            saved_signature: Some(signature),
            dirty: false,
        }
    }

    #[must_use]
    pub fn sheet(&self) -> &TeeSheet {
        &self.sheet
    }

    #[must_use]
    pub fn unassigned(&self) -> &[PlayerRef] {
        &self.unassigned
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current group layout matches the durable copy.
    pub fn mark_saved(&mut self) {
        self.saved_signature = Some(group_signature(&self.sheet));
        self.refresh_dirty();
    }

    /// Record the signature a (possibly filtered) save actually wrote. If the
    /// saved shape differs from the in-memory sheet, dirty stays set.
    pub fn mark_saved_signature(&mut self, signature: String) {
        self.saved_signature = Some(signature);
        self.refresh_dirty();
    }

    /// Move a player between groups or to/from the unassigned pool.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the player is not in `from`, the destination is
    /// full, or the move would duplicate an id; the sheet is unchanged.
    pub fn move_player(
        &mut self,
        player_id: &str,
        from: GroupSlot,
        to: GroupSlot,
    ) -> Result<(), CoreError> {
        if from == to {
            return Err(CoreError::InvalidInput(format!(
                "player {player_id} is already there"
            )));
        }
        self.slot_position(from, player_id)?.ok_or_else(|| {
            CoreError::InvalidInput(format!("player {player_id} not found in source group"))
        })?;
        if let GroupSlot::Group(to_id) = to {
            let dest = self.group(to_id)?;
            if dest.is_full() {
                return Err(CoreError::InvalidInput(format!(
                    "group {to_id} already has {MAX_GROUP_SIZE} players"
                )));
            }
            if dest.players.iter().any(|p| p.id == player_id) {
                return Err(CoreError::InvalidInput(format!(
                    "player {player_id} is already in group {to_id}"
                )));
            }
        }

        let player = self.take_player(from, player_id);
        match to {
            GroupSlot::Group(to_id) => {
                if let Some(group) = self.sheet.group_mut(to_id) {
                    group.players.push(player);
                }
            }
            GroupSlot::Unassigned => self.unassigned.push(player),
        }

        self.finish_mutation()
    }

    /// Exchange two players' memberships. Capacity is unaffected by a swap.
    ///
    /// # Errors
    ///
    /// Will return `Err` for an unknown player, a player/slot mismatch, or a
    /// self-swap; the sheet is unchanged.
    pub fn swap_players(
        &mut self,
        player_a: &str,
        slot_a: GroupSlot,
        player_b: &str,
        slot_b: GroupSlot,
    ) -> Result<(), CoreError> {
        if player_a == player_b {
            return Err(CoreError::InvalidInput(format!(
                "cannot swap player {player_a} with itself"
            )));
        }
        let pos_a = self.slot_position(slot_a, player_a)?.ok_or_else(|| {
            CoreError::InvalidInput(format!("player {player_a} not found in its group"))
        })?;
        let pos_b = self.slot_position(slot_b, player_b)?.ok_or_else(|| {
            CoreError::InvalidInput(format!("player {player_b} not found in its group"))
        })?;

        let a = self.slot_players_mut(slot_a)[pos_a].clone();
        let b = self.slot_players_mut(slot_b)[pos_b].clone();
        self.slot_players_mut(slot_a)[pos_a] = b;
        self.slot_players_mut(slot_b)[pos_b] = a;

        self.finish_mutation()
    }

    /// Move a player out of a group into the unassigned pool.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the player is not in that group.
    pub fn remove_player(&mut self, player_id: &str, group_id: i64) -> Result<(), CoreError> {
        self.move_player(player_id, GroupSlot::Group(group_id), GroupSlot::Unassigned)
    }

    /// Append a new empty group, timed one interval after the last group (or
    /// at the sheet start when no groups exist). Returns the new group id.
    pub fn add_group(&mut self) -> i64 {
        let time = self.sheet.groups.last().map_or(self.sheet.start_time, |g| {
            g.time + Duration::minutes(self.sheet.interval_minutes)
        });
        let id = self.sheet.groups.iter().map(|g| g.id).max().unwrap_or(0) + 1;
        self.sheet.groups.push(TeeGroup {
            id,
            time,
            players: Vec::new(),
        });
        self.refresh_dirty();
        id
    }

    /// Drop a group from the sequence; any players it held move to the
    /// unassigned pool. Destructive confirmation is the caller's job.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the group does not exist.
    pub fn delete_group(&mut self, group_id: i64) -> Result<(), CoreError> {
        let idx = self
            .sheet
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| CoreError::InvalidInput(format!("group {group_id} not found")))?;
        let group = self.sheet.groups.remove(idx);
        self.unassigned.extend(group.players);
        self.finish_mutation()
    }

    /// Retime one group from an `HH:MM` string, applied on the sheet's start
    /// date. Unparseable input rejects with the sheet unchanged; manual
    /// retiming is allowed to break time monotonicity.
    ///
    /// # Errors
    ///
    /// Will return `Err` on an unparseable time or unknown group.
    pub fn retime_group(&mut self, group_id: i64, time: &str) -> Result<(), CoreError> {
        let parsed = TimeHm::parse(time).map_err(CoreError::InvalidInput)?;
        let new_time = parsed.on_date(self.sheet.start_time.date());
        let group = self
            .sheet
            .group_mut(group_id)
            .ok_or_else(|| CoreError::InvalidInput(format!("group {group_id} not found")))?;
        group.time = new_time;
        self.refresh_dirty();
        Ok(())
    }

    /// Swap two positions inside one group. No capacity implication.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the group is unknown or an index is out of range.
    pub fn reorder_within_group(
        &mut self,
        group_id: i64,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), CoreError> {
        let group = self
            .sheet
            .group_mut(group_id)
            .ok_or_else(|| CoreError::InvalidInput(format!("group {group_id} not found")))?;
        let len = group.players.len();
        if from_index >= len || to_index >= len {
            return Err(CoreError::InvalidInput(format!(
                "position out of range for group {group_id} with {len} players"
            )));
        }
        group.players.swap(from_index, to_index);
        self.refresh_dirty();
        Ok(())
    }

    fn group(&self, group_id: i64) -> Result<&TeeGroup, CoreError> {
        self.sheet
            .group(group_id)
            .ok_or_else(|| CoreError::InvalidInput(format!("group {group_id} not found")))
    }

    fn slot_position(&self, slot: GroupSlot, player_id: &str) -> Result<Option<usize>, CoreError> {
        let players = match slot {
            GroupSlot::Group(group_id) => &self.group(group_id)?.players,
            GroupSlot::Unassigned => &self.unassigned,
        };
        Ok(players.iter().position(|p| p.id == player_id))
    }

    fn slot_players_mut(&mut self, slot: GroupSlot) -> &mut Vec<PlayerRef> {
        match slot {
            GroupSlot::Group(group_id) => {
                &mut self
                    .sheet
                    .group_mut(group_id)
                    .expect("slot validated before mutation")
                    .players
            }
            GroupSlot::Unassigned => &mut self.unassigned,
        }
    }

    fn take_player(&mut self, slot: GroupSlot, player_id: &str) -> PlayerRef {
        let players = self.slot_players_mut(slot);
        let idx = players
            .iter()
            .position(|p| p.id == player_id)
            .expect("slot validated before mutation");
        players.remove(idx)
    }

    /// Post-mutation sweep: a duplicate id across groups is an algorithm bug,
    /// not user error.
    fn finish_mutation(&mut self) -> Result<(), CoreError> {
        let mut seen: HashSet<&str, RandomState> = HashSet::default();
        for group in &self.sheet.groups {
            for player in &group.players {
                if !seen.insert(&player.id) {
                    return Err(CoreError::Invariant(format!(
                        "player {} appears in more than one group",
                        player.id
                    )));
                }
            }
        }
        self.refresh_dirty();
        Ok(())
    }

    fn refresh_dirty(&mut self) {
        let current = group_signature(&self.sheet);
        self.dirty = self.saved_signature.as_deref() != Some(current.as_str());
    }
}

/// Canonical serialization of the sheet's group layout: the per-group player
/// id lists, in order. This is what dirty tracking compares.
#[must_use]
pub fn group_signature(sheet: &TeeSheet) -> String {
    let ids: Vec<Vec<&str>> = sheet
        .groups
        .iter()
        .map(|g| g.players.iter().map(|p| p.id.as_str()).collect())
        .collect();
    serde_json::to_string(&ids).unwrap_or_default()
}
