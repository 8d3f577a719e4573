use ahash::RandomState;
use std::collections::HashSet;

use crate::model::types::{PlayerRef, Sex, StoredTeeSheet};

/// A club member row. Members persist across events; selection for a given
/// event goes through the `event_member` join.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub member_id: i64,
    pub name: String,
    pub handicap_index: Option<f64>,
    pub sex: Option<Sex>,
}

impl MemberRecord {
    #[must_use]
    pub fn player_ref(&self) -> PlayerRef {
        PlayerRef {
            id: format!("m{}", self.member_id),
            name: self.name.clone(),
            is_guest: false,
            handicap_index: self.handicap_index,
            sex: self.sex,
        }
    }
}

/// A guest row, scoped to one event. An excluded guest keeps its row (and so
/// its id stays valid) but never enters a roster.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestRecord {
    pub guest_id: i64,
    pub name: String,
    pub handicap_index: Option<f64>,
    pub sex: Option<Sex>,
    pub included: bool,
}

impl GuestRecord {
    #[must_use]
    pub fn player_ref(&self) -> PlayerRef {
        PlayerRef {
            id: format!("g{}", self.guest_id),
            name: self.name.clone(),
            is_guest: true,
            handicap_index: self.handicap_index,
            sex: self.sex,
        }
    }
}

/// Flatten the event's selections into one roster: selected members in
/// selection order, then included guests. A selected id with no member row is
/// silently excluded, and a duplicate selection keeps its first position.
#[must_use]
pub fn resolve_roster(
    selected_member_ids: &[i64],
    members: &[MemberRecord],
    guests: &[GuestRecord],
) -> Vec<PlayerRef> {
    let mut roster = Vec::new();
    let mut seen: HashSet<i64, RandomState> = HashSet::default();
    for &member_id in selected_member_ids {
        if !seen.insert(member_id) {
            continue;
        }
        if let Some(member) = members.iter().find(|m| m.member_id == member_id) {
            roster.push(member.player_ref());
        }
    }
    for guest in guests.iter().filter(|g| g.included) {
        roster.push(guest.player_ref());
    }
    roster
}

/// Every namespaced id with a backing row, included or not. Saves filter
/// against this set.
#[must_use]
pub fn known_player_ids(
    members: &[MemberRecord],
    guests: &[GuestRecord],
) -> HashSet<String, RandomState> {
    members
        .iter()
        .map(|m| format!("m{}", m.member_id))
        .chain(guests.iter().map(|g| format!("g{}", g.guest_id)))
        .collect()
}

fn lookup_player(
    id: &str,
    members: &[MemberRecord],
    guests: &[GuestRecord],
) -> Option<PlayerRef> {
    if let Some(n) = id.strip_prefix('m') {
        let member_id: i64 = n.parse().ok()?;
        return members
            .iter()
            .find(|m| m.member_id == member_id)
            .map(MemberRecord::player_ref);
    }
    if let Some(n) = id.strip_prefix('g') {
        let guest_id: i64 = n.parse().ok()?;
        return guests
            .iter()
            .find(|g| g.guest_id == guest_id)
            .map(GuestRecord::player_ref);
    }
    None
}

/// Rehydrate the players of a stored sheet from the current tables, group by
/// group. Ids that no longer resolve drop out; group positions otherwise keep
/// their stored order.
#[must_use]
pub fn players_from_stored(
    stored: &StoredTeeSheet,
    members: &[MemberRecord],
    guests: &[GuestRecord],
) -> Vec<Vec<PlayerRef>> {
    stored
        .groups
        .iter()
        .map(|group| {
            group
                .player_ids
                .iter()
                .filter_map(|id| lookup_player(id, members, guests))
                .collect()
        })
        .collect()
}
