use chrono::{Duration, NaiveDateTime};

use crate::error::CoreError;
use crate::handicap::event_playing_handicap;
use crate::model::course::CourseConfig;
use crate::model::roster::resolve_roster;
use crate::model::types::{MAX_GROUP_SIZE, PlayerRef, TeeGroup, TeeSheet};
use crate::storage::Storage;

/// Build the initial tee sheet from a flat roster.
///
/// Highest playing handicap tees off earliest in the snake, so a descending
/// sort feeds the draft. Players with no computable handicap order as 0; the
/// value is never used for display. After the draft, groups re-sort by
/// ascending size (a short group must never follow a full 4-ball or it
/// catches up on course) and times are recomputed over the final order.
///
/// # Errors
///
/// Will return `Err` on an empty roster, or a fatal internal error if the
/// grouped player count does not match the roster size.
pub fn generate_tee_sheet(
    roster: &[PlayerRef],
    course: &CourseConfig,
    start_time: NaiveDateTime,
    interval_minutes: i64,
) -> Result<TeeSheet, CoreError> {
    if roster.is_empty() {
        return Err(CoreError::InvalidInput(
            "no players selected for tee sheet".to_string(),
        ));
    }

    let mut ranked: Vec<(PlayerRef, i32)> = roster
        .iter()
        .map(|p| (p.clone(), event_playing_handicap(p, course).unwrap_or(0)))
        .collect();
    // stable sort keeps roster order on ties
    ranked.sort_by_key(|(_, ph)| std::cmp::Reverse(*ph));

    let group_count = roster.len().div_ceil(MAX_GROUP_SIZE);
    let mut buckets: Vec<Vec<PlayerRef>> = vec![Vec::new(); group_count];

    let mut index = 0usize;
    let mut forward = true;
    for (player, _) in ranked {
        buckets[index].push(player);
        if group_count == 1 {
            continue;
        }
        if forward {
            if index + 1 == group_count {
                forward = false;
            } else {
                index += 1;
            }
        } else if index == 0 {
            forward = true;
        } else {
            index -= 1;
        }
    }

    // pacing rule: short groups out first; stable, so equal sizes keep
    // draft order
    buckets.sort_by_key(Vec::len);

    let groups: Vec<TeeGroup> = buckets
        .into_iter()
        .enumerate()
        .map(|(i, players)| TeeGroup {
            id: i64::try_from(i).unwrap_or(i64::MAX) + 1,
            time: start_time + Duration::minutes(interval_minutes * i64::try_from(i).unwrap_or(0)),
            players,
        })
        .collect();

    let sheet = TeeSheet {
        start_time,
        interval_minutes,
        groups,
    };

    if sheet.player_count() != roster.len() {
        return Err(CoreError::Invariant(format!(
            "generated sheet holds {} players but roster has {}",
            sheet.player_count(),
            roster.len()
        )));
    }

    Ok(sheet)
}

/// Orchestration entry: load the event's configuration and roster, resolve,
/// generate. Does not persist anything.
///
/// # Errors
///
/// Will return `Err` if storage fails or generation rejects the roster
pub async fn generate_for_event(
    storage: &dyn Storage,
    event_id: i64,
) -> Result<TeeSheet, CoreError> {
    let (config, members, guests) = futures::try_join!(
        storage.get_event_config(event_id),
        storage.get_members(event_id),
        storage.get_guests(event_id),
    )?;

    let selected_ids: Vec<i64> = members.iter().map(|m| m.member_id).collect();
    let roster = resolve_roster(&selected_ids, &members, &guests);

    generate_tee_sheet(
        &roster,
        &config.course,
        config.start_time,
        config.interval_minutes,
    )
}
