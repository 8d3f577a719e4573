use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::controller::editor::EditSession;
use crate::error::CoreError;
use crate::handicap::event_playing_handicap;
use crate::model::roster::known_player_ids;
use crate::model::types::{SaveReport, StoredGroup, StoredTeeSheet};
use crate::model::utils::format_sql_datetime;
use crate::storage::Storage;

/// Persist the session's sheet and verify the write by re-reading it.
///
/// Player ids with no backing member/guest row are silently dropped before
/// the write; a sheet that filters down to zero players fails fast without
/// touching storage. `Ok` with `verified: false` means the write landed but
/// the re-read did not match what was written; the caller must offer a
/// manual retry rather than assuming durability. The engine never retries on
/// its own.
///
/// Cancellation is best effort: the token is honored only before the write
/// leg. Once the write has been issued the verify read always runs, so a
/// partially landed write is never left unexamined.
///
/// # Errors
///
/// Will return `Err` on a zero-player sheet, a cancelled save, or a storage
/// failure on either leg.
pub async fn save_tee_sheet(
    storage: &dyn Storage,
    event_id: i64,
    session: &mut EditSession,
    cancel: &CancellationToken,
) -> Result<SaveReport, CoreError> {
    let (config, members, guests) = futures::try_join!(
        storage.get_event_config(event_id),
        storage.get_members(event_id),
        storage.get_guests(event_id),
    )?;

    let known = known_player_ids(&members, &guests);
    let sheet = session.sheet();

    let mut surviving: Vec<Vec<&crate::model::types::PlayerRef>> = Vec::new();
    for group in &sheet.groups {
        let players: Vec<_> = group
            .players
            .iter()
            .filter(|p| {
                let keep = known.contains(&p.id);
                if !keep {
                    eprintln!("Warning: dropping stale player id {} from save", p.id);
                }
                keep
            })
            .collect();
        surviving.push(players);
    }

    let player_count: usize = surviving.iter().map(Vec::len).sum();
    if player_count == 0 {
        return Err(CoreError::InvalidInput(
            "No valid players in tee sheet".to_string(),
        ));
    }

    let mut handicaps: HashMap<String, Option<i32>> = HashMap::new();
    for player in surviving.iter().flatten() {
        handicaps.insert(
            player.id.clone(),
            event_playing_handicap(player, &config.course),
        );
    }

    let stored = StoredTeeSheet {
        start_time: sheet.start_time,
        interval_minutes: sheet.interval_minutes,
        groups: sheet
            .groups
            .iter()
            .zip(&surviving)
            .map(|(group, players)| StoredGroup {
                time_iso: format_sql_datetime(group.time),
                player_ids: players.iter().map(|p| p.id.clone()).collect(),
            })
            .collect(),
        handicaps,
    };

    if cancel.is_cancelled() {
        return Err(CoreError::Other("save cancelled before write".to_string()));
    }

    let saved_group_count = stored.groups.len();
    let saved_player_count = player_count;

    storage.store_tee_sheet(event_id, &stored).await?;

    // verify leg always runs once the write is issued
    let reread = storage.load_tee_sheet(event_id).await?;
    let verified = reread
        .as_ref()
        .is_some_and(|r| r.groups.len() == saved_group_count && r.player_count() == saved_player_count);

    if verified {
        let saved_ids: Vec<&Vec<String>> = stored.groups.iter().map(|g| &g.player_ids).collect();
        let signature = serde_json::to_string(&saved_ids)?;
        session.mark_saved_signature(signature);
    }

    Ok(SaveReport {
        verified,
        saved_group_count,
        saved_player_count,
    })
}
