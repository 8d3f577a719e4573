mod common;

use async_trait::async_trait;
use rusty_teesheet::CoreError;
use rusty_teesheet::controller::editor::EditSession;
use rusty_teesheet::controller::generate::generate_for_event;
use rusty_teesheet::controller::save::save_tee_sheet;
use rusty_teesheet::model::{
    EventConfig, GuestRecord, MemberRecord, PlayerRef, Sex, StoredTeeSheet, TeeGroup,
};
use rusty_teesheet::storage::{SqlStorage, Storage, StorageError};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test6_save_verify_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(include_str!("fixtures/event1.sql")).await?;

    let sheet = generate_for_event(&ctx.storage, 1).await?;
    let mut session = EditSession::new(sheet);
    assert!(session.is_dirty());

    let cancel = CancellationToken::new();
    let report = save_tee_sheet(&ctx.storage, 1, &mut session, &cancel).await?;

    assert!(report.verified);
    assert_eq!(report.saved_group_count, 2);
    assert_eq!(report.saved_player_count, 5);
    assert!(!session.is_dirty());

    let stored = ctx.storage.load_tee_sheet(1).await?.expect("sheet saved");
    assert_eq!(stored.groups.len(), 2);
    assert_eq!(stored.player_count(), 5);
    assert_eq!(stored.interval_minutes, 10);

    // the playing-handicap snapshot is computed at save time; Dana has no
    // handicap index, so that entry survives as null rather than zero
    assert_eq!(stored.handicaps.get("m1"), Some(&Some(22)));
    assert_eq!(stored.handicaps.get("g1"), Some(&Some(29)));
    assert_eq!(stored.handicaps.get("m4"), Some(&None));

    // an edit after a verified save makes the sheet dirty again
    let first_group = session.sheet().groups[0].id;
    let second_group = session.sheet().groups[1].id;
    let moved = session.sheet().groups[1].players[0].id.clone();
    session
        .move_player(
            &moved,
            rusty_teesheet::GroupSlot::Group(second_group),
            rusty_teesheet::GroupSlot::Group(first_group),
        )
        .unwrap();
    assert!(session.is_dirty());

    Ok(())
}

#[tokio::test]
async fn test6_stale_ids_filtered_from_save() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(include_str!("fixtures/event1.sql")).await?;

    let mut sheet = generate_for_event(&ctx.storage, 1).await?;
    sheet.groups[0].players.push(PlayerRef {
        id: "m999".to_string(),
        name: "Deleted Member".to_string(),
        is_guest: false,
        handicap_index: Some(9.0),
        sex: Some(Sex::Male),
    });
    let mut session = EditSession::new(sheet);

    let cancel = CancellationToken::new();
    let report = save_tee_sheet(&ctx.storage, 1, &mut session, &cancel).await?;

    assert!(report.verified);
    assert_eq!(report.saved_player_count, 5);

    let stored = ctx.storage.load_tee_sheet(1).await?.expect("sheet saved");
    assert!(
        stored
            .groups
            .iter()
            .all(|g| !g.player_ids.contains(&"m999".to_string()))
    );
    assert!(!stored.handicaps.contains_key("m999"));

    // the in-memory sheet still holds the stale id, so it stays dirty
    assert!(session.is_dirty());
    Ok(())
}

#[tokio::test]
async fn test6_zero_player_save_fails_fast() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(include_str!("fixtures/event1.sql")).await?;

    let mut sheet = generate_for_event(&ctx.storage, 1).await?;
    for group in &mut sheet.groups {
        for player in &mut group.players {
            player.id = format!("m9{}", player.id);
        }
    }
    let mut session = EditSession::new(sheet);

    let cancel = CancellationToken::new();
    let result = save_tee_sheet(&ctx.storage, 1, &mut session, &cancel).await;

    match result {
        Err(CoreError::InvalidInput(msg)) => {
            assert_eq!(msg, "No valid players in tee sheet");
        }
        other => panic!("expected fast failure, got {other:?}"),
    }

    // storage was never contacted with a write
    assert!(ctx.storage.load_tee_sheet(1).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test6_cancelled_before_write_leaves_storage_untouched()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(include_str!("fixtures/event1.sql")).await?;

    let sheet = generate_for_event(&ctx.storage, 1).await?;
    let mut session = EditSession::new(sheet);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = save_tee_sheet(&ctx.storage, 1, &mut session, &cancel).await;

    assert!(result.is_err());
    assert!(session.is_dirty());
    assert!(ctx.storage.load_tee_sheet(1).await?.is_none());
    Ok(())
}

/// Storage whose verify read never sees the write, standing in for a store
/// that acked but did not land the record.
struct AmnesiacStorage {
    inner: SqlStorage,
}

#[async_trait]
impl Storage for AmnesiacStorage {
    async fn get_event_config(&self, event_id: i64) -> Result<EventConfig, StorageError> {
        self.inner.get_event_config(event_id).await
    }

    async fn get_members(&self, event_id: i64) -> Result<Vec<MemberRecord>, StorageError> {
        self.inner.get_members(event_id).await
    }

    async fn get_guests(&self, event_id: i64) -> Result<Vec<GuestRecord>, StorageError> {
        self.inner.get_guests(event_id).await
    }

    async fn store_tee_sheet(
        &self,
        event_id: i64,
        sheet: &StoredTeeSheet,
    ) -> Result<(), StorageError> {
        self.inner.store_tee_sheet(event_id, sheet).await
    }

    async fn load_tee_sheet(&self, _event_id: i64) -> Result<Option<StoredTeeSheet>, StorageError> {
        Ok(None)
    }
}

#[tokio::test]
async fn test6_verify_mismatch_reported_not_errored() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(include_str!("fixtures/event1.sql")).await?;
    let storage = AmnesiacStorage {
        inner: ctx.storage.clone(),
    };

    let sheet = generate_for_event(&storage, 1).await?;
    let mut session = EditSession::new(sheet);

    let cancel = CancellationToken::new();
    let report = save_tee_sheet(&storage, 1, &mut session, &cancel).await?;

    // the write succeeded but the re-read saw nothing: success without
    // verification, and the caller owns the retry decision
    assert!(!report.verified);
    assert_eq!(report.saved_group_count, 2);
    assert_eq!(report.saved_player_count, 5);
    assert!(session.is_dirty());

    // the underlying store actually has the record
    assert!(ctx.storage.load_tee_sheet(1).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test6_empty_group_survives_save() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(include_str!("fixtures/event1.sql")).await?;

    let mut sheet = generate_for_event(&ctx.storage, 1).await?;
    let next_id = sheet.groups.iter().map(|g| g.id).max().unwrap_or(0) + 1;
    let last_time = sheet.groups.last().map(|g| g.time).unwrap();
    sheet.groups.push(TeeGroup {
        id: next_id,
        time: last_time + chrono::Duration::minutes(10),
        players: Vec::new(),
    });
    let mut session = EditSession::new(sheet);

    let cancel = CancellationToken::new();
    let report = save_tee_sheet(&ctx.storage, 1, &mut session, &cancel).await?;

    assert!(report.verified);
    assert_eq!(report.saved_group_count, 3);
    assert_eq!(report.saved_player_count, 5);
    Ok(())
}
