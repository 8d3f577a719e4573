use rusty_teesheet::model::{
    GuestRecord, MemberRecord, Sex, StoredGroup, StoredTeeSheet, known_player_ids,
    players_from_stored, resolve_roster,
};
use std::collections::HashMap;

fn members() -> Vec<MemberRecord> {
    vec![
        MemberRecord {
            member_id: 1,
            name: "Arthur Price".to_string(),
            handicap_index: Some(18.4),
            sex: Some(Sex::Male),
        },
        MemberRecord {
            member_id: 2,
            name: "Beth Calloway".to_string(),
            handicap_index: Some(11.2),
            sex: Some(Sex::Female),
        },
    ]
}

fn guests() -> Vec<GuestRecord> {
    vec![
        GuestRecord {
            guest_id: 1,
            name: "Evan Sato".to_string(),
            handicap_index: Some(24.8),
            sex: Some(Sex::Male),
            included: true,
        },
        GuestRecord {
            guest_id: 2,
            name: "Fay Ng".to_string(),
            handicap_index: Some(15.0),
            sex: Some(Sex::Female),
            included: false,
        },
    ]
}

#[test]
fn test2_members_then_included_guests_in_order() {
    let roster = resolve_roster(&[1, 2], &members(), &guests());
    let ids: Vec<&str> = roster.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2", "g1"]);
    assert!(!roster[0].is_guest);
    assert!(roster[2].is_guest);
}

#[test]
fn test2_unknown_member_id_silently_excluded() {
    let roster = resolve_roster(&[1, 99, 2], &members(), &[]);
    let ids: Vec<&str> = roster.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2"]);
}

#[test]
fn test2_excluded_guest_never_appears() {
    let roster = resolve_roster(&[], &members(), &guests());
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, "g1");
}

#[test]
fn test2_duplicate_selection_first_wins() {
    let roster = resolve_roster(&[2, 1, 2, 2], &members(), &[]);
    let ids: Vec<&str> = roster.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["m2", "m1"]);
}

#[test]
fn test2_empty_inputs_produce_empty_roster() {
    assert!(resolve_roster(&[], &[], &[]).is_empty());
}

#[test]
fn test2_known_ids_span_both_tables() {
    let known = known_player_ids(&members(), &guests());
    assert!(known.contains("m1"));
    assert!(known.contains("m2"));
    assert!(known.contains("g1"));
    // excluded guests still have a row, so their id is still valid
    assert!(known.contains("g2"));
    assert!(!known.contains("m3"));
}

#[test]
fn test2_stored_rehydration_drops_unknown_ids() {
    let stored = StoredTeeSheet {
        start_time: "2025-05-10T08:00:00".parse().unwrap(),
        interval_minutes: 10,
        groups: vec![
            StoredGroup {
                time_iso: "2025-05-10T08:00:00".to_string(),
                player_ids: vec!["m1".to_string(), "m999".to_string()],
            },
            StoredGroup {
                time_iso: "2025-05-10T08:10:00".to_string(),
                player_ids: vec!["g1".to_string(), "bogus".to_string()],
            },
        ],
        handicaps: HashMap::new(),
    };

    let grouped = players_from_stored(&stored, &members(), &guests());
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].len(), 1);
    assert_eq!(grouped[0][0].id, "m1");
    assert_eq!(grouped[1].len(), 1);
    assert_eq!(grouped[1][0].id, "g1");
}
