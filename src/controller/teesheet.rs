use actix_web::web::{self, Data};
use actix_web::{HttpResponse, Responder};
use serde_json::json;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

use crate::controller::editor::EditSession;
use crate::controller::generate::generate_for_event;
use crate::controller::save::save_tee_sheet;
use crate::error::CoreError;
use crate::handicap::{player_course_handicap, playing_handicap};
use crate::model::roster::{GuestRecord, MemberRecord, players_from_stored, resolve_roster};
use crate::model::types::{StoredTeeSheet, TeeGroup, TeeSheet};
use crate::model::utils::parse_sql_datetime;
use crate::storage::{SqlStorage, Storage};

fn parse_event_id(query: &HashMap<String, String>) -> Result<i64, HttpResponse> {
    query
        .get("event")
        .map(|s| s.trim())
        .unwrap_or_default()
        .parse()
        .map_err(|_| HttpResponse::BadRequest().json(json!({"error": "event parameter is required"})))
}

fn error_response(e: &CoreError) -> HttpResponse {
    match e {
        CoreError::InvalidInput(_) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
        CoreError::Db(_) => HttpResponse::BadGateway().json(json!({"error": e.to_string()})),
        _ => HttpResponse::InternalServerError().json(json!({"error": e.to_string()})),
    }
}

/// `GET /teesheet?event=N` - the stored sheet, or `{"tee_sheet": null}` when
/// none has been saved yet.
pub async fn tee_sheet(
    query: web::Query<HashMap<String, String>>,
    storage: Data<SqlStorage>,
) -> impl Responder {
    let event_id = match parse_event_id(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match storage.load_tee_sheet(event_id).await {
        Ok(sheet) => HttpResponse::Ok().json(json!({"tee_sheet": sheet})),
        Err(e) => error_response(&CoreError::from(e)),
    }
}

/// `POST /teesheet/generate?event=N` - run the snake draft over the event's
/// roster and return the sheet. Nothing is persisted; that takes a save.
pub async fn generate(
    query: web::Query<HashMap<String, String>>,
    storage: Data<SqlStorage>,
) -> impl Responder {
    let event_id = match parse_event_id(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match generate_for_event(storage.get_ref(), event_id).await {
        Ok(sheet) => HttpResponse::Ok().json(sheet),
        Err(e) => error_response(&e),
    }
}

/// `POST /teesheet/save?event=N` - body is the wire-shape sheet. Stale ids
/// are filtered, the sheet is written, and the verify read's outcome comes
/// back as a `SaveReport`.
pub async fn save(
    query: web::Query<HashMap<String, String>>,
    body: web::Json<StoredTeeSheet>,
    storage: Data<SqlStorage>,
) -> impl Responder {
    let event_id = match parse_event_id(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let (members, guests) = match futures::try_join!(
        storage.get_members(event_id),
        storage.get_guests(event_id),
    ) {
        Ok(rows) => rows,
        Err(e) => return error_response(&CoreError::from(e)),
    };

    let sheet = match sheet_from_stored(&body, &members, &guests) {
        Ok(sheet) => sheet,
        Err(e) => return error_response(&e),
    };

    let mut session = EditSession::new(sheet);
    let cancel = CancellationToken::new();
    match save_tee_sheet(storage.get_ref(), event_id, &mut session, &cancel).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}

/// `GET /handicaps?event=N` - display values for the event roster. Missing
/// inputs stay null; tee-resolution assumptions ride along for the caller to
/// surface.
pub async fn handicaps(
    query: web::Query<HashMap<String, String>>,
    storage: Data<SqlStorage>,
) -> impl Responder {
    let event_id = match parse_event_id(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let loaded = futures::try_join!(
        storage.get_event_config(event_id),
        storage.get_members(event_id),
        storage.get_guests(event_id),
    );
    let (config, members, guests) = match loaded {
        Ok(rows) => rows,
        Err(e) => return error_response(&CoreError::from(e)),
    };

    let selected_ids: Vec<i64> = members.iter().map(|m| m.member_id).collect();
    let roster = resolve_roster(&selected_ids, &members, &guests);

    let mut assumptions: Vec<String> = Vec::new();
    let players: Vec<serde_json::Value> = roster
        .iter()
        .map(|player| {
            let (ch, player_assumptions) = player_course_handicap(player, &config.course);
            let ph = playing_handicap(ch, config.course.allowance_percent);
            for assumption in player_assumptions {
                let tagged = format!("{}: {assumption}", player.name);
                if !assumptions.contains(&tagged) {
                    assumptions.push(tagged);
                }
            }
            json!({
                "id": player.id,
                "name": player.name,
                "is_guest": player.is_guest,
                "course_handicap": ch,
                "playing_handicap": ph,
            })
        })
        .collect();

    HttpResponse::Ok().json(json!({
        "event": config.event_name,
        "players": players,
        "assumptions": assumptions,
    }))
}

/// Rebuild an in-memory sheet from the wire shape, resolving player ids
/// against the current tables. Unknown ids drop out here, the same filtering
/// a save would apply.
///
/// # Errors
///
/// Will return `Err` if a stored group time cannot be parsed
pub fn sheet_from_stored(
    stored: &StoredTeeSheet,
    members: &[MemberRecord],
    guests: &[GuestRecord],
) -> Result<TeeSheet, CoreError> {
    let grouped_players = players_from_stored(stored, members, guests);
    let groups = stored
        .groups
        .iter()
        .zip(grouped_players)
        .enumerate()
        .map(|(i, (group, players))| {
            Ok(TeeGroup {
                id: i64::try_from(i).unwrap_or(i64::MAX) + 1,
                time: parse_sql_datetime(&group.time_iso).map_err(CoreError::Parse)?,
                players,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(TeeSheet {
        start_time: stored.start_time,
        interval_minutes: stored.interval_minutes,
        groups,
    })
}
