use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{
    AsyncDatabaseExecutor, ConfigAndPool, MiddlewarePoolConnection, RowValues,
};

use crate::model::course::{CourseConfig, EventConfig, TeeSetting};
use crate::model::roster::{GuestRecord, MemberRecord};
use crate::model::types::{Sex, StoredGroup, StoredTeeSheet};
use crate::model::utils::{format_sql_datetime, parse_sql_datetime};

pub fn parse_json_field<T>(
    row: &sql_middleware::middleware::CustomDbRow,
    field_name: &str,
) -> Result<T, SqlMiddlewareDbError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let json_text = row
        .get(field_name)
        .and_then(|v| v.as_text())
        .unwrap_or_default();

    serde_json::from_str(json_text).map_err(|e| {
        SqlMiddlewareDbError::Other(format!("Failed to parse {field_name} field: {e}"))
    })
}

/// # Errors
///
/// Will return `Err` if the database query fails or the event is missing
pub async fn get_event_config(
    config_and_pool: &ConfigAndPool,
    event_id: i64,
) -> Result<EventConfig, SqlMiddlewareDbError> {
    let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;

    let query = match &conn {
        MiddlewarePoolConnection::Postgres { .. } => {
            "SELECT name, start_time, interval_minutes, allowance_percent FROM event WHERE event_id = $1"
        }
        MiddlewarePoolConnection::Sqlite { .. } => {
            "SELECT name, start_time, interval_minutes, allowance_percent FROM event WHERE event_id = ?1"
        }
    };
    let res = conn
        .execute_select(query, &[RowValues::Int(event_id)])
        .await?;

    let row = res
        .results
        .first()
        .ok_or_else(|| SqlMiddlewareDbError::Other(format!("event {event_id} not found")))?;

    let event_name = row
        .get("name")
        .and_then(|v| v.as_text())
        .map(ToString::to_string)
        .ok_or(SqlMiddlewareDbError::Other("Name not found".to_string()))?;
    let start_time = row
        .get("start_time")
        .and_then(|v| v.as_text())
        .map(parse_sql_datetime)
        .transpose()
        .map_err(SqlMiddlewareDbError::Other)?
        .ok_or(SqlMiddlewareDbError::Other(
            "Start time not found".to_string(),
        ))?;
    let interval_minutes = row
        .get("interval_minutes")
        .and_then(|v| v.as_int())
        .copied()
        .ok_or(SqlMiddlewareDbError::Other(
            "Interval minutes not found".to_string(),
        ))?;
    #[allow(clippy::cast_possible_truncation)]
    let allowance_percent = row
        .get("allowance_percent")
        .and_then(|v| v.as_int())
        .copied()
        .map(|v| v as i32);

    let mut course = CourseConfig {
        male_tee: None,
        female_tee: None,
        allowance_percent,
    };

    let tee_query = match &conn {
        MiddlewarePoolConnection::Postgres { .. } => {
            "SELECT sex, tee_color, par, course_rating, slope_rating FROM course_tee WHERE event_id = $1"
        }
        MiddlewarePoolConnection::Sqlite { .. } => {
            "SELECT sex, tee_color, par, course_rating, slope_rating FROM course_tee WHERE event_id = ?1"
        }
    };
    let tee_res = conn
        .execute_select(tee_query, &[RowValues::Int(event_id)])
        .await?;

    for row in &tee_res.results {
        #[allow(clippy::cast_possible_truncation)]
        let tee = TeeSetting {
            par: row
                .get("par")
                .and_then(|v| v.as_int())
                .copied()
                .unwrap_or_default() as i32,
            course_rating: row
                .get("course_rating")
                .and_then(sql_middleware::RowValues::as_float)
                .unwrap_or_default(),
            slope_rating: row
                .get("slope_rating")
                .and_then(|v| v.as_int())
                .copied()
                .unwrap_or_default() as i32,
            tee_color: row
                .get("tee_color")
                .and_then(|v| v.as_text())
                .unwrap_or_default()
                .to_string(),
        };
        match row.get("sex").and_then(|v| v.as_text()) {
            Some("female") => course.female_tee = Some(tee),
            Some("male") => course.male_tee = Some(tee),
            _ => {}
        }
    }

    Ok(EventConfig {
        event_name,
        start_time,
        interval_minutes,
        course,
    })
}

/// Members selected for the event via the `event_member` join, in selection
/// order.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn get_selected_members(
    config_and_pool: &ConfigAndPool,
    event_id: i64,
) -> Result<Vec<MemberRecord>, SqlMiddlewareDbError> {
    let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;

    let query = match &conn {
        MiddlewarePoolConnection::Postgres { .. } => {
            "SELECT m.member_id, m.name, m.handicap_index, m.sex \
             FROM event_member AS em \
             JOIN member AS m ON m.member_id = em.member_id \
             WHERE em.event_id = $1 ORDER BY em.event_member_id"
        }
        MiddlewarePoolConnection::Sqlite { .. } => {
            "SELECT m.member_id, m.name, m.handicap_index, m.sex \
             FROM event_member AS em \
             JOIN member AS m ON m.member_id = em.member_id \
             WHERE em.event_id = ?1 ORDER BY em.event_member_id"
        }
    };
    let res = conn
        .execute_select(query, &[RowValues::Int(event_id)])
        .await?;

    Ok(res
        .results
        .iter()
        .map(|row| MemberRecord {
            member_id: row
                .get("member_id")
                .and_then(|v| v.as_int())
                .copied()
                .unwrap_or_default(),
            name: row
                .get("name")
                .and_then(|v| v.as_text())
                .unwrap_or_default()
                .to_string(),
            handicap_index: row
                .get("handicap_index")
                .and_then(sql_middleware::RowValues::as_float),
            sex: row
                .get("sex")
                .and_then(|v| v.as_text())
                .and_then(|s| Sex::parse(s).ok()),
        })
        .collect())
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn get_guests(
    config_and_pool: &ConfigAndPool,
    event_id: i64,
) -> Result<Vec<GuestRecord>, SqlMiddlewareDbError> {
    let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;

    let query = match &conn {
        MiddlewarePoolConnection::Postgres { .. } => {
            "SELECT guest_id, name, handicap_index, sex, included FROM guest WHERE event_id = $1 ORDER BY guest_id"
        }
        MiddlewarePoolConnection::Sqlite { .. } => {
            "SELECT guest_id, name, handicap_index, sex, included FROM guest WHERE event_id = ?1 ORDER BY guest_id"
        }
    };
    let res = conn
        .execute_select(query, &[RowValues::Int(event_id)])
        .await?;

    Ok(res
        .results
        .iter()
        .map(|row| GuestRecord {
            guest_id: row
                .get("guest_id")
                .and_then(|v| v.as_int())
                .copied()
                .unwrap_or_default(),
            name: row
                .get("name")
                .and_then(|v| v.as_text())
                .unwrap_or_default()
                .to_string(),
            handicap_index: row
                .get("handicap_index")
                .and_then(sql_middleware::RowValues::as_float),
            sex: row
                .get("sex")
                .and_then(|v| v.as_text())
                .and_then(|s| Sex::parse(s).ok()),
            included: row
                .get("included")
                .and_then(|v| v.as_int())
                .copied()
                .unwrap_or_default()
                != 0,
        })
        .collect())
}

/// Upsert the per-event tee sheet row. Groups and the handicap snapshot are
/// stored as JSON TEXT columns.
///
/// # Errors
///
/// Will return `Err` if serialization or the database write fails
pub async fn store_tee_sheet_in_db(
    config_and_pool: &ConfigAndPool,
    event_id: i64,
    sheet: &StoredTeeSheet,
) -> Result<(), SqlMiddlewareDbError> {
    let groups_json = serde_json::to_string(&sheet.groups)
        .map_err(|e| SqlMiddlewareDbError::Other(format!("Failed to serialize groups: {e}")))?;
    let handicaps_json = serde_json::to_string(&sheet.handicaps)
        .map_err(|e| SqlMiddlewareDbError::Other(format!("Failed to serialize handicaps: {e}")))?;

    let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;

    let query = match &conn {
        MiddlewarePoolConnection::Postgres { .. } => {
            "INSERT INTO tee_sheet (event_id, start_time, interval_minutes, groups_json, handicaps_json) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (event_id) DO UPDATE SET \
             start_time = excluded.start_time, interval_minutes = excluded.interval_minutes, \
             groups_json = excluded.groups_json, handicaps_json = excluded.handicaps_json"
        }
        MiddlewarePoolConnection::Sqlite { .. } => {
            "INSERT INTO tee_sheet (event_id, start_time, interval_minutes, groups_json, handicaps_json) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT (event_id) DO UPDATE SET \
             start_time = excluded.start_time, interval_minutes = excluded.interval_minutes, \
             groups_json = excluded.groups_json, handicaps_json = excluded.handicaps_json"
        }
    };
    let params = vec![
        RowValues::Int(event_id),
        RowValues::Text(format_sql_datetime(sheet.start_time)),
        RowValues::Int(sheet.interval_minutes),
        RowValues::Text(groups_json),
        RowValues::Text(handicaps_json),
    ];
    conn.execute_dml(query, &params).await?;
    Ok(())
}

/// # Errors
///
/// Will return `Err` if the database query fails or a stored column cannot be
/// decoded
pub async fn load_tee_sheet_from_db(
    config_and_pool: &ConfigAndPool,
    event_id: i64,
) -> Result<Option<StoredTeeSheet>, SqlMiddlewareDbError> {
    let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;

    let query = match &conn {
        MiddlewarePoolConnection::Postgres { .. } => {
            "SELECT start_time, interval_minutes, groups_json, handicaps_json FROM tee_sheet WHERE event_id = $1"
        }
        MiddlewarePoolConnection::Sqlite { .. } => {
            "SELECT start_time, interval_minutes, groups_json, handicaps_json FROM tee_sheet WHERE event_id = ?1"
        }
    };
    let res = conn
        .execute_select(query, &[RowValues::Int(event_id)])
        .await?;

    let Some(row) = res.results.first() else {
        return Ok(None);
    };

    let start_time = row
        .get("start_time")
        .and_then(|v| v.as_text())
        .map(parse_sql_datetime)
        .transpose()
        .map_err(SqlMiddlewareDbError::Other)?
        .ok_or(SqlMiddlewareDbError::Other(
            "Start time not found".to_string(),
        ))?;
    let interval_minutes = row
        .get("interval_minutes")
        .and_then(|v| v.as_int())
        .copied()
        .unwrap_or_default();
    let groups: Vec<StoredGroup> = parse_json_field(row, "groups_json")?;
    let handicaps = parse_json_field(row, "handicaps_json")?;

    Ok(Some(StoredTeeSheet {
        start_time,
        interval_minutes,
        groups,
        handicaps,
    }))
}
