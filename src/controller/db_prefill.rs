use serde_json::Value;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{
    AsyncDatabaseExecutor, ConfigAndPool, DatabaseType, RowValues,
};

/// Seed events, tees, members, guests, and selections from the validated
/// `--db-populate-json` document. An event already present in the db is
/// skipped wholesale, so re-running at startup is harmless.
///
/// # Errors
///
/// Will return `Err` if a statement fails or the json references missing data
pub async fn db_prefill(
    json: &Value,
    config_and_pool: &ConfigAndPool,
    db_type: DatabaseType,
) -> Result<(), SqlMiddlewareDbError> {
    let events = json
        .as_array()
        .ok_or_else(|| SqlMiddlewareDbError::Other("prefill json must be an array".to_string()))?;

    let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;

    let pick = |sqlite: &'static str, postgres: &'static str| -> &'static str {
        if db_type == DatabaseType::Postgres {
            postgres
        } else {
            sqlite
        }
    };

    for entry in events {
        let event_id = entry["event"]
            .as_i64()
            .ok_or_else(|| SqlMiddlewareDbError::Other("prefill event id missing".to_string()))?;

        let existing = conn
            .execute_select(
                pick(
                    "SELECT event_id FROM event WHERE event_id = ?1;",
                    "SELECT event_id FROM event WHERE event_id = $1;",
                ),
                &[RowValues::Int(event_id)],
            )
            .await?;
        if !existing.results.is_empty() {
            println!("Event {event_id} already exists in the db. Skipping db prefill.");
            continue;
        }

        let name = entry["name"].as_str().unwrap_or_default().to_string();
        let start_time = entry["start_time"].as_str().unwrap_or_default().to_string();
        let interval_minutes = entry["interval_minutes"].as_i64().unwrap_or(10);

        conn.execute_dml(
            pick(
                "INSERT INTO event (event_id, name, start_time, interval_minutes) VALUES (?1, ?2, ?3, ?4);",
                "INSERT INTO event (event_id, name, start_time, interval_minutes) VALUES ($1, $2, $3, $4);",
            ),
            &[
                RowValues::Int(event_id),
                RowValues::Text(name),
                RowValues::Text(start_time),
                RowValues::Int(interval_minutes),
            ],
        )
        .await?;

        if let Some(allowance) = entry["allowance_percent"].as_i64() {
            conn.execute_dml(
                pick(
                    "UPDATE event SET allowance_percent = ?1 WHERE event_id = ?2;",
                    "UPDATE event SET allowance_percent = $1 WHERE event_id = $2;",
                ),
                &[RowValues::Int(allowance), RowValues::Int(event_id)],
            )
            .await?;
        }

        for tee in entry["tees"].as_array().map_or(&[][..], Vec::as_slice) {
            conn.execute_dml(
                pick(
                    "INSERT INTO course_tee (event_id, sex, tee_color, par, course_rating, slope_rating) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                    "INSERT INTO course_tee (event_id, sex, tee_color, par, course_rating, slope_rating) \
                     VALUES ($1, $2, $3, $4, $5, $6);",
                ),
                &[
                    RowValues::Int(event_id),
                    RowValues::Text(tee["sex"].as_str().unwrap_or_default().to_string()),
                    RowValues::Text(tee["tee_color"].as_str().unwrap_or_default().to_string()),
                    RowValues::Int(tee["par"].as_i64().unwrap_or_default()),
                    RowValues::Float(tee["course_rating"].as_f64().unwrap_or_default()),
                    RowValues::Int(tee["slope_rating"].as_i64().unwrap_or_default()),
                ],
            )
            .await?;
        }

        for data in entry["data_to_fill_if_event_missing"]
            .as_array()
            .map_or(&[][..], Vec::as_slice)
        {
            for member in data["members"].as_array().map_or(&[][..], Vec::as_slice) {
                let member_name = member["name"].as_str().unwrap_or_default().to_string();
                conn.execute_dml(
                    pick(
                        "INSERT INTO member (name) SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM member WHERE name = ?1);",
                        "INSERT INTO member (name) SELECT $1 WHERE NOT EXISTS (SELECT 1 FROM member WHERE name = $1);",
                    ),
                    &[RowValues::Text(member_name.clone())],
                )
                .await?;
                if let Some(hi) = member["handicap_index"].as_f64() {
                    conn.execute_dml(
                        pick(
                            "UPDATE member SET handicap_index = ?1 WHERE name = ?2;",
                            "UPDATE member SET handicap_index = $1 WHERE name = $2;",
                        ),
                        &[RowValues::Float(hi), RowValues::Text(member_name.clone())],
                    )
                    .await?;
                }
                if let Some(sex) = member["sex"].as_str() {
                    conn.execute_dml(
                        pick(
                            "UPDATE member SET sex = ?1 WHERE name = ?2;",
                            "UPDATE member SET sex = $1 WHERE name = $2;",
                        ),
                        &[
                            RowValues::Text(sex.to_string()),
                            RowValues::Text(member_name.clone()),
                        ],
                    )
                    .await?;
                }
            }

            for guest in data["guests"].as_array().map_or(&[][..], Vec::as_slice) {
                let guest_name = guest["name"].as_str().unwrap_or_default().to_string();
                let included = i64::from(guest["included"].as_bool().unwrap_or(true));
                conn.execute_dml(
                    pick(
                        "INSERT INTO guest (event_id, name, included) VALUES (?1, ?2, ?3);",
                        "INSERT INTO guest (event_id, name, included) VALUES ($1, $2, $3);",
                    ),
                    &[
                        RowValues::Int(event_id),
                        RowValues::Text(guest_name.clone()),
                        RowValues::Int(included),
                    ],
                )
                .await?;
                if let Some(hi) = guest["handicap_index"].as_f64() {
                    conn.execute_dml(
                        pick(
                            "UPDATE guest SET handicap_index = ?1 WHERE event_id = ?2 AND name = ?3;",
                            "UPDATE guest SET handicap_index = $1 WHERE event_id = $2 AND name = $3;",
                        ),
                        &[
                            RowValues::Float(hi),
                            RowValues::Int(event_id),
                            RowValues::Text(guest_name.clone()),
                        ],
                    )
                    .await?;
                }
                if let Some(sex) = guest["sex"].as_str() {
                    conn.execute_dml(
                        pick(
                            "UPDATE guest SET sex = ?1 WHERE event_id = ?2 AND name = ?3;",
                            "UPDATE guest SET sex = $1 WHERE event_id = $2 AND name = $3;",
                        ),
                        &[
                            RowValues::Text(sex.to_string()),
                            RowValues::Int(event_id),
                            RowValues::Text(guest_name.clone()),
                        ],
                    )
                    .await?;
                }
            }

            for member_name in data["event_members"].as_array().map_or(&[][..], Vec::as_slice) {
                conn.execute_dml(
                    pick(
                        "INSERT INTO event_member (event_id, member_id) \
                         SELECT ?1, member_id FROM member WHERE name = ?2;",
                        "INSERT INTO event_member (event_id, member_id) \
                         SELECT $1, member_id FROM member WHERE name = $2;",
                    ),
                    &[
                        RowValues::Int(event_id),
                        RowValues::Text(member_name.as_str().unwrap_or_default().to_string()),
                    ],
                )
                .await?;
            }
        }
    }

    Ok(())
}
