use std::time::{SystemTime, UNIX_EPOCH};

use rusty_teesheet::storage::SqlStorage;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{AsyncDatabaseExecutor, ConfigAndPool};

pub struct TestContext {
    pub config_and_pool: ConfigAndPool,
    pub storage: SqlStorage,
}

pub async fn setup_test_context(fixture_sql: &str) -> Result<TestContext, SqlMiddlewareDbError> {
    let db_name = format!(
        "file:test_db_{}?mode=memory&cache=shared",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time went backwards")
            .as_nanos()
    );

    let config_and_pool = ConfigAndPool::new_sqlite(db_name).await?;

    execute_batch(
        &config_and_pool,
        include_str!("../../src/sql/schema/sqlite/00_table_drop.sql"),
    )
    .await?;

    let schema = [
        include_str!("../../src/sql/schema/sqlite/00_event.sql"),
        include_str!("../../src/sql/schema/sqlite/01_course_tee.sql"),
        include_str!("../../src/sql/schema/sqlite/02_member.sql"),
        include_str!("../../src/sql/schema/sqlite/03_guest.sql"),
        include_str!("../../src/sql/schema/sqlite/04_event_member.sql"),
        include_str!("../../src/sql/schema/sqlite/05_tee_sheet.sql"),
    ]
    .join("\n");
    execute_batch(&config_and_pool, &schema).await?;

    if !fixture_sql.is_empty() {
        execute_batch(&config_and_pool, fixture_sql).await?;
    }

    let storage = SqlStorage::new(config_and_pool.clone());

    Ok(TestContext {
        config_and_pool,
        storage,
    })
}

async fn execute_batch(
    config_and_pool: &ConfigAndPool,
    sql: &str,
) -> Result<(), SqlMiddlewareDbError> {
    let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;
    conn.execute_batch(sql).await
}
