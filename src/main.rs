use deadpool_postgres::{ManagerConfig, RecyclingMethod};
use rusty_teesheet::args;
use rusty_teesheet::controller::{db_prefill, teesheet};
use rusty_teesheet::storage::SqlStorage;
use sql_middleware::middleware::{AsyncDatabaseExecutor, ConfigAndPool, DatabaseType};

use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, web};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::args_checks();

    let cfg = deadpool_postgres::Config::new();
    let config_and_pool: ConfigAndPool;
    let db_type: DatabaseType;
    if args.db_type == DatabaseType::Postgres {
        let mut postgres_config = cfg;
        postgres_config.dbname = Some(args.db_name);
        postgres_config.host = args.db_host;
        postgres_config.port = args.db_port;
        postgres_config.user = args.db_user;
        postgres_config.password = args.db_password;
        postgres_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        config_and_pool = ConfigAndPool::new_postgres(postgres_config).await?;
        db_type = DatabaseType::Postgres;
    } else {
        match ConfigAndPool::new_sqlite(args.db_name).await {
            Ok(pool) => {
                config_and_pool = pool;
            }
            Err(e) => {
                eprintln!(
                    "Error: {}\nBacktrace: {:?}",
                    e,
                    std::backtrace::Backtrace::capture()
                );
                std::process::exit(1);
            }
        }
        db_type = DatabaseType::Sqlite;
    }

    if args.db_startup_script.is_some() {
        let mut conn = sql_middleware::middleware::MiddlewarePool::get_connection(&config_and_pool.pool).await?;
        conn.execute_batch(&args.combined_sql_script).await?;
    }

    if let Some(json) = &args.db_populate_json {
        db_prefill::db_prefill(json, &config_and_pool, db_type).await?;
    }

    let storage = SqlStorage::new(config_and_pool);

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(storage.clone()))
            .route("/health", web::get().to(HttpResponse::Ok))
            .route("/teesheet", web::get().to(teesheet::tee_sheet))
            .route("/teesheet/generate", web::post().to(teesheet::generate))
            .route("/teesheet/save", web::post().to(teesheet::save))
            .route("/handicaps", web::get().to(teesheet::handicaps))
    })
    .bind("0.0.0.0:5202")?
    .run()
    .await?;
    Ok(())
}
