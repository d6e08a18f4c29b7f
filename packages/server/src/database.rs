use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::submission;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(50)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Ensure required database indexes exist.
///
/// Schema sync creates the `(user_id, problem_id)` unique key but not plain
/// indexes, so the roster lookup index is created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // SELECT * FROM submission WHERE problem_id = ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_submission_problem")
        .table(submission::Entity)
        .col(submission::Column::ProblemId)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_submission_problem exists"),
        Err(e) => warn!("Failed to create index idx_submission_problem: {}", e),
    }

    Ok(())
}
