pub mod pool;

pub use pool::create_pool;

use sqlx::{Sqlite, SqlitePool, Transaction};

/// Database handle type (the pool is internally reference counted)
pub type Db = SqlitePool;

/// Open the database at `database_url` and bring the schema up to date
pub async fn open_database(database_url: &str) -> Result<Db, crate::AppError> {
    let pool = create_pool(database_url).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(pool)
}

/// Begin a transaction that takes the write lock immediately
///
/// A deferred transaction that reads before writing fails with `SQLITE_BUSY`
/// if another connection commits in between; `BEGIN IMMEDIATE` waits on the
/// busy timeout instead.
pub async fn begin_write(db: &Db) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    db.begin_with("BEGIN IMMEDIATE").await
}
