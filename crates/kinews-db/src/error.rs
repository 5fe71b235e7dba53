use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Only archive and article commands need a database; the rest run without one.
    #[error("no database configured (set DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("record not found")]
    NotFound,
    #[error("ISO week {week} does not exist in {year}")]
    InvalidWeek { year: i32, week: u32 },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}
