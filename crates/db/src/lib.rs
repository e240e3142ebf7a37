use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use utils_core::assets::database_path;

pub mod entities;
pub mod models;
pub mod types;
pub mod validation;

pub use sea_orm::{DatabaseConnection as DbPool, DbErr, TransactionTrait};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Connects to `DATABASE_URL` (or the sqlite file in the asset dir) and migrates it.
    pub async fn new() -> Result<DBService, DbErr> {
        let database_url = match std::env::var(DATABASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => format!(
                "sqlite://{}?mode=rwc",
                database_path().to_string_lossy()
            ),
        };
        Self::connect(&database_url).await
    }

    pub async fn connect(database_url: &str) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.sqlx_logging(false);
        let pool = Database::connect(options).await?;
        db_migration::Migrator::up(&pool, None).await?;
        tracing::debug!("Database ready at {}", database_url);
        Ok(DBService { pool })
    }
}
