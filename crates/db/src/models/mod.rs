pub mod dependency;
pub mod member;
pub mod pull_request;
pub mod team;
pub mod ticket;

#[cfg(test)]
pub(crate) async fn test_db() -> sea_orm::DatabaseConnection {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    let db = Database::connect("sqlite::memory:").await.unwrap();
    db_migration::Migrator::up(&db, None).await.unwrap();
    db
}
