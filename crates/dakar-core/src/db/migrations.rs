use sqlx::sqlite::SqlitePool;
use std::fmt;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct Migration {
    version: i32,
    up: &'static str,
    down: &'static str,
}

impl Migration {
    pub const fn new(version: i32, up: &'static str, down: &'static str) -> Self {
        Self { version, up, down }
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Migration {}", self.version)
    }
}

pub const MIGRATIONS: &[Migration] = &[
    Migration::new(
        1,
        r#"
        CREATE TABLE IF NOT EXISTS cars (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            brand TEXT NOT NULL,
            model TEXT NOT NULL,
            year TEXT NOT NULL,
            mileage TEXT,
            gearbox TEXT,
            fuel_type TEXT,
            address TEXT,
            owner TEXT,
            price TEXT NOT NULL,
            scraped_at DATETIME NOT NULL
        )
        "#,
        "DROP TABLE IF EXISTS cars",
    ),
    Migration::new(
        2,
        r#"
        CREATE TABLE IF NOT EXISTS motorcycles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            brand TEXT NOT NULL,
            model TEXT NOT NULL,
            year TEXT NOT NULL,
            mileage TEXT,
            gearbox TEXT,
            fuel_type TEXT,
            address TEXT,
            owner TEXT,
            price TEXT NOT NULL,
            scraped_at DATETIME NOT NULL
        )
        "#,
        "DROP TABLE IF EXISTS motorcycles",
    ),
    Migration::new(
        3,
        r#"
        CREATE TABLE IF NOT EXISTS rentals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            brand TEXT NOT NULL,
            model TEXT NOT NULL,
            year TEXT NOT NULL,
            mileage TEXT,
            gearbox TEXT,
            fuel_type TEXT,
            address TEXT,
            owner TEXT,
            price TEXT NOT NULL,
            scraped_at DATETIME NOT NULL
        )
        "#,
        "DROP TABLE IF EXISTS rentals",
    ),
    Migration::new(
        4,
        r#"
        CREATE INDEX IF NOT EXISTS idx_cars_brand ON cars(brand);
        CREATE INDEX IF NOT EXISTS idx_motorcycles_brand ON motorcycles(brand);
        CREATE INDEX IF NOT EXISTS idx_rentals_brand ON rentals(brand);
        "#,
        r#"
        DROP INDEX IF EXISTS idx_cars_brand;
        DROP INDEX IF EXISTS idx_motorcycles_brand;
        DROP INDEX IF EXISTS idx_rentals_brand;
        "#,
    ),
];

pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create migrations table if it doesn't exist
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at DATETIME NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // Versions already recorded
    let applied_versions: Vec<i32> = sqlx::query_scalar("SELECT version FROM migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    // Apply the rest in version order
    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            debug!("Applying {}", migration);
            sqlx::query(migration.up).execute(pool).await?;

            // Record migration
            sqlx::query("INSERT INTO migrations (version, applied_at) VALUES (?, ?)")
                .bind(migration.version)
                .bind(chrono::Utc::now())
                .execute(pool)
                .await?;
        }
    }

    Ok(())
}

pub async fn rollback_migration(pool: &SqlitePool, version: i32) -> Result<(), sqlx::Error> {
    // Find the migration
    let migration = MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .ok_or_else(|| sqlx::Error::Decode("Migration not found".into()))?;

    debug!("Rolling back {}", migration);
    sqlx::query(migration.down).execute(pool).await?;

    // Remove migration record
    sqlx::query("DELETE FROM migrations WHERE version = ?")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<i32>, sqlx::Error> {
    sqlx::query_scalar("SELECT version FROM migrations ORDER BY version")
        .fetch_all(pool)
        .await
}
