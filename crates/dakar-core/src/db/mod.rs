pub mod migrations;
pub mod queries;

pub use migrations::apply_migrations;
pub use queries::RecordQueryBuilder;

use crate::{Category, DakarError, Result, ResultTable, VehicleRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::{FromRow, Row};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// A persisted listing together with the run timestamp it was saved under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i64,
    pub record: VehicleRecord,
    pub scraped_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for StoredRecord {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(StoredRecord {
            id: row.try_get("id")?,
            record: VehicleRecord {
                brand: row.try_get("brand")?,
                model: row.try_get("model")?,
                year: row.try_get("year")?,
                mileage: row.try_get("mileage")?,
                gearbox: row.try_get("gearbox")?,
                fuel_type: row.try_get("fuel_type")?,
                address: row.try_get("address")?,
                owner: row.try_get("owner")?,
                price: row.try_get("price")?,
            },
            scraped_at: row.try_get("scraped_at")?,
        })
    }
}

/// Append-only store with one table per category.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database, creating the file and its directory when missing.
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Self::connect(db_path, true).await
    }

    /// Opens a database that must already exist. Read-only commands use this
    /// so a mistyped path fails instead of leaving an empty file behind.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if !db_path.is_file() {
            return Err(DakarError::DatabaseNotFound(db_path.display().to_string()));
        }

        Self::connect(db_path, false).await
    }

    async fn connect(db_path: &Path, create: bool) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(create);
        let pool = SqlitePool::connect_with(options).await?;
        let db = Self { pool };

        // Bring older files up to the current schema
        db.migrate().await?;

        Ok(db)
    }

    pub async fn migrate(&self) -> Result<()> {
        debug!("Running database migrations");
        apply_migrations(&self.pool).await?;
        Ok(())
    }

    pub async fn get_applied_migrations(&self) -> Result<Vec<i32>> {
        Ok(migrations::get_applied_migrations(&self.pool).await?)
    }

    /// Rolls back every applied migration newer than `version`, newest first.
    pub async fn rollback(&self, version: i32) -> Result<()> {
        let mut applied = self.get_applied_migrations().await?;
        applied.sort_unstable_by(|a, b| b.cmp(a));
        for v in applied.into_iter().filter(|v| *v > version) {
            migrations::rollback_migration(&self.pool, v).await?;
        }
        Ok(())
    }

    /// Appends every row of `table` under a single run timestamp.
    pub async fn save_table(&self, table: &ResultTable) -> Result<DateTime<Utc>> {
        let scraped_at = Utc::now();
        self.save_table_at(table, scraped_at).await?;
        Ok(scraped_at)
    }

    pub async fn save_table_at(&self, table: &ResultTable, scraped_at: DateTime<Utc>) -> Result<u64> {
        let sql = format!(
            "INSERT INTO {} (
                brand, model, year, mileage, gearbox, fuel_type,
                address, owner, price, scraped_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            table.category.table_name()
        );

        // All rows of a run commit together
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for record in table {
            inserted += sqlx::query(&sql)
                .bind(&record.brand)
                .bind(&record.model)
                .bind(&record.year)
                .bind(&record.mileage)
                .bind(&record.gearbox)
                .bind(&record.fuel_type)
                .bind(&record.address)
                .bind(&record.owner)
                .bind(&record.price)
                .bind(scraped_at)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;

        info!("Saved {} {} records", inserted, table.category);
        Ok(inserted)
    }

    pub async fn list_records(
        &self,
        category: Category,
        brand: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<StoredRecord>> {
        RecordQueryBuilder::new(category)
            .with_brand(brand)
            .paginate(limit, offset)
            .execute(&self.pool)
            .await
    }

    pub async fn count_records(&self, category: Category) -> Result<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", category.table_name()))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Every stored row of a category, oldest first.
    pub async fn load_table(&self, category: Category) -> Result<ResultTable> {
        let rows = sqlx::query_as::<_, StoredRecord>(&format!(
            "SELECT * FROM {} ORDER BY id ASC",
            category.table_name()
        ))
        .fetch_all(&self.pool)
        .await?;

        // Drop ids and timestamps, keep insertion order
        Ok(ResultTable::from_records(
            category,
            rows.into_iter().map(|row| row.record).collect(),
        ))
    }
}
