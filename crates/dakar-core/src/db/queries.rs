use super::StoredRecord;
use crate::{Category, Result};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Sqlite};

/// Filtered read over one category table, newest rows first.
pub struct RecordQueryBuilder<'a> {
    builder: QueryBuilder<'a, Sqlite>,
}

impl<'a> RecordQueryBuilder<'a> {
    pub fn new(category: Category) -> Self {
        let builder = QueryBuilder::new(format!(
            "SELECT * FROM {} WHERE 1=1",
            category.table_name()
        ));
        Self { builder }
    }

    pub fn with_brand(mut self, brand: Option<&'a str>) -> Self {
        if let Some(brand) = brand {
            self.builder.push(" AND brand = ");
            self.builder.push_bind(brand);
            self.builder.push(" COLLATE NOCASE");
        }
        self
    }

    /// Orders and paginates; must be the last filter applied.
    pub fn paginate(mut self, limit: Option<i64>, offset: Option<i64>) -> Self {
        self.builder.push(" ORDER BY id DESC");
        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
        if limit.is_some() || offset.is_some() {
            self.builder.push(" LIMIT ");
            self.builder.push_bind(limit.unwrap_or(-1));
        }
        if let Some(offset) = offset {
            self.builder.push(" OFFSET ");
            self.builder.push_bind(offset);
        }
        self
    }

    pub async fn execute(mut self, pool: &SqlitePool) -> Result<Vec<StoredRecord>> {
        let query = self.builder.build_query_as::<StoredRecord>();
        let rows = query.fetch_all(pool).await?;
        Ok(rows)
    }
}
