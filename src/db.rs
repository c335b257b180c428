use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::models::{Entry, NewEntry, SortOrder};

pub async fn init_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    // Ensure data directory exists
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Insert/list access to the `entries` table.
///
/// Input is validated by the caller. Store failures are returned as-is and
/// never retried.
#[derive(Clone)]
pub struct EntryRepository {
    db: SqlitePool,
}

impl EntryRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn insert(&self, entry: &NewEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO entries (rating, testimonial, last_name, first_name, occupation, github)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.rating)
        .bind(&entry.testimonial)
        .bind(&entry.last_name)
        .bind(&entry.first_name)
        .bind(&entry.occupation)
        .bind(&entry.github)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// All entries. Without a sort order, rows come back in store order.
    /// An empty table is an empty vec, not an error.
    pub async fn list_all(&self, sort: Option<SortOrder>) -> Result<Vec<Entry>, sqlx::Error> {
        let order_by = sort.map(SortOrder::order_by).unwrap_or_default();
        let query = format!(
            r#"
            SELECT id, created_at, rating, testimonial, last_name, first_name, occupation, github
            FROM entries
            {order_by}
            "#
        );

        sqlx::query_as::<_, Entry>(&query).fetch_all(&self.db).await
    }
}
