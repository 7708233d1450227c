use std::path::Path;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};

use crate::config::AppConfig;

/// Owner assigned to waste entries that predate the `user_id` column.
const LEGACY_WASTE_OWNER_ID: i64 = 1;

const DEFAULT_WASTE_CATEGORIES: [(&str, f64); 7] = [
    ("Vegetables", 2.5),
    ("Fruits", 3.0),
    ("Dairy", 4.5),
    ("Meat", 8.0),
    ("Bread & Grains", 2.0),
    ("Condiments", 3.5),
    ("Other", 2.0),
];

/// Open the SQLite pool, creating the storage directory and database file
/// if they do not exist yet.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("create database directory")?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .context("connect to database")?;

    Ok(pool)
}

/// Create tables, apply the additive `waste_entries.user_id` migration,
/// and seed default waste categories. Idempotent; safe on every start.
/// Any storage error propagates and aborts startup. The migration step is
/// not atomic: a crash mid-way can leave the schema half-updated.
pub async fn init_database(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            business_name TEXT,
            phone TEXT,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            last_login TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS waste_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            item_name TEXT NOT NULL,
            category TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            date_recorded DATE NOT NULL,
            cost_value REAL NOT NULL,
            notes TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    migrate_waste_entries(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS waste_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            average_cost_per_unit REAL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    seed_waste_categories(pool).await?;

    tracing::info!("database ready");
    Ok(())
}

/// Tables created before per-user ownership lack the `user_id` column.
/// Add it and assign orphaned rows to the legacy owner.
async fn migrate_waste_entries(pool: &SqlitePool) -> anyhow::Result<()> {
    let columns = sqlx::query("PRAGMA table_info(waste_entries)")
        .fetch_all(pool)
        .await?;

    let has_user_id = columns
        .iter()
        .any(|row| row.get::<String, _>("name") == "user_id");

    if !has_user_id {
        tracing::info!("migrating waste_entries: adding user_id column");
        sqlx::query("ALTER TABLE waste_entries ADD COLUMN user_id INTEGER")
            .execute(pool)
            .await?;
        sqlx::query("UPDATE waste_entries SET user_id = ? WHERE user_id IS NULL")
            .bind(LEGACY_WASTE_OWNER_ID)
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn seed_waste_categories(pool: &SqlitePool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waste_categories")
        .fetch_one(pool)
        .await?;

    if count == 0 {
        for (name, average_cost) in DEFAULT_WASTE_CATEGORIES {
            sqlx::query(
                "INSERT INTO waste_categories (name, average_cost_per_unit) VALUES (?, ?)",
            )
            .bind(name)
            .bind(average_cost)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // One connection so the in-memory database is shared by every query.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool")
}
