//! Company persistence.
//!
//! One SQLite table of watched companies; the schema is applied on startup.

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// A company whose careers site gets scraped.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub list_url: String,
    pub role_keywords: String,
    pub max_age_days: i64,
    pub detail_fetch_limit: i64,
    pub active: bool,
}

/// Field values for a company being created.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub list_url: String,
    pub role_keywords: String,
    pub max_age_days: i64,
    pub detail_fetch_limit: i64,
    pub active: bool,
}

/// Apply the schema. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            list_url TEXT NOT NULL,
            role_keywords TEXT NOT NULL DEFAULT '',
            max_age_days INTEGER NOT NULL DEFAULT 7,
            detail_fetch_limit INTEGER NOT NULL DEFAULT 40,
            active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// All companies, newest first.
pub async fn list_companies(pool: &SqlitePool) -> sqlx::Result<Vec<Company>> {
    sqlx::query_as::<_, Company>(
        "SELECT id, name, list_url, role_keywords, max_age_days, detail_fetch_limit, active
         FROM companies ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_company(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Company>> {
    sqlx::query_as::<_, Company>(
        "SELECT id, name, list_url, role_keywords, max_age_days, detail_fetch_limit, active
         FROM companies WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn name_exists(pool: &SqlitePool, name: &str) -> sqlx::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM companies WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Insert a company and return its id.
pub async fn insert_company(pool: &SqlitePool, company: &NewCompany) -> sqlx::Result<i64> {
    let result = sqlx::query(
        "INSERT INTO companies (name, list_url, role_keywords, max_age_days, detail_fetch_limit, active)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&company.name)
    .bind(&company.list_url)
    .bind(&company.role_keywords)
    .bind(company.max_age_days)
    .bind(company.detail_fetch_limit)
    .bind(company.active)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Delete one company. Returns whether a row was removed.
pub async fn delete_company(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM companies WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove every company.
pub async fn reset_companies(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM companies").execute(pool).await?;
    Ok(())
}
