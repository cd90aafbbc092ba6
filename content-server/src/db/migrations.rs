//! Schema creation for content tables
//!
//! Idempotent: every statement is `IF NOT EXISTS` / `ON CONFLICT DO NOTHING`,
//! so this runs on every startup.

use sqlx::PgPool;

use super::repos::DbError;

/// Content types present in every deployment.
pub const SEEDED_CONTENT_TYPES: &[&str] = &["text"];

/// Run all content migrations
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running content migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_type (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            creation_date TIMESTAMPTZ NOT NULL,
            last_modified_date TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_details (
            id SERIAL PRIMARY KEY,
            content_id INTEGER NOT NULL REFERENCES content(id),
            content_type_id INTEGER NOT NULL REFERENCES content_type(id),
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_content_details_content_id ON content_details(content_id)",
    )
    .execute(pool)
    .await?;

    for name in SEEDED_CONTENT_TYPES {
        sqlx::query("INSERT INTO content_type (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(*name)
            .execute(pool)
            .await?;
    }

    tracing::info!("Content migrations complete");
    Ok(())
}
