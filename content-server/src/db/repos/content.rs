//! Content repository
//!
//! - list: one three-way LEFT JOIN, folded into aggregates in memory
//! - create: content row then detail rows inside a single transaction
//! - content type lookups: absence is `Ok(None)`, not an error

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::models::{Content, ContentType, Detail, NewContent};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Data access for content aggregates and the content type lookup table.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// All content with details, ordered by content id then detail id.
    async fn get_all_content(&self) -> Result<Vec<Content>, DbError>;

    /// Insert content and its details atomically.
    ///
    /// `content` is never modified; the returned aggregate carries the
    /// generated ids. Nothing is persisted when an error is returned.
    async fn create_content_with_details(&self, content: &NewContent) -> Result<Content, DbError>;

    async fn get_content_type_by_name(&self, name: &str) -> Result<Option<ContentType>, DbError>;

    async fn get_content_type_by_id(&self, id: i32) -> Result<Option<ContentType>, DbError>;
}

/// One row of the content ⋈ details ⋈ content_type join.
///
/// Detail columns are `None` for content that has no details.
#[derive(Debug, Clone, FromRow)]
pub struct JoinedRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub detail_id: Option<i32>,
    pub content_type_id: Option<i32>,
    pub value: Option<String>,
}

/// Fold flat join rows into one aggregate per content id.
///
/// Aggregates come out in first-seen order and details keep row order, so
/// the caller controls ordering through the query. Duplicate rows for the
/// same content never produce a second aggregate.
pub fn fold_joined_rows<I>(rows: I) -> Vec<Content>
where
    I: IntoIterator<Item = JoinedRow>,
{
    let mut by_id: IndexMap<i32, Content> = IndexMap::new();

    for row in rows {
        let content = by_id.entry(row.id).or_insert_with(|| Content {
            id: row.id,
            title: row.title,
            description: row.description,
            creation_date: row.creation_date.with_timezone(&Utc),
            last_modified_date: row.last_modified_date.with_timezone(&Utc),
            details: Vec::new(),
        });

        if let (Some(detail_id), Some(content_type_id), Some(value)) =
            (row.detail_id, row.content_type_id, row.value)
        {
            content.details.push(Detail {
                id: detail_id,
                content_id: row.id,
                content_type_id,
                value,
            });
        }
    }

    by_id.into_values().collect()
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn get_all_content(&self) -> Result<Vec<Content>, DbError> {
        let rows: Vec<JoinedRow> = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.title,
                c.description,
                c.creation_date,
                c.last_modified_date,
                cd.id AS detail_id,
                cd.content_type_id,
                cd.value
            FROM content c
            LEFT JOIN content_details cd ON cd.content_id = c.id
            LEFT JOIN content_type ct ON ct.id = cd.content_type_id
            ORDER BY c.id, cd.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch content");
            e
        })?;

        Ok(fold_joined_rows(rows))
    }

    async fn create_content_with_details(&self, content: &NewContent) -> Result<Content, DbError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "failed to start transaction");
            e
        })?;

        let (id, detail_ids) = match insert_aggregate(&mut tx, content).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "content insert failed, rolling back");
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(error = %rb, "failed to roll back transaction");
                }
                return Err(e.into());
            }
        };

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "failed to commit transaction");
            e
        })?;

        tracing::debug!(id, details = detail_ids.len(), "content created");
        Ok(content.clone().into_persisted(id, detail_ids))
    }

    async fn get_content_type_by_name(&self, name: &str) -> Result<Option<ContentType>, DbError> {
        sqlx::query_as::<_, ContentType>("SELECT id, name FROM content_type WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, name, "failed to fetch content type");
                e.into()
            })
    }

    async fn get_content_type_by_id(&self, id: i32) -> Result<Option<ContentType>, DbError> {
        sqlx::query_as::<_, ContentType>("SELECT id, name FROM content_type WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "failed to fetch content type");
                e.into()
            })
    }
}

/// Insert the content row, then each detail in input order.
///
/// Returns the content id and the detail ids in input order.
async fn insert_aggregate(
    tx: &mut Transaction<'_, Postgres>,
    content: &NewContent,
) -> Result<(i32, Vec<i32>), sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO content (title, description, creation_date, last_modified_date)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&content.title)
    .bind(&content.description)
    .bind(content.creation_date)
    .bind(content.last_modified_date)
    .fetch_one(&mut **tx)
    .await?;

    let mut detail_ids = Vec::with_capacity(content.details.len());
    for detail in &content.details {
        let (detail_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO content_details (content_id, content_type_id, value)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(detail.content_type_id)
        .bind(&detail.value)
        .fetch_one(&mut **tx)
        .await?;
        detail_ids.push(detail_id);
    }

    Ok((id, detail_ids))
}
