use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::store::{ServiceStore, StoreError, UserDirectory};
use crate::types::{ServicePatch, ServiceRecord, UserRecord};

const SERVICE_COLUMNS: &str = r#"
    id, created_by, creator_role, agency_name, status,
    attributes, created_at, updated_at
"#;

/// PostgreSQL-backed listing store and user directory
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new instance of `PgStore` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn service_from_row(row: &PgRow) -> Result<ServiceRecord, sqlx::Error> {
    Ok(ServiceRecord {
        id: row.try_get("id")?,
        attributes: row.try_get::<Json<Map<String, Value>>, _>("attributes")?.0,
        created_by: row.try_get("created_by")?,
        creator_role: row.try_get("creator_role")?,
        agency_name: row.try_get("agency_name")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ServiceStore for PgStore {
    async fn insert(&self, service: &ServiceRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, created_by, creator_role, agency_name, status,
                attributes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(service.id)
        .bind(&service.created_by)
        .bind(&service.creator_role)
        .bind(&service.agency_name)
        .bind(&service.status)
        .bind(Json(&service.attributes))
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ServiceRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(service_from_row).transpose()?)
    }

    async fn update(
        &self,
        id: &Uuid,
        patch: &ServicePatch,
    ) -> Result<Option<ServiceRecord>, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE services
            SET status = COALESCE($2, status),
                attributes = attributes || $3::jsonb,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.status.as_deref())
        .bind(Json(&patch.attributes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(service_from_row).transpose()?)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self, status: &str) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM services WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        let total: i64 = row.try_get("total")?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_by_status(
        &self,
        status: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ServiceRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SERVICE_COLUMNS}
            FROM services
            WHERE status = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(status)
        .bind(to_sql_int(limit))
        .bind(to_sql_int(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(service_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id::text AS id, email, agency_name
            FROM users
            WHERE id::text = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(UserRecord {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            agency_name: row.try_get("agency_name")?,
        }))
    }
}
