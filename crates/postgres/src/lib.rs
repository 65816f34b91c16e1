//! `pts-postgres` — Postgres-backed permit storage.
//!
//! Each permit is stored as a JSONB document keyed by its business id. The
//! two columns the search can match exactly (`rto_status`, `start_date`)
//! are denormalized next to the document so the store answers
//! [`PermitQuery`] predicates without unpacking JSON. `ord` preserves
//! insertion order across listings.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use pts_core::PermitId;
use pts_permits::{
    Permit, PermitQuery, PermitStore, PermitUpdate, StoreError, apply_permit_update,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS permits (
    ord BIGSERIAL PRIMARY KEY,
    id TEXT NOT NULL UNIQUE,
    rto_status TEXT NOT NULL,
    start_date TEXT NOT NULL,
    body JSONB NOT NULL
)
"#;

/// Permit store on a SQLx connection pool.
///
/// `apply_update` runs read-modify-write inside a transaction with the row
/// locked, so concurrent sign/close attempts serialize at the database.
#[derive(Debug, Clone)]
pub struct PostgresPermitStore {
    pool: Arc<PgPool>,
}

impl PostgresPermitStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the permits table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl PermitStore for PostgresPermitStore {
    #[instrument(skip_all, fields(permit_id = %permit.id), err)]
    async fn create(&self, permit: &Permit) -> Result<(), StoreError> {
        let body = serde_json::to_value(permit)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO permits (id, rto_status, start_date, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(permit.id.as_str())
        .bind(permit.return_to_operation.status.as_str())
        .bind(&permit.start_date)
        .bind(&body)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateId(permit.id.as_str().to_string())
            } else {
                map_sqlx_error("create_permit", e)
            }
        })?;
        Ok(())
    }

    #[instrument(skip_all, fields(permit_id = %id), err)]
    async fn get(&self, id: &PermitId) -> Result<Option<Permit>, StoreError> {
        let row = sqlx::query("SELECT body FROM permits WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_permit", e))?;

        match row {
            Some(row) => Ok(Some(permit_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip_all, err)]
    async fn query(&self, query: &PermitQuery) -> Result<Vec<Permit>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT body FROM permits
            WHERE ($1::text IS NULL OR rto_status = $1)
              AND ($2::text IS NULL OR start_date = $2)
            ORDER BY ord ASC
            "#,
        )
        .bind(query.rto_status.as_deref())
        .bind(query.start_date.as_deref())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("query_permits", e))?;

        let mut permits = Vec::with_capacity(rows.len());
        for row in rows {
            permits.push(permit_from_row(&row)?);
        }
        Ok(permits)
    }

    #[instrument(skip(self, update), fields(permit_id = %id), err)]
    async fn apply_update(
        &self,
        id: &PermitId,
        update: PermitUpdate,
    ) -> Result<Option<Permit>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let row = sqlx::query("SELECT body FROM permits WHERE id = $1 FOR UPDATE")
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("lock_permit", e))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Ok(None);
        };

        let mut permit = permit_from_row(&row)?;
        apply_permit_update(&mut permit, update);
        let body = serde_json::to_value(&permit)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query("UPDATE permits SET body = $2, rto_status = $3 WHERE id = $1")
            .bind(id.as_str())
            .bind(&body)
            .bind(permit.return_to_operation.status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_permit", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(Some(permit))
    }
}

fn permit_from_row(row: &sqlx::postgres::PgRow) -> Result<Permit, StoreError> {
    let body: serde_json::Value = row
        .try_get("body")
        .map_err(|e| StoreError::Serialization(format!("failed to read permit body: {e}")))?;
    serde_json::from_value(body)
        .map_err(|e| StoreError::Serialization(format!("failed to decode permit body: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Unavailable(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Unavailable(format!("sqlx error in {operation}: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
