// src/db/batch_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::BatchStore,
    models::batch::Batch,
};

const SINGLE_ACTIVE_CONSTRAINT: &str = "batches_single_active";

// O repositório de lotes, responsável por todas as interações com a tabela 'batches'
#[derive(Clone)]
pub struct BatchRepository {
    pool: PgPool,
}

impl BatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchStore for BatchRepository {
    async fn insert_active(&self, name: &str) -> Result<Batch, AppError> {
        let mut tx = self.pool.begin().await?;

        let already_active: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM batches WHERE active)")
                .fetch_one(&mut *tx)
                .await?;
        if already_active {
            return Err(AppError::ActiveBatchExists);
        }

        // O índice parcial único fecha a janela entre o SELECT e o INSERT:
        // se outro pedido ganhar a corrida, caímos na violação abaixo.
        let batch = sqlx::query_as::<_, Batch>(
            "INSERT INTO batches (name, active) VALUES ($1, TRUE) RETURNING *",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(SINGLE_ACTIVE_CONSTRAINT)
                {
                    return AppError::ActiveBatchExists;
                }
            }
            AppError::DatabaseError(e)
        })?;

        tx.commit().await?;
        Ok(batch)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Batch>, AppError> {
        let batch = sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(batch)
    }

    async fn find_active(&self) -> Result<Option<Batch>, AppError> {
        let batch = sqlx::query_as::<_, Batch>(
            "SELECT * FROM batches WHERE active ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(batch)
    }

    async fn finalize_active(&self) -> Result<Option<Batch>, AppError> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            UPDATE batches
            SET active = FALSE, finalized_at = NOW()
            WHERE id = (
                SELECT id FROM batches WHERE active
                ORDER BY created_at DESC
                LIMIT 1
                FOR UPDATE
            )
            RETURNING *
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(batch)
    }

    async fn list_all(&self) -> Result<Vec<Batch>, AppError> {
        let batches = sqlx::query_as::<_, Batch>("SELECT * FROM batches ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(batches)
    }

    async fn list_finalized(&self) -> Result<Vec<Batch>, AppError> {
        let batches = sqlx::query_as::<_, Batch>(
            r#"
            SELECT * FROM batches
            WHERE NOT active
            ORDER BY finalized_at DESC NULLS LAST, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(batches)
    }

    async fn delete_inactive(&self, id: Uuid) -> Result<bool, AppError> {
        // Os eventos saem junto via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM batches WHERE id = $1 AND NOT active")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_finalized(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM batches WHERE id = ANY($1) AND NOT active")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
