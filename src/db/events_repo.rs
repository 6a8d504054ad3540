// src/db/events_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::EventStore,
    models::{
        batch::BatchHistory,
        events::{
            Arrival, Death, Departure, EventKind, FeedIntake, NewArrival, NewDeath, NewDeparture,
            NewFeedIntake, NewObservation, Observation,
        },
    },
};

// Um batch_id inexistente aparece como violação de chave estrangeira.
fn map_insert_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::BatchNotFound;
        }
    }
    AppError::DatabaseError(e)
}

// Chegadas, mortes, observações, ração e saídas de um lote
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura"
    // ---
    // Genéricas no executor para rodarem tanto na pool quanto dentro do snapshot.

    pub async fn fetch_arrivals<'e, E>(&self, executor: E, batch_id: Uuid) -> Result<Vec<Arrival>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let arrivals = sqlx::query_as::<_, Arrival>(
            "SELECT * FROM arrivals WHERE batch_id = $1 ORDER BY date DESC, created_at DESC",
        )
            .bind(batch_id)
            .fetch_all(executor)
            .await?;
        Ok(arrivals)
    }

    pub async fn fetch_latest_arrival<'e, E>(&self, executor: E, batch_id: Uuid) -> Result<Option<Arrival>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let arrival = sqlx::query_as::<_, Arrival>(
            r#"
            SELECT * FROM arrivals
            WHERE batch_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            "#,
        )
            .bind(batch_id)
            .fetch_optional(executor)
            .await?;
        Ok(arrival)
    }

    pub async fn fetch_deaths<'e, E>(&self, executor: E, batch_id: Uuid) -> Result<Vec<Death>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deaths = sqlx::query_as::<_, Death>(
            "SELECT * FROM deaths WHERE batch_id = $1 ORDER BY death_date DESC, created_at DESC",
        )
            .bind(batch_id)
            .fetch_all(executor)
            .await?;
        Ok(deaths)
    }

    pub async fn fetch_feed_intakes<'e, E>(&self, executor: E, batch_id: Uuid) -> Result<Vec<FeedIntake>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let intakes = sqlx::query_as::<_, FeedIntake>(
            "SELECT * FROM feed_intakes WHERE batch_id = $1 ORDER BY date DESC, created_at DESC",
        )
            .bind(batch_id)
            .fetch_all(executor)
            .await?;
        Ok(intakes)
    }

    pub async fn fetch_departures<'e, E>(&self, executor: E, batch_id: Uuid) -> Result<Vec<Departure>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let departures = sqlx::query_as::<_, Departure>(
            "SELECT * FROM departures WHERE batch_id = $1 ORDER BY date DESC, created_at DESC",
        )
            .bind(batch_id)
            .fetch_all(executor)
            .await?;
        Ok(departures)
    }
}

#[async_trait]
impl EventStore for EventRepository {
    // ---
    // Chegadas
    // ---
    async fn insert_arrival(&self, new: NewArrival) -> Result<Arrival, AppError> {
        sqlx::query_as::<_, Arrival>(
            r#"
            INSERT INTO arrivals
                (batch_id, date, count, average_weight, total_weight, origin, responsible, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
            .bind(new.batch_id)
            .bind(new.date)
            .bind(new.count)
            .bind(new.average_weight)
            .bind(new.total_weight)
            .bind(new.origin)
            .bind(new.responsible)
            .bind(new.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn list_arrivals(&self, batch_id: Uuid) -> Result<Vec<Arrival>, AppError> {
        self.fetch_arrivals(&self.pool, batch_id).await
    }

    async fn latest_arrival(&self, batch_id: Uuid) -> Result<Option<Arrival>, AppError> {
        self.fetch_latest_arrival(&self.pool, batch_id).await
    }

    // ---
    // Mortes
    // ---
    async fn insert_death(&self, new: NewDeath) -> Result<Death, AppError> {
        sqlx::query_as::<_, Death>(
            r#"
            INSERT INTO deaths (batch_id, death_date, cause, tag_id, sex)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
            .bind(new.batch_id)
            .bind(new.death_date)
            .bind(new.cause)
            .bind(new.tag_id)
            .bind(new.sex)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn list_deaths(&self, batch_id: Uuid) -> Result<Vec<Death>, AppError> {
        self.fetch_deaths(&self.pool, batch_id).await
    }

    // ---
    // Observações
    // ---
    async fn insert_observation(&self, new: NewObservation) -> Result<Observation, AppError> {
        sqlx::query_as::<_, Observation>(
            "INSERT INTO observations (batch_id, text) VALUES ($1, $2) RETURNING *",
        )
            .bind(new.batch_id)
            .bind(new.text)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn list_observations(&self, batch_id: Uuid) -> Result<Vec<Observation>, AppError> {
        let observations = sqlx::query_as::<_, Observation>(
            "SELECT * FROM observations WHERE batch_id = $1 ORDER BY created_at DESC",
        )
            .bind(batch_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(observations)
    }

    // ---
    // Ração
    // ---
    async fn insert_feed_intake(&self, new: NewFeedIntake) -> Result<FeedIntake, AppError> {
        sqlx::query_as::<_, FeedIntake>(
            r#"
            INSERT INTO feed_intakes (batch_id, feed_type, origin, quantity, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
            .bind(new.batch_id)
            .bind(new.feed_type)
            .bind(new.origin)
            .bind(new.quantity)
            .bind(new.date)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn list_feed_intakes(&self, batch_id: Uuid) -> Result<Vec<FeedIntake>, AppError> {
        self.fetch_feed_intakes(&self.pool, batch_id).await
    }

    // ---
    // Saídas
    // ---
    async fn insert_departure(&self, new: NewDeparture) -> Result<Departure, AppError> {
        sqlx::query_as::<_, Departure>(
            r#"
            INSERT INTO departures (batch_id, count, total_weight, average_weight, date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(new.batch_id)
            .bind(new.count)
            .bind(new.total_weight)
            .bind(new.average_weight)
            .bind(new.date)
            .bind(new.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn list_departures(&self, batch_id: Uuid) -> Result<Vec<Departure>, AppError> {
        self.fetch_departures(&self.pool, batch_id).await
    }

    async fn load_history(&self, batch_id: Uuid) -> Result<BatchHistory, AppError> {
        // Snapshot consistente: todas as leituras enxergam o mesmo estado
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let arrivals = self.fetch_arrivals(&mut *tx, batch_id).await?;
        let deaths = self.fetch_deaths(&mut *tx, batch_id).await?;
        let feed_intakes = self.fetch_feed_intakes(&mut *tx, batch_id).await?;
        let departures = self.fetch_departures(&mut *tx, batch_id).await?;
        let latest_arrival = self.fetch_latest_arrival(&mut *tx, batch_id).await?;

        // Leitura pura: commit só encerra a transação
        tx.commit().await?;

        Ok(BatchHistory {
            arrivals,
            deaths,
            feed_intakes,
            departures,
            latest_arrival,
        })
    }

    async fn delete_event(&self, kind: EventKind, id: Uuid) -> Result<bool, AppError> {
        // `table()` só devolve nomes fixos, nunca entrada do usuário
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
