// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        batch::{Batch, BatchHistory},
        events::{
            Arrival, Death, Departure, EventKind, FeedIntake, NewArrival, NewDeath,
            NewDeparture, NewFeedIntake, NewObservation, Observation,
        },
    },
};

/// Persistência de lotes.
///
/// A regra "no máximo um lote ativo" é responsabilidade da implementação:
/// `insert_active` precisa checar e inserir de forma atômica e devolver
/// `AppError::ActiveBatchExists` quando perder a corrida.
#[async_trait]
pub trait BatchStore: Send + Sync + 'static {
    async fn insert_active(&self, name: &str) -> Result<Batch, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Batch>, AppError>;
    /// O lote ativo mais recente, se houver.
    async fn find_active(&self) -> Result<Option<Batch>, AppError>;
    /// Marca o lote ativo como finalizado e devolve-o; `None` se não havia ativo.
    async fn finalize_active(&self) -> Result<Option<Batch>, AppError>;
    async fn list_all(&self) -> Result<Vec<Batch>, AppError>;
    async fn list_finalized(&self) -> Result<Vec<Batch>, AppError>;
    /// Exclui (em cascata) um lote não ativo. Devolve `false` se não existia.
    async fn delete_inactive(&self, id: Uuid) -> Result<bool, AppError>;
    /// Exclui os lotes finalizados dentre `ids`; devolve quantos foram excluídos.
    async fn delete_finalized(&self, ids: &[Uuid]) -> Result<u64, AppError>;
}

/// Persistência dos eventos de um lote.
///
/// Listagens vêm da mais recente para a mais antiga.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    async fn insert_arrival(&self, new: NewArrival) -> Result<Arrival, AppError>;
    async fn list_arrivals(&self, batch_id: Uuid) -> Result<Vec<Arrival>, AppError>;
    async fn latest_arrival(&self, batch_id: Uuid) -> Result<Option<Arrival>, AppError>;

    async fn insert_death(&self, new: NewDeath) -> Result<Death, AppError>;
    async fn list_deaths(&self, batch_id: Uuid) -> Result<Vec<Death>, AppError>;

    async fn insert_observation(&self, new: NewObservation) -> Result<Observation, AppError>;
    async fn list_observations(&self, batch_id: Uuid) -> Result<Vec<Observation>, AppError>;

    async fn insert_feed_intake(&self, new: NewFeedIntake) -> Result<FeedIntake, AppError>;
    async fn list_feed_intakes(&self, batch_id: Uuid) -> Result<Vec<FeedIntake>, AppError>;

    async fn insert_departure(&self, new: NewDeparture) -> Result<Departure, AppError>;
    async fn list_departures(&self, batch_id: Uuid) -> Result<Vec<Departure>, AppError>;

    /// Chegadas, mortes, ração, saídas e a última chegada do lote, lidas
    /// de um mesmo snapshot.
    async fn load_history(&self, batch_id: Uuid) -> Result<BatchHistory, AppError>;

    /// Devolve `false` se o registro não existia.
    async fn delete_event(&self, kind: EventKind, id: Uuid) -> Result<bool, AppError>;
}
