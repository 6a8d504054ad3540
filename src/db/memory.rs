// src/db/memory.rs

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{BatchStore, EventStore},
    models::{
        batch::{Batch, BatchHistory},
        events::{
            Arrival, Death, Departure, EventKind, FeedIntake, NewArrival, NewDeath, NewDeparture,
            NewFeedIntake, NewObservation, Observation,
        },
    },
};

#[derive(Default)]
struct State {
    batches: Vec<Batch>,
    arrivals: Vec<Arrival>,
    deaths: Vec<Death>,
    observations: Vec<Observation>,
    feed_intakes: Vec<FeedIntake>,
    departures: Vec<Departure>,
    // Relógio lógico: garante created_at estritamente crescente
    ticks: i64,
}

impl State {
    fn now(&mut self) -> chrono::DateTime<Utc> {
        self.ticks += 1;
        Utc::now() + Duration::milliseconds(self.ticks)
    }

    fn require_batch(&self, batch_id: Uuid) -> Result<(), AppError> {
        if self.batches.iter().any(|b| b.id == batch_id) {
            Ok(())
        } else {
            Err(AppError::BatchNotFound)
        }
    }

    fn cascade(&mut self, batch_id: Uuid) {
        self.arrivals.retain(|e| e.batch_id != batch_id);
        self.deaths.retain(|e| e.batch_id != batch_id);
        self.observations.retain(|e| e.batch_id != batch_id);
        self.feed_intakes.retain(|e| e.batch_id != batch_id);
        self.departures.retain(|e| e.batch_id != batch_id);
    }
}

/// Record Store em memória, com as mesmas garantias do Postgres
/// (lote ativo único, chave estrangeira, exclusão em cascata).
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl BatchStore for MemoryStore {
    async fn insert_active(&self, name: &str) -> Result<Batch, AppError> {
        let mut state = self.state.lock().await;
        if state.batches.iter().any(|b| b.active) {
            return Err(AppError::ActiveBatchExists);
        }
        let batch = Batch {
            id: Uuid::new_v4(),
            name: name.to_string(),
            active: true,
            created_at: state.now(),
            finalized_at: None,
        };
        state.batches.push(batch.clone());
        Ok(batch)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Batch>, AppError> {
        let state = self.state.lock().await;
        Ok(state.batches.iter().find(|b| b.id == id).cloned())
    }

    async fn find_active(&self) -> Result<Option<Batch>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .batches
            .iter()
            .filter(|b| b.active)
            .max_by_key(|b| b.created_at)
            .cloned())
    }

    async fn finalize_active(&self) -> Result<Option<Batch>, AppError> {
        let mut state = self.state.lock().await;
        let finalized_at = state.now();
        let Some(batch) = state
            .batches
            .iter_mut()
            .filter(|b| b.active)
            .max_by_key(|b| b.created_at)
        else {
            return Ok(None);
        };
        batch.active = false;
        batch.finalized_at = Some(finalized_at);
        Ok(Some(batch.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Batch>, AppError> {
        let state = self.state.lock().await;
        Ok(newest_first(state.batches.clone(), |b| b.created_at))
    }

    async fn list_finalized(&self) -> Result<Vec<Batch>, AppError> {
        let state = self.state.lock().await;
        let finalized: Vec<Batch> = state.batches.iter().filter(|b| !b.active).cloned().collect();
        Ok(newest_first(finalized, |b| (b.finalized_at, b.created_at)))
    }

    async fn delete_inactive(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let before = state.batches.len();
        state.batches.retain(|b| b.id != id || b.active);
        let deleted = state.batches.len() < before;
        if deleted {
            state.cascade(id);
        }
        Ok(deleted)
    }

    async fn delete_finalized(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let mut deleted = 0;
        for id in ids {
            if self.delete_inactive(*id).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_arrival(&self, new: NewArrival) -> Result<Arrival, AppError> {
        let mut state = self.state.lock().await;
        state.require_batch(new.batch_id)?;
        let arrival = Arrival {
            id: Uuid::new_v4(),
            batch_id: new.batch_id,
            date: new.date,
            count: new.count,
            average_weight: new.average_weight,
            total_weight: new.total_weight,
            origin: new.origin,
            responsible: new.responsible,
            notes: new.notes,
            created_at: state.now(),
        };
        state.arrivals.push(arrival.clone());
        Ok(arrival)
    }

    async fn list_arrivals(&self, batch_id: Uuid) -> Result<Vec<Arrival>, AppError> {
        let state = self.state.lock().await;
        let rows: Vec<Arrival> = state.arrivals.iter().filter(|e| e.batch_id == batch_id).cloned().collect();
        Ok(newest_first(rows, |e| (e.date, e.created_at)))
    }

    async fn latest_arrival(&self, batch_id: Uuid) -> Result<Option<Arrival>, AppError> {
        Ok(self.list_arrivals(batch_id).await?.into_iter().next())
    }

    async fn insert_death(&self, new: NewDeath) -> Result<Death, AppError> {
        let mut state = self.state.lock().await;
        state.require_batch(new.batch_id)?;
        let death = Death {
            id: Uuid::new_v4(),
            batch_id: new.batch_id,
            death_date: new.death_date,
            cause: new.cause,
            tag_id: new.tag_id,
            sex: new.sex,
            created_at: state.now(),
        };
        state.deaths.push(death.clone());
        Ok(death)
    }

    async fn list_deaths(&self, batch_id: Uuid) -> Result<Vec<Death>, AppError> {
        let state = self.state.lock().await;
        let rows: Vec<Death> = state.deaths.iter().filter(|e| e.batch_id == batch_id).cloned().collect();
        Ok(newest_first(rows, |e| (e.death_date, e.created_at)))
    }

    async fn insert_observation(&self, new: NewObservation) -> Result<Observation, AppError> {
        let mut state = self.state.lock().await;
        state.require_batch(new.batch_id)?;
        let observation = Observation {
            id: Uuid::new_v4(),
            batch_id: new.batch_id,
            text: new.text,
            created_at: state.now(),
        };
        state.observations.push(observation.clone());
        Ok(observation)
    }

    async fn list_observations(&self, batch_id: Uuid) -> Result<Vec<Observation>, AppError> {
        let state = self.state.lock().await;
        let rows: Vec<Observation> = state.observations.iter().filter(|e| e.batch_id == batch_id).cloned().collect();
        Ok(newest_first(rows, |e| e.created_at))
    }

    async fn insert_feed_intake(&self, new: NewFeedIntake) -> Result<FeedIntake, AppError> {
        let mut state = self.state.lock().await;
        state.require_batch(new.batch_id)?;
        let intake = FeedIntake {
            id: Uuid::new_v4(),
            batch_id: new.batch_id,
            feed_type: new.feed_type,
            origin: new.origin,
            quantity: new.quantity,
            date: new.date,
            created_at: state.now(),
        };
        state.feed_intakes.push(intake.clone());
        Ok(intake)
    }

    async fn list_feed_intakes(&self, batch_id: Uuid) -> Result<Vec<FeedIntake>, AppError> {
        let state = self.state.lock().await;
        let rows: Vec<FeedIntake> = state.feed_intakes.iter().filter(|e| e.batch_id == batch_id).cloned().collect();
        Ok(newest_first(rows, |e| (e.date, e.created_at)))
    }

    async fn insert_departure(&self, new: NewDeparture) -> Result<Departure, AppError> {
        let mut state = self.state.lock().await;
        state.require_batch(new.batch_id)?;
        let departure = Departure {
            id: Uuid::new_v4(),
            batch_id: new.batch_id,
            count: new.count,
            total_weight: new.total_weight,
            average_weight: new.average_weight,
            date: new.date,
            notes: new.notes,
            created_at: state.now(),
        };
        state.departures.push(departure.clone());
        Ok(departure)
    }

    async fn list_departures(&self, batch_id: Uuid) -> Result<Vec<Departure>, AppError> {
        let state = self.state.lock().await;
        let rows: Vec<Departure> = state.departures.iter().filter(|e| e.batch_id == batch_id).cloned().collect();
        Ok(newest_first(rows, |e| (e.date, e.created_at)))
    }

    async fn load_history(&self, batch_id: Uuid) -> Result<BatchHistory, AppError> {
        Ok(BatchHistory {
            arrivals: self.list_arrivals(batch_id).await?,
            latest_arrival: self.latest_arrival(batch_id).await?,
            deaths: self.list_deaths(batch_id).await?,
            feed_intakes: self.list_feed_intakes(batch_id).await?,
            departures: self.list_departures(batch_id).await?,
        })
    }

    async fn delete_event(&self, kind: EventKind, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let removed = match kind {
            EventKind::Arrival => remove_by_id(&mut state.arrivals, id, |e| e.id),
            EventKind::Death => remove_by_id(&mut state.deaths, id, |e| e.id),
            EventKind::Observation => remove_by_id(&mut state.observations, id, |e| e.id),
            EventKind::FeedIntake => remove_by_id(&mut state.feed_intakes, id, |e| e.id),
            EventKind::Departure => remove_by_id(&mut state.departures, id, |e| e.id),
        };
        Ok(removed)
    }
}

fn remove_by_id<T>(rows: &mut Vec<T>, id: Uuid, key: impl Fn(&T) -> Uuid) -> bool {
    let before = rows.len();
    rows.retain(|row| key(row) != id);
    rows.len() < before
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_arrival(batch_id: Uuid, day: u32, average_weight: f64) -> NewArrival {
        NewArrival {
            batch_id,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            count: 10,
            average_weight,
            total_weight: None,
            origin: "Granja A".into(),
            responsible: "Rui".into(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn latest_arrival_orders_by_date_then_creation() {
        let store = MemoryStore::new();
        let batch = store.insert_active("Lote 1").await.unwrap();
        assert_eq!(store.latest_arrival(batch.id).await.unwrap(), None);

        store.insert_arrival(new_arrival(batch.id, 8, 23.0)).await.unwrap();
        store.insert_arrival(new_arrival(batch.id, 2, 18.0)).await.unwrap();
        // Mesma data da mais recente, mas criada depois: passa a ser a última
        let newest = store.insert_arrival(new_arrival(batch.id, 8, 24.5)).await.unwrap();

        let latest = store.latest_arrival(batch.id).await.unwrap();
        assert_eq!(latest.as_ref().map(|a| a.id), Some(newest.id));

        let history = store.load_history(batch.id).await.unwrap();
        assert_eq!(history.latest_arrival, latest);
        assert_eq!(history.arrivals.len(), 3);
    }
}
