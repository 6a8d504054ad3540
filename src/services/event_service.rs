// src/services/event_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::{error::AppError, numeric::safe_div},
    db::{BatchStore, EventStore},
    models::events::{
        Arrival, Death, Departure, EventKind, FeedIntake, FeedType, NewArrival, NewDeath,
        NewDeparture, NewFeedIntake, NewObservation, Observation, Sex,
    },
};

// Faixas e tamanhos ficam no `#[validate]` dos payloads; aqui só o que o derive
// não expressa: texto que fica vazio depois do trim.
#[derive(Default)]
struct FieldErrors(ValidationErrors);

impl FieldErrors {
    fn required_text(&mut self, value: &str, field: &'static str, message: &'static str) {
        if value.trim().is_empty() {
            let mut err = ValidationError::new("required");
            err.message = Some(message.into());
            self.0.add(field, err);
        }
    }

    fn finish(self) -> Result<(), AppError> {
        if self.0.errors().is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(self.0))
        }
    }
}

#[derive(Clone)]
pub struct EventService {
    batches: Arc<dyn BatchStore>,
    events: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(batches: Arc<dyn BatchStore>, events: Arc<dyn EventStore>) -> Self {
        Self { batches, events }
    }

    async fn ensure_batch(&self, batch_id: Uuid) -> Result<(), AppError> {
        match self.batches.find_by_id(batch_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BatchNotFound),
        }
    }

    // --- CHEGADAS ---
    pub async fn record_arrival(&self, new: NewArrival) -> Result<Arrival, AppError> {
        let mut errors = FieldErrors::default();
        errors.required_text(&new.origin, "origin", "A origem é obrigatória.");
        errors.required_text(&new.responsible, "responsible", "O responsável é obrigatório.");
        errors.finish()?;

        let arrival = self
            .events
            .insert_arrival(NewArrival {
                origin: new.origin.trim().to_string(),
                responsible: new.responsible.trim().to_string(),
                ..new
            })
            .await?;
        tracing::info!(batch_id = %arrival.batch_id, count = arrival.count, "chegada registrada");
        Ok(arrival)
    }

    pub async fn list_arrivals(&self, batch_id: Uuid) -> Result<Vec<Arrival>, AppError> {
        self.ensure_batch(batch_id).await?;
        self.events.list_arrivals(batch_id).await
    }

    // --- MORTES ---
    pub async fn record_death(
        &self,
        batch_id: Uuid,
        death_date: NaiveDate,
        cause: &str,
        tag_id: &str,
        sex: Option<Sex>,
    ) -> Result<Death, AppError> {
        let mut errors = FieldErrors::default();
        errors.required_text(cause, "cause", "A causa é obrigatória.");
        errors.required_text(tag_id, "tagId", "A mossa é obrigatória.");
        errors.finish()?;

        let death = self
            .events
            .insert_death(NewDeath {
                batch_id,
                death_date,
                cause: cause.trim().to_string(),
                tag_id: tag_id.trim().to_string(),
                sex: sex.unwrap_or_default(),
            })
            .await?;
        tracing::info!(batch_id = %batch_id, tag_id = %death.tag_id, "morte registrada");
        Ok(death)
    }

    pub async fn list_deaths(&self, batch_id: Uuid) -> Result<Vec<Death>, AppError> {
        self.ensure_batch(batch_id).await?;
        self.events.list_deaths(batch_id).await
    }

    // --- OBSERVAÇÕES ---
    pub async fn record_observation(&self, batch_id: Uuid, text: &str) -> Result<Observation, AppError> {
        let mut errors = FieldErrors::default();
        errors.required_text(text, "text", "O texto da observação é obrigatório.");
        errors.finish()?;

        self.events
            .insert_observation(NewObservation { batch_id, text: text.trim().to_string() })
            .await
    }

    pub async fn list_observations(&self, batch_id: Uuid) -> Result<Vec<Observation>, AppError> {
        self.ensure_batch(batch_id).await?;
        self.events.list_observations(batch_id).await
    }

    // --- RAÇÃO ---
    pub async fn record_feed_intake(
        &self,
        batch_id: Uuid,
        feed_type: FeedType,
        origin: &str,
        quantity: f64,
        date: NaiveDate,
    ) -> Result<FeedIntake, AppError> {
        let mut errors = FieldErrors::default();
        errors.required_text(origin, "origin", "A origem é obrigatória.");
        errors.finish()?;

        let intake = self
            .events
            .insert_feed_intake(NewFeedIntake {
                batch_id,
                feed_type,
                origin: origin.trim().to_string(),
                quantity,
                date,
            })
            .await?;
        tracing::info!(batch_id = %batch_id, quantity, "entrada de ração registrada");
        Ok(intake)
    }

    pub async fn list_feed_intakes(&self, batch_id: Uuid) -> Result<Vec<FeedIntake>, AppError> {
        self.ensure_batch(batch_id).await?;
        self.events.list_feed_intakes(batch_id).await
    }

    // --- SAÍDAS ---
    /// Sem `average_weight` informado, ele é derivado de `total_weight / count`
    /// (2 casas); o valor informado é gravado como veio.
    pub async fn record_departure(
        &self,
        batch_id: Uuid,
        count: i32,
        total_weight: f64,
        average_weight: Option<f64>,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Departure, AppError> {
        // count > 0 vem validado no payload
        let average_weight = average_weight
            .or_else(|| safe_div(Some(total_weight), Some(f64::from(count)), Some(2)))
            .unwrap_or(0.0);

        let departure = self
            .events
            .insert_departure(NewDeparture {
                batch_id,
                count,
                total_weight,
                average_weight,
                date,
                notes: notes.unwrap_or_default().trim().to_string(),
            })
            .await?;
        tracing::info!(batch_id = %batch_id, count, total_weight, "saída registrada");
        Ok(departure)
    }

    pub async fn list_departures(&self, batch_id: Uuid) -> Result<Vec<Departure>, AppError> {
        self.ensure_batch(batch_id).await?;
        self.events.list_departures(batch_id).await
    }

    // --- EXCLUSÃO ---
    pub async fn delete_event(&self, kind: EventKind, id: Uuid) -> Result<(), AppError> {
        if !self.events.delete_event(kind, id).await? {
            return Err(AppError::RecordNotFound);
        }
        tracing::info!(table = kind.table(), id = %id, "registro excluído");
        Ok(())
    }
}
