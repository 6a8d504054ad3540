// src/models/events.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc, NaiveDate};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Chegadas ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub date: NaiveDate,
    #[schema(example = 100)]
    pub count: i32,
    #[schema(example = 22.5)]
    pub average_weight: f64, // kg por cabeça
    pub total_weight: Option<f64>,
    pub origin: String,
    pub responsible: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Arrival {
    /// Peso total registrado; sem ele, `count × average_weight`.
    pub fn effective_total_weight(&self) -> f64 {
        self.total_weight
            .unwrap_or_else(|| f64::from(self.count) * self.average_weight)
    }
}

// --- 2. Mortes ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "animal_sex", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum Sex {
    Male,
    Female,
    #[default]
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Death {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub death_date: NaiveDate,
    pub cause: String,
    #[schema(example = "1042")]
    pub tag_id: String, // "mossa" do animal
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
}

// --- 3. Observações ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// --- 4. Entradas de Ração ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "feed_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedType {
    Initial,
    #[sqlx(rename = "PHASE1")]
    #[serde(rename = "PHASE1")]
    Phase1,
    #[sqlx(rename = "PHASE2")]
    #[serde(rename = "PHASE2")]
    Phase2,
    #[sqlx(rename = "PHASE3")]
    #[serde(rename = "PHASE3")]
    Phase3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedIntake {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub feed_type: FeedType,
    pub origin: String,
    #[schema(example = 1500.0)]
    pub quantity: f64, // kg
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// --- 5. Saídas ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub count: i32,
    #[schema(example = 2400.0)]
    pub total_weight: f64,
    #[schema(example = 80.0)]
    pub average_weight: f64,
    pub date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

// ---
// Registros de inserção (já validados e com campos derivados preenchidos)
// ---

#[derive(Debug, Clone)]
pub struct NewArrival {
    pub batch_id: Uuid,
    pub date: NaiveDate,
    pub count: i32,
    pub average_weight: f64,
    pub total_weight: Option<f64>,
    pub origin: String,
    pub responsible: String,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct NewDeath {
    pub batch_id: Uuid,
    pub death_date: NaiveDate,
    pub cause: String,
    pub tag_id: String,
    pub sex: Sex,
}

#[derive(Debug, Clone)]
pub struct NewObservation {
    pub batch_id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct NewFeedIntake {
    pub batch_id: Uuid,
    pub feed_type: FeedType,
    pub origin: String,
    pub quantity: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewDeparture {
    pub batch_id: Uuid,
    pub count: i32,
    pub total_weight: f64,
    pub average_weight: f64,
    pub date: NaiveDate,
    pub notes: String,
}

/// Tipos de evento, usados para endereçar exclusões genéricas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    Death,
    Observation,
    FeedIntake,
    Departure,
}

impl EventKind {
    pub fn table(self) -> &'static str {
        match self {
            EventKind::Arrival => "arrivals",
            EventKind::Death => "deaths",
            EventKind::Observation => "observations",
            EventKind::FeedIntake => "feed_intakes",
            EventKind::Departure => "departures",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(count: i32, average_weight: f64, total_weight: Option<f64>) -> Arrival {
        Arrival {
            id: Uuid::new_v4(),
            batch_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            count,
            average_weight,
            total_weight,
            origin: "Granja A".into(),
            responsible: "João".into(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn recorded_total_weight_wins_over_derived() {
        assert_eq!(arrival(50, 19.0, Some(1000.0)).effective_total_weight(), 1000.0);
        assert_eq!(arrival(100, 20.0, None).effective_total_weight(), 2000.0);
    }

    #[test]
    fn feed_type_uses_phase_numbers_on_the_wire() {
        assert_eq!(serde_json::to_value(FeedType::Phase2).unwrap(), "PHASE2");
        assert_eq!(serde_json::to_value(FeedType::Initial).unwrap(), "INITIAL");
        let parsed: FeedType = serde_json::from_str("\"PHASE3\"").unwrap();
        assert_eq!(parsed, FeedType::Phase3);
    }

    #[test]
    fn sex_defaults_to_undefined() {
        assert_eq!(Sex::default(), Sex::Undefined);
    }
}
