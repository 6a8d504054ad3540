// src/models/batch.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::events::{Arrival, Death, Departure, FeedIntake};

// ---
// 1. Batch (O "Lote")
// ---
// Coorte de animais manejados juntos da chegada à finalização.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Lote 2024-01")]
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Batch {
    pub fn status(&self) -> BatchStatus {
        if self.active {
            BatchStatus::InProgress
        } else {
            BatchStatus::Finalized
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BatchStatus {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "finalized")]
    Finalized,
}

// ---
// 2. Resumo do Lote
// ---
// Sempre recalculado a partir do histórico completo; nunca persistido.
// Campos `Option` ficam `null` quando a razão não pode ser calculada.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub name: String,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,

    // Cabeças
    #[schema(example = 100)]
    pub total_arrived: i64,
    pub total_deaths: i64,
    pub total_departed: i64,
    pub current_head_count: i64,
    #[schema(example = 85.0)]
    pub average_head_count: f64,

    // Pesos (kg)
    pub arrival_weight_total: f64,
    pub departure_weight_total: f64,
    #[schema(example = 20.0)]
    pub average_arrival_weight: Option<f64>,
    pub average_departure_weight: Option<f64>,
    pub last_arrival_average_weight: Option<f64>,
    pub weight_gain_total: f64,
    pub weight_gain_per_head: Option<f64>,
    pub weight_gain_per_day: Option<f64>,

    // Datas
    pub weighted_mean_arrival_date: Option<NaiveDate>,
    pub weighted_mean_departure_date: Option<NaiveDate>,
    pub days_on_feed: i64,

    // Ração (kg)
    pub total_feed_consumed: f64,
    pub feed_per_day: Option<f64>,
    pub feed_per_day_per_head: Option<f64>,
    pub feed_conversion_ratio: Option<f64>,

    #[schema(example = 2.5)]
    pub mortality_percent: f64,
}

// ---
// 3. Histórico do Lote
// ---
// Tudo o que o resumo precisa, lido de uma vez do Record Store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchHistory {
    pub arrivals: Vec<Arrival>,
    pub deaths: Vec<Death>,
    pub feed_intakes: Vec<FeedIntake>,
    pub departures: Vec<Departure>,
    pub latest_arrival: Option<Arrival>,
}
