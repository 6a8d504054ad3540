// src/services/report_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        numeric::{round_to, safe_div, weighted_mean_date},
    },
    db::{BatchStore, EventStore},
    models::batch::{Batch, BatchHistory, BatchSummary},
};

const WEIGHT_PLACES: u32 = 2;
const RATIO_PLACES: u32 = 3;

/// Monta o resumo de desempenho de um lote a partir do histórico completo.
///
/// Função pura: `today` vem de fora para que o cálculo seja determinístico.
/// Razões sem denominador válido ficam `None`; o resumo sai sempre completo.
pub fn build_summary(batch: &Batch, history: &BatchHistory, today: NaiveDate) -> BatchSummary {
    // 1. Cabeças
    let total_arrived: i64 = history.arrivals.iter().map(|a| i64::from(a.count)).sum();
    let total_deaths = history.deaths.len() as i64;
    let total_departed: i64 = history.departures.iter().map(|d| i64::from(d.count)).sum();
    let current_head_count = (total_arrived - total_deaths - total_departed).max(0);
    let average_head_count = (total_arrived + current_head_count) as f64 / 2.0;

    // 2. Pesos
    let arrival_weight_total: f64 = history
        .arrivals
        .iter()
        .map(|a| a.effective_total_weight())
        .sum();
    let departure_weight_total: f64 = history.departures.iter().map(|d| d.total_weight).sum();

    let average_arrival_weight = safe_div(
        Some(arrival_weight_total),
        Some(total_arrived as f64),
        Some(WEIGHT_PLACES),
    );
    let average_departure_weight = safe_div(
        Some(departure_weight_total),
        Some(total_departed as f64),
        Some(WEIGHT_PLACES),
    );
    let weight_gain_total = (departure_weight_total - arrival_weight_total).max(0.0);
    let weight_gain_per_head = match (average_departure_weight, average_arrival_weight) {
        (Some(departure), Some(arrival)) => Some(round_to(departure - arrival, WEIGHT_PLACES)),
        _ => None,
    };

    // 3. Datas
    let weighted_mean_arrival_date =
        weighted_mean_date(history.arrivals.iter().map(|a| (a.date, i64::from(a.count))));
    let weighted_mean_departure_date =
        weighted_mean_date(history.departures.iter().map(|d| (d.date, i64::from(d.count))));

    let days_on_feed = match weighted_mean_arrival_date {
        None => 0,
        Some(arrived) => {
            let end = if batch.active {
                today
            } else {
                weighted_mean_departure_date
                    .or_else(|| batch.finalized_at.map(|at| at.date_naive()))
                    .unwrap_or(today)
            };
            (end - arrived).num_days().max(0)
        }
    };
    let days = days_on_feed as f64;

    // 4. Ração
    let total_feed_consumed = round_to(
        history.feed_intakes.iter().map(|f| f.quantity).sum(),
        RATIO_PLACES,
    );
    let feed_per_day = safe_div(Some(total_feed_consumed), Some(days), Some(RATIO_PLACES));
    let feed_per_day_per_head = safe_div(
        Some(total_feed_consumed),
        Some(days * average_head_count),
        Some(RATIO_PLACES),
    );
    let feed_conversion_ratio = safe_div(
        Some(total_feed_consumed),
        Some(weight_gain_total),
        Some(RATIO_PLACES),
    );
    let weight_gain_per_day = safe_div(weight_gain_per_head, Some(days), Some(RATIO_PLACES));

    // 5. Mortalidade (zero, e não indefinida, quando não houve chegadas)
    let mortality_percent = safe_div(
        Some(total_deaths as f64 * 100.0),
        Some(total_arrived as f64),
        Some(2),
    )
    .unwrap_or(0.0);

    BatchSummary {
        batch_id: batch.id,
        name: batch.name.clone(),
        status: batch.status(),
        created_at: batch.created_at,
        finalized_at: batch.finalized_at,

        total_arrived,
        total_deaths,
        total_departed,
        current_head_count,
        average_head_count,

        arrival_weight_total: round_to(arrival_weight_total, WEIGHT_PLACES),
        departure_weight_total: round_to(departure_weight_total, WEIGHT_PLACES),
        average_arrival_weight,
        average_departure_weight,
        last_arrival_average_weight: history.latest_arrival.as_ref().map(|a| a.average_weight),
        weight_gain_total: round_to(weight_gain_total, WEIGHT_PLACES),
        weight_gain_per_head,
        weight_gain_per_day,

        weighted_mean_arrival_date,
        weighted_mean_departure_date,
        days_on_feed,

        total_feed_consumed,
        feed_per_day,
        feed_per_day_per_head,
        feed_conversion_ratio,

        mortality_percent,
    }
}

#[derive(Clone)]
pub struct ReportService {
    batches: Arc<dyn BatchStore>,
    events: Arc<dyn EventStore>,
}

impl ReportService {
    pub fn new(batches: Arc<dyn BatchStore>, events: Arc<dyn EventStore>) -> Self {
        Self { batches, events }
    }

    pub async fn summary_for(&self, batch_id: Uuid) -> Result<BatchSummary, AppError> {
        let batch = self
            .batches
            .find_by_id(batch_id)
            .await?
            .ok_or(AppError::BatchNotFound)?;
        self.summarize(&batch).await
    }

    pub async fn summary_for_active(&self) -> Result<BatchSummary, AppError> {
        let batch = self
            .batches
            .find_active()
            .await?
            .ok_or(AppError::NoActiveBatch)?;
        self.summarize(&batch).await
    }

    async fn summarize(&self, batch: &Batch) -> Result<BatchSummary, AppError> {
        let history = self.events.load_history(batch.id).await?;
        let summary = build_summary(batch, &history, Utc::now().date_naive());

        tracing::debug!(
            batch_id = %batch.id,
            arrivals = history.arrivals.len(),
            departures = history.departures.len(),
            days_on_feed = summary.days_on_feed,
            "resumo do lote calculado"
        );
        Ok(summary)
    }
}
