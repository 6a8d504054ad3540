// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Batches ---
        handlers::batches::list_batches,
        handlers::batches::create_active_batch,
        handlers::batches::get_active_batch,
        handlers::batches::finalize_active_batch,
        handlers::batches::list_finalized,
        handlers::batches::delete_finalized,
        handlers::batches::get_batch,
        handlers::batches::delete_batch,

        // --- Reports ---
        handlers::batches::get_active_summary,
        handlers::batches::get_batch_summary,

        // --- Events ---
        handlers::events::create_arrival,
        handlers::events::list_arrivals,
        handlers::events::delete_arrival,
        handlers::events::create_death,
        handlers::events::list_deaths,
        handlers::events::delete_death,
        handlers::events::create_observation,
        handlers::events::list_observations,
        handlers::events::delete_observation,
        handlers::events::create_feed_intake,
        handlers::events::list_feed_intakes,
        handlers::events::delete_feed_intake,
        handlers::events::create_departure,
        handlers::events::list_departures,
        handlers::events::delete_departure,
    ),
    components(
        schemas(
            // --- Batches ---
            models::batch::Batch,
            models::batch::BatchStatus,
            models::batch::BatchSummary,
            handlers::batches::CreateBatchPayload,
            handlers::batches::DeleteBatchesPayload,
            handlers::batches::DeleteBatchesResponse,

            // --- Events ---
            models::events::Arrival,
            models::events::Sex,
            models::events::Death,
            models::events::Observation,
            models::events::FeedType,
            models::events::FeedIntake,
            models::events::Departure,
            handlers::events::CreateArrivalPayload,
            handlers::events::CreateDeathPayload,
            handlers::events::CreateObservationPayload,
            handlers::events::CreateFeedIntakePayload,
            handlers::events::CreateDeparturePayload,
        )
    ),
    tags(
        (name = "Batches", description = "Ciclo de vida dos lotes"),
        (name = "Reports", description = "Resumo de desempenho do lote"),
        (name = "Arrivals", description = "Chegadas de animais"),
        (name = "Deaths", description = "Registro de mortes"),
        (name = "Observations", description = "Observações gerais"),
        (name = "Feed", description = "Entradas de ração"),
        (name = "Departures", description = "Saídas de animais")
    )
)]
pub struct ApiDoc;
