// src/handlers/events.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{AppJson, AppPath, AppQuery},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::events::{
        Arrival, Death, Departure, EventKind, FeedIntake, FeedType, NewArrival, Observation, Sex,
    },
};

// ?batch=<id>
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BatchQuery {
    /// ID do lote
    pub batch: Uuid,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArrivalPayload {
    pub batch_id: Uuid,
    pub date: NaiveDate,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 100)]
    pub count: i32,

    #[validate(range(min = 0.0, message = "O peso médio não pode ser negativo."))]
    #[schema(example = 22.5)]
    pub average_weight: f64,

    #[validate(range(min = 0.0, message = "O peso total não pode ser negativo."))]
    pub total_weight: Option<f64>,

    #[validate(length(min = 1, max = 120, message = "A origem é obrigatória."))]
    pub origin: String,

    #[validate(length(min = 1, max = 120, message = "O responsável é obrigatório."))]
    pub responsible: String,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeathPayload {
    pub batch_id: Uuid,
    pub death_date: NaiveDate,

    #[validate(length(min = 1, max = 120, message = "A causa é obrigatória."))]
    pub cause: String,

    #[validate(length(min = 1, max = 30, message = "A mossa é obrigatória (até 30 caracteres)."))]
    #[schema(example = "1042")]
    pub tag_id: String,

    pub sex: Option<Sex>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateObservationPayload {
    pub batch_id: Uuid,

    #[validate(length(min = 1, message = "O texto é obrigatório."))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedIntakePayload {
    pub batch_id: Uuid,
    pub feed_type: FeedType,

    #[validate(length(min = 1, max = 120, message = "A origem é obrigatória."))]
    pub origin: String,

    #[validate(range(exclusive_min = 0.0, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 1500.0)]
    pub quantity: f64, // kg

    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeparturePayload {
    pub batch_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub count: i32,

    #[validate(range(min = 0.0, message = "O peso total não pode ser negativo."))]
    #[schema(example = 2400.0)]
    pub total_weight: f64,

    // Calculado a partir de totalWeight / count quando ausente
    #[validate(range(min = 0.0, message = "O peso médio não pode ser negativo."))]
    pub average_weight: Option<f64>,

    pub date: NaiveDate,
    pub notes: Option<String>,
}

fn validate_payload<T: Validate>(payload: &T, locale: &Locale, app_state: &AppState) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(locale, &app_state.i18n_store))
}

async fn delete_record(
    app_state: &AppState,
    locale: &Locale,
    kind: EventKind,
    id: Uuid,
) -> Result<StatusCode, ApiError> {
    app_state
        .event_service
        .delete_event(kind, id)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Chegadas
// ---
#[utoipa::path(
    post,
    path = "/api/arrivals",
    tag = "Arrivals",
    request_body = CreateArrivalPayload,
    responses(
        (status = 201, description = "Chegada registrada", body = Arrival),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn create_arrival(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateArrivalPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state)?;

    let arrival = app_state
        .event_service
        .record_arrival(NewArrival {
            batch_id: payload.batch_id,
            date: payload.date,
            count: payload.count,
            average_weight: payload.average_weight,
            total_weight: payload.total_weight,
            origin: payload.origin,
            responsible: payload.responsible,
            notes: payload.notes.unwrap_or_default(),
        })
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(arrival)))
}

#[utoipa::path(
    get,
    path = "/api/arrivals",
    tag = "Arrivals",
    params(BatchQuery),
    responses((status = 200, description = "Chegadas do lote", body = Vec<Arrival>))
)]
pub async fn list_arrivals(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<BatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let arrivals = app_state
        .event_service
        .list_arrivals(query.batch)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(arrivals)))
}

#[utoipa::path(
    delete,
    path = "/api/arrivals/{id}",
    tag = "Arrivals",
    params(("id" = Uuid, Path, description = "ID da chegada")),
    responses((status = 204, description = "Chegada excluída"), (status = 404, description = "Registro não encontrado"))
)]
pub async fn delete_arrival(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete_record(&app_state, &locale, EventKind::Arrival, id).await
}

// ---
// Mortes
// ---
#[utoipa::path(
    post,
    path = "/api/deaths",
    tag = "Deaths",
    request_body = CreateDeathPayload,
    responses(
        (status = 201, description = "Morte registrada", body = Death),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn create_death(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateDeathPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state)?;

    let death = app_state
        .event_service
        .record_death(
            payload.batch_id,
            payload.death_date,
            &payload.cause,
            &payload.tag_id,
            payload.sex,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(death)))
}

#[utoipa::path(
    get,
    path = "/api/deaths",
    tag = "Deaths",
    params(BatchQuery),
    responses((status = 200, description = "Mortes do lote", body = Vec<Death>))
)]
pub async fn list_deaths(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<BatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let deaths = app_state
        .event_service
        .list_deaths(query.batch)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(deaths)))
}

#[utoipa::path(
    delete,
    path = "/api/deaths/{id}",
    tag = "Deaths",
    params(("id" = Uuid, Path, description = "ID do registro de morte")),
    responses((status = 204, description = "Registro excluído"), (status = 404, description = "Registro não encontrado"))
)]
pub async fn delete_death(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete_record(&app_state, &locale, EventKind::Death, id).await
}

// ---
// Observações
// ---
#[utoipa::path(
    post,
    path = "/api/observations",
    tag = "Observations",
    request_body = CreateObservationPayload,
    responses(
        (status = 201, description = "Observação registrada", body = Observation),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn create_observation(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateObservationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state)?;

    let observation = app_state
        .event_service
        .record_observation(payload.batch_id, &payload.text)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(observation)))
}

#[utoipa::path(
    get,
    path = "/api/observations",
    tag = "Observations",
    params(BatchQuery),
    responses((status = 200, description = "Observações do lote", body = Vec<Observation>))
)]
pub async fn list_observations(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<BatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let observations = app_state
        .event_service
        .list_observations(query.batch)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(observations)))
}

#[utoipa::path(
    delete,
    path = "/api/observations/{id}",
    tag = "Observations",
    params(("id" = Uuid, Path, description = "ID da observação")),
    responses((status = 204, description = "Observação excluída"), (status = 404, description = "Registro não encontrado"))
)]
pub async fn delete_observation(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete_record(&app_state, &locale, EventKind::Observation, id).await
}

// ---
// Ração
// ---
#[utoipa::path(
    post,
    path = "/api/feed-intakes",
    tag = "Feed",
    request_body = CreateFeedIntakePayload,
    responses(
        (status = 201, description = "Entrada de ração registrada", body = FeedIntake),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn create_feed_intake(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateFeedIntakePayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state)?;

    let intake = app_state
        .event_service
        .record_feed_intake(
            payload.batch_id,
            payload.feed_type,
            &payload.origin,
            payload.quantity,
            payload.date,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(intake)))
}

#[utoipa::path(
    get,
    path = "/api/feed-intakes",
    tag = "Feed",
    params(BatchQuery),
    responses((status = 200, description = "Entradas de ração do lote", body = Vec<FeedIntake>))
)]
pub async fn list_feed_intakes(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<BatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let intakes = app_state
        .event_service
        .list_feed_intakes(query.batch)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(intakes)))
}

#[utoipa::path(
    delete,
    path = "/api/feed-intakes/{id}",
    tag = "Feed",
    params(("id" = Uuid, Path, description = "ID da entrada de ração")),
    responses((status = 204, description = "Entrada excluída"), (status = 404, description = "Registro não encontrado"))
)]
pub async fn delete_feed_intake(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete_record(&app_state, &locale, EventKind::FeedIntake, id).await
}

// ---
// Saídas
// ---
#[utoipa::path(
    post,
    path = "/api/departures",
    tag = "Departures",
    request_body = CreateDeparturePayload,
    responses(
        (status = 201, description = "Saída registrada", body = Departure),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn create_departure(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateDeparturePayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state)?;

    let departure = app_state
        .event_service
        .record_departure(
            payload.batch_id,
            payload.count,
            payload.total_weight,
            payload.average_weight,
            payload.date,
            payload.notes.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(departure)))
}

#[utoipa::path(
    get,
    path = "/api/departures",
    tag = "Departures",
    params(BatchQuery),
    responses((status = 200, description = "Saídas do lote", body = Vec<Departure>))
)]
pub async fn list_departures(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<BatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let departures = app_state
        .event_service
        .list_departures(query.batch)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(departures)))
}

#[utoipa::path(
    delete,
    path = "/api/departures/{id}",
    tag = "Departures",
    params(("id" = Uuid, Path, description = "ID da saída")),
    responses((status = 204, description = "Saída excluída"), (status = 404, description = "Registro não encontrado"))
)]
pub async fn delete_departure(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete_record(&app_state, &locale, EventKind::Departure, id).await
}
