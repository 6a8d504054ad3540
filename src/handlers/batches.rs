// src/handlers/batches.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{AppJson, AppPath},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::batch::{Batch, BatchSummary},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchPayload {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    #[schema(example = "Lote Março/2024")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBatchesPayload {
    #[validate(length(min = 1, message = "Informe ao menos um lote."))]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBatchesResponse {
    pub deleted: u64,
}

// GET /api/batches
#[utoipa::path(
    get,
    path = "/api/batches",
    tag = "Batches",
    responses(
        (status = 200, description = "Todos os lotes, do mais recente ao mais antigo", body = Vec<Batch>)
    )
)]
pub async fn list_batches(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let batches = app_state
        .batch_service
        .list_batches()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(batches)))
}

// POST /api/batches/active
#[utoipa::path(
    post,
    path = "/api/batches/active",
    tag = "Batches",
    request_body = CreateBatchPayload,
    responses(
        (status = 201, description = "Lote ativo criado", body = Batch),
        (status = 400, description = "Nome vazio"),
        (status = 409, description = "Já existe um lote ativo")
    )
)]
pub async fn create_active_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateBatchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let batch = app_state
        .batch_service
        .create_active_batch(&payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(batch)))
}

// GET /api/batches/active
#[utoipa::path(
    get,
    path = "/api/batches/active",
    tag = "Batches",
    responses(
        (status = 200, description = "Lote ativo", body = Batch),
        (status = 404, description = "Nenhum lote ativo")
    )
)]
pub async fn get_active_batch(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let batch = app_state
        .batch_service
        .get_active_batch()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(batch)))
}

// POST /api/batches/active/finalize
#[utoipa::path(
    post,
    path = "/api/batches/active/finalize",
    tag = "Batches",
    responses(
        (status = 200, description = "Lote finalizado", body = Batch),
        (status = 404, description = "Nenhum lote ativo")
    )
)]
pub async fn finalize_active_batch(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let batch = app_state
        .batch_service
        .finalize_active_batch()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(batch)))
}

// GET /api/batches/active/summary
#[utoipa::path(
    get,
    path = "/api/batches/active/summary",
    tag = "Reports",
    responses(
        (status = 200, description = "Resumo de desempenho do lote ativo", body = BatchSummary),
        (status = 404, description = "Nenhum lote ativo")
    )
)]
pub async fn get_active_summary(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .report_service
        .summary_for_active()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/batches/finalized
#[utoipa::path(
    get,
    path = "/api/batches/finalized",
    tag = "Batches",
    responses(
        (status = 200, description = "Lotes finalizados", body = Vec<Batch>)
    )
)]
pub async fn list_finalized(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let batches = app_state
        .batch_service
        .list_finalized()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(batches)))
}

// POST /api/batches/finalized/delete
#[utoipa::path(
    post,
    path = "/api/batches/finalized/delete",
    tag = "Batches",
    request_body = DeleteBatchesPayload,
    responses(
        (status = 200, description = "Quantidade de lotes excluídos", body = DeleteBatchesResponse),
        (status = 400, description = "Lista de ids vazia")
    )
)]
pub async fn delete_finalized(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<DeleteBatchesPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let deleted = app_state
        .batch_service
        .delete_finalized(&payload.ids)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(DeleteBatchesResponse { deleted })))
}

// GET /api/batches/{id}
#[utoipa::path(
    get,
    path = "/api/batches/{id}",
    tag = "Batches",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Lote", body = Batch),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn get_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = app_state
        .batch_service
        .get_batch(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(batch)))
}

// DELETE /api/batches/{id}
#[utoipa::path(
    delete,
    path = "/api/batches/{id}",
    tag = "Batches",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 204, description = "Lote e eventos excluídos"),
        (status = 404, description = "Lote não encontrado"),
        (status = 409, description = "Lote ativo não pode ser excluído")
    )
)]
pub async fn delete_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .batch_service
        .delete_batch(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/batches/{id}/summary
#[utoipa::path(
    get,
    path = "/api/batches/{id}/summary",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Resumo de desempenho do lote", body = BatchSummary),
        (status = 404, description = "Lote não encontrado")
    )
)]
pub async fn get_batch_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .report_service
        .summary_for(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}
