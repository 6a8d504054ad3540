use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Lote não encontrado")]
    BatchNotFound,

    #[error("Nenhum lote ativo")]
    NoActiveBatch,

    #[error("Registro não encontrado")]
    RecordNotFound,

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras que não cabem em um único campo (ex: lista de ids vazia)
    #[error("Dados inválidos: {0}")]
    InvalidInput(String),

    #[error("Já existe um lote ativo")]
    ActiveBatchExists,

    #[error("O lote ativo não pode ser excluído")]
    ActiveBatchNotDeletable,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BatchNotFound | AppError::NoActiveBatch | AppError::RecordNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ActiveBatchExists | AppError::ActiveBatchNotDeletable => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Chave no catálogo de mensagens (`I18nStore`).
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::BatchNotFound => "BatchNotFound",
            AppError::NoActiveBatch => "NoActiveBatch",
            AppError::RecordNotFound => "RecordNotFound",
            AppError::ValidationError(_) => "ValidationError",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::ActiveBatchExists => "ActiveBatchExists",
            AppError::ActiveBatchNotDeletable => "ActiveBatchNotDeletable",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "InternalServerError",
        }
    }

    /// Converte para a resposta HTTP, traduzindo a mensagem pelo idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status_code();
        let message = i18n.get(&locale.0, self.message_key());

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({ "error": message, "details": details })
            }
            AppError::InvalidInput(detail) => json!({ "error": message, "details": detail }),
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                // O `tracing` loga a mensagem detalhada; o cliente recebe a genérica.
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": message })
            }
            _ => json!({ "error": message }),
        };

        ApiError { status, body }
    }
}

/// Erro já pronto para o cliente: status + corpo JSON localizado.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
