// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "en";

// (chave, português, inglês)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("BatchNotFound", "Lote não encontrado.", "Batch not found."),
    ("NoActiveBatch", "Nenhum lote ativo.", "No active batch."),
    ("RecordNotFound", "Registro não encontrado.", "Record not found."),
    ("ValidationError", "Um ou mais campos são inválidos.", "One or more fields are invalid."),
    ("InvalidInput", "Dados inválidos.", "Invalid input."),
    (
        "ActiveBatchExists",
        "Já existe um lote ativo. Finalize-o antes de criar outro.",
        "An active batch already exists. Finalize it before creating another.",
    ),
    (
        "ActiveBatchNotDeletable",
        "Não é possível excluir o lote ativo.",
        "The active batch cannot be deleted.",
    ),
    ("InternalServerError", "Ocorreu um erro inesperado.", "An unexpected error occurred."),
];

/// Catálogo de mensagens por idioma, carregado uma vez no `AppState`.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<(String, String), String>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        for (key, pt, en) in MESSAGES {
            messages.insert(("pt".to_string(), key.to_string()), pt.to_string());
            messages.insert(("en".to_string(), key.to_string()), en.to_string());
        }
        Self { messages: Arc::new(messages) }
    }

    /// Busca a mensagem no idioma pedido, caindo para inglês e depois para a própria chave.
    pub fn get(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(&(lang.to_string(), key.to_string()))
            .or_else(|| self.messages.get(&(DEFAULT_LANG.to_string(), key.to_string())))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
