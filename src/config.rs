// src/config.rs

use crate::{
    common::i18n::I18nStore,
    db::{BatchRepository, BatchStore, EventRepository, EventStore},
    services::{BatchService, EventService, ReportService},
};
use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

// Configuração lida do ambiente (e do .env, se existir)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválida: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let addr = env::var("APP_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 5)?;
        let db_acquire_timeout = Duration::from_secs(parse_or("DB_ACQUIRE_TIMEOUT_SECS", 3)?);

        Ok(Self {
            database_url,
            addr,
            db_max_connections,
            db_acquire_timeout,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub batch_service: BatchService,
    pub event_service: EventService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let batches: Arc<dyn BatchStore> = Arc::new(BatchRepository::new(db_pool.clone()));
        let events: Arc<dyn EventStore> = Arc::new(EventRepository::new(db_pool.clone()));

        Ok(Self {
            batch_service: BatchService::new(batches.clone()),
            event_service: EventService::new(batches.clone(), events.clone()),
            report_service: ReportService::new(batches, events),
            i18n_store: I18nStore::new(),
            db_pool,
        })
    }
}

// Os extratores de `common::extract` só precisam do catálogo de mensagens
impl FromRef<AppState> for I18nStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.i18n_store.clone()
    }
}
