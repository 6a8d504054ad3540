//src/main.rs

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

fn router(app_state: AppState) -> Router {
    let batch_routes = Router::new()
        .route("/", get(handlers::batches::list_batches))
        .route("/active"
               ,post(handlers::batches::create_active_batch)
               .get(handlers::batches::get_active_batch)
        )
        .route("/active/finalize", post(handlers::batches::finalize_active_batch))
        .route("/active/summary", get(handlers::batches::get_active_summary))
        .route("/finalized", get(handlers::batches::list_finalized))
        .route("/finalized/delete", post(handlers::batches::delete_finalized))
        .route("/{id}"
               ,get(handlers::batches::get_batch)
               .delete(handlers::batches::delete_batch)
        )
        .route("/{id}/summary", get(handlers::batches::get_batch_summary));

    // Eventos do lote: ?batch=<id> na listagem, batchId no corpo da criação
    let event_routes = Router::new()
        .route("/arrivals"
               ,post(handlers::events::create_arrival)
               .get(handlers::events::list_arrivals)
        )
        .route("/arrivals/{id}", delete(handlers::events::delete_arrival))
        .route("/deaths"
               ,post(handlers::events::create_death)
               .get(handlers::events::list_deaths)
        )
        .route("/deaths/{id}", delete(handlers::events::delete_death))
        .route("/observations"
               ,post(handlers::events::create_observation)
               .get(handlers::events::list_observations)
        )
        .route("/observations/{id}", delete(handlers::events::delete_observation))
        .route("/feed-intakes"
               ,post(handlers::events::create_feed_intake)
               .get(handlers::events::list_feed_intakes)
        )
        .route("/feed-intakes/{id}", delete(handlers::events::delete_feed_intake))
        .route("/departures"
               ,post(handlers::events::create_departure)
               .get(handlers::events::list_departures)
        )
        .route("/departures/{id}", delete(handlers::events::delete_departure));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/batches", batch_routes)
        .nest("/api", event_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logger: nível vem de RUST_LOG (padrão "info")
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
