mod config;
mod llm;
mod records;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::records::RecordStore;
use crate::services::chat::ChatService;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let chat = init_chat_service(&config).await;
    let state = state::AppState::new(chat);

    let app = routes::app(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, static_dir = %config.static_dir.display(), "ingres chat listening");
    axum::serve(listener, app).await.expect("server failed");
}

/// Non-fatal: `/chat` answers with an error when this returns `None`.
async fn init_chat_service(config: &ServerConfig) -> Option<ChatService> {
    let llm = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            client
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; chat disabled");
            return None;
        }
    };

    let records = match RecordStore::load(&config.records_path).await {
        Ok((store, report)) => {
            tracing::info!(loaded = report.loaded, skipped = report.skipped, "records loaded");
            if store.is_empty() {
                tracing::warn!(path = %config.records_path.display(), "records store is empty");
            }
            store
        }
        Err(e) => {
            tracing::warn!(error = %e, "records store unavailable; chat disabled");
            return None;
        }
    };

    Some(ChatService::new(Arc::new(llm), Arc::new(records), config.records_limit))
}
