//! HTTP gateway: chat, routing debug, and health endpoints.

pub mod api;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router as AxumRouter;
use std::sync::Arc;
use tracing::info;

use crate::agents::ModelSettings;
use crate::datasets::ObservationProvider;
use crate::providers::ChatModel;
use crate::routing::{AgentKind, KeywordRouter, Router};
use crate::sessions::SessionStore;
use crate::store::AreaStore;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<dyn Router>,
    pub sessions: Arc<dyn SessionStore>,
    pub store: Arc<dyn AreaStore>,
    pub inaturalist: Arc<dyn ObservationProvider>,
    pub ebird: Option<Arc<dyn ObservationProvider>>,
    pub model: Option<Arc<dyn ChatModel>>,
    pub settings: ModelSettings,
    /// Province applied as routing context when the request carries none.
    pub user_province: Option<String>,
    /// Handler pin from config; request-level force still wins.
    pub force_agent: Option<AgentKind>,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        store: Arc<dyn AreaStore>,
        inaturalist: Arc<dyn ObservationProvider>,
        ebird: Option<Arc<dyn ObservationProvider>>,
        model: Option<Arc<dyn ChatModel>>,
        settings: ModelSettings,
    ) -> Self {
        Self {
            router: Arc::new(KeywordRouter::new()),
            sessions,
            store,
            inaturalist,
            ebird,
            model,
            settings,
            user_province: None,
            force_agent: None,
        }
    }
}

/// Assemble the axum application.
pub fn build_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(api::handle_health))
        .route("/api/route", get(api::handle_route))
        .route("/api/agents", get(api::handle_agents))
        .route("/api/chat", post(api::handle_chat))
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn run_gateway(host: &str, port: u16, state: AppState) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("gateway listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
