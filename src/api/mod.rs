//! REST API server for capsum.
//!
//! Provides HTTP endpoints for:
//! - Downloading and summarizing captions
//! - Health and workflow readiness
//! - Downloading generated files

pub mod error;
pub mod routes;

use crate::config::Config;
use crate::pipeline::SubtitlePipeline;
use anyhow::Result;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SubtitlePipeline>,
    pub subtitles_dir: PathBuf,
}

/// Build the full router with CORS open to every origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::subtitles::router(state.clone()))
        .merge(routes::health::router(state.clone()))
        .merge(routes::files::router(state))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

pub struct ApiServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: &Config, pipeline: Arc<SubtitlePipeline>) -> Result<Self> {
        Ok(Self {
            host: config.server.host.clone(),
            port: config.server.port,
            state: AppState {
                pipeline,
                subtitles_dir: config.retrieval.subtitles_dir()?,
            },
        })
    }

    pub async fn start(self) -> Result<()> {
        let workflow_configured = self.state.pipeline.is_workflow_configured();
        let app = router(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  POST /download-subtitle        - Download and summarize captions");
        info!("  GET  /health                   - Health and workflow readiness");
        info!("  GET  /download-markdown?file=  - Download a generated file");
        if workflow_configured {
            info!("Workflow forwarding is configured");
        } else {
            info!("Workflow forwarding is not configured, requests must carry credentials");
        }

        axum::serve(listener, app).await?;

        Ok(())
    }
}
