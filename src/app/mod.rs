use crate::api::ApiServer;
use crate::config::Config;
use crate::pipeline::SubtitlePipeline;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Overrides for the listen address given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub async fn run_service(options: ServeOptions) -> Result<()> {
    info!("Starting capsum service");

    let mut config = Config::load()?;
    if let Some(host) = options.host {
        config.server.host = host;
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }
    config.ensure_dirs()?;

    let pipeline = Arc::new(SubtitlePipeline::from_config(&config)?);
    if pipeline.is_workflow_configured() {
        info!(
            "Workflow configured (id: {})",
            config.workflow.workflow_id.trim()
        );
    } else {
        info!("Workflow not configured; set it with `capsum config set` or CAPSUM_WORKFLOW_* variables");
    }

    let api_server = ApiServer::new(&config, pipeline)?;
    api_server.start().await
}
