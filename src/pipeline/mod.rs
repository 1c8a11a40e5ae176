//! Caption-to-summary pipeline.
//!
//! Used by both the CLI and the REST API:
//! retrieve captions, normalize them, optionally forward them to the
//! workflow API and persist the returned summary next to the caption file.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::normalizer::Normalizer;
use crate::retrieval::{CaptionRetriever, RetrievalError, RetrievalRequest, YtDlpRetriever};
use crate::workflow::{WorkflowClient, WorkflowCredentials, WorkflowError};

const SUMMARY_SUFFIX: &str = "_summary.md";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Workflow is not configured: {0}")]
    Configuration(String),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One run of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub retrieval: RetrievalRequest,
    pub clean_text: bool,
    pub send_to_workflow: bool,
    /// Per-request workflow id, overriding the configured one
    pub workflow_id: Option<String>,
    /// Per-request bearer token, overriding the configured one
    pub token: Option<String>,
}

impl PipelineRequest {
    pub fn new(retrieval: RetrievalRequest) -> Self {
        Self {
            retrieval,
            clean_text: true,
            send_to_workflow: true,
            workflow_id: None,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub subtitle_file: PathBuf,
    pub original_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_file: Option<PathBuf>,
}

pub struct SubtitlePipeline {
    retriever: Arc<dyn CaptionRetriever>,
    workflow: WorkflowClient,
    default_credentials: WorkflowCredentials,
    cleaner: Normalizer,
    passthrough: Normalizer,
}

impl SubtitlePipeline {
    pub fn new(
        retriever: Arc<dyn CaptionRetriever>,
        workflow: WorkflowClient,
        default_credentials: WorkflowCredentials,
    ) -> Result<Self> {
        Ok(Self {
            retriever,
            workflow,
            default_credentials,
            cleaner: Normalizer::create(true)?,
            passthrough: Normalizer::create(false)?,
        })
    }

    /// Build the production pipeline: yt-dlp retrieval and the configured workflow.
    pub fn from_config(config: &Config) -> Result<Self> {
        let retriever = Arc::new(YtDlpRetriever::from_config(&config.retrieval)?);
        let workflow = WorkflowClient::from_config(&config.workflow)?;
        let credentials = WorkflowCredentials::from_config(&config.workflow);

        Self::new(retriever, workflow, credentials)
    }

    pub fn is_workflow_configured(&self) -> bool {
        self.default_credentials.is_complete()
    }

    /// The normalizer for a request, built once with the pipeline.
    pub fn normalizer_for(&self, clean_text: bool) -> &Normalizer {
        if clean_text {
            &self.cleaner
        } else {
            &self.passthrough
        }
    }

    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutcome, PipelineError> {
        // Fail on missing credentials before spending time on the download
        let credentials = if request.send_to_workflow {
            Some(self.credentials_for(&request)?)
        } else {
            None
        };

        let subtitle_file = self.retriever.retrieve(&request.retrieval).await?;
        info!(
            "Retrieved captions with {}: {:?}",
            self.retriever.name(),
            subtitle_file
        );

        let bytes = tokio::fs::read(&subtitle_file).await?;
        let original_content = String::from_utf8_lossy(&bytes).into_owned();

        let normalizer = self.normalizer_for(request.clean_text);
        let forwarded_text = normalizer.run(&original_content);
        let cleaned_text = normalizer.cleans().then(|| forwarded_text.clone());

        let mut outcome = PipelineOutcome {
            subtitle_file,
            original_content,
            cleaned_text,
            workflow_response: None,
            summary_file: None,
        };

        let Some(credentials) = credentials else {
            return Ok(outcome);
        };

        let response = self.workflow.run(&credentials, &forwarded_text).await?;

        if let Some(summary) = response.summary() {
            let summary_file = summary_path(&outcome.subtitle_file);
            tokio::fs::write(&summary_file, summary).await?;
            info!("Workflow summary saved to {:?}", summary_file);
            outcome.summary_file = Some(summary_file);
        } else {
            warn!("Workflow response has no data field, no summary written");
        }

        outcome.workflow_response = Some(response.into_value());
        Ok(outcome)
    }

    fn credentials_for(&self, request: &PipelineRequest) -> Result<WorkflowCredentials, PipelineError> {
        let credentials = self
            .default_credentials
            .clone()
            .with_overrides(request.workflow_id.clone(), request.token.clone());

        if !credentials.is_complete() {
            return Err(PipelineError::Configuration(
                "set the workflow id and token in the config file or provide them in the request"
                    .to_string(),
            ));
        }

        credentials
            .numeric_id()
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        Ok(credentials)
    }
}

/// `<dir>/<caption stem>_summary.md` for a caption file.
pub fn summary_path(subtitle_file: &Path) -> PathBuf {
    let stem = subtitle_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "captions".to_string());

    subtitle_file.with_file_name(format!("{}{}", stem, SUMMARY_SUFFIX))
}
