//! Caption download endpoint.
//!
//! POST /download-subtitle runs the whole pipeline for one video. When the
//! workflow produced a summary the markdown file is returned as a download,
//! otherwise the pipeline outcome is returned as JSON.

use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::files::attachment;
use crate::api::AppState;
use crate::pipeline::{PipelineOutcome, PipelineRequest};
use crate::retrieval::{CookieSource, RetrievalRequest};
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request body for the download endpoint.
/// Only `url` is required; workflow credentials fall back to the config.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadSubtitleRequest {
    pub url: Option<String>,
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Browser to read cookies from (chrome, firefox, safari, edge)
    pub browser: Option<String>,
    /// Exported cookies file, absolute or relative to the cookies directory
    pub cookies_file: Option<String>,
    #[serde(default = "default_true")]
    pub clean_text: bool,
    #[serde(default = "default_true")]
    pub send_to_workflow: bool,
    pub workflow_id: Option<WorkflowIdField>,
    pub token: Option<String>,
}

/// Workflow ids arrive either as JSON numbers or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WorkflowIdField {
    Number(i64),
    Text(String),
}

impl WorkflowIdField {
    fn into_string(self) -> String {
        match self {
            WorkflowIdField::Number(id) => id.to_string(),
            WorkflowIdField::Text(id) => id,
        }
    }
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct DownloadSubtitleResponse {
    status: &'static str,
    #[serde(flatten)]
    outcome: PipelineOutcome,
}

/// Create the subtitle router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/download-subtitle", post(download_subtitle))
        .with_state(state)
}

/// Parse the raw body so malformed JSON gets the same error shape as everything else.
fn parse_request(body: &[u8]) -> ApiResult<(String, DownloadSubtitleRequest)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Request body is empty"));
    }

    let request: DownloadSubtitleRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?;

    let url = request
        .url
        .clone()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing video URL"))?;

    Ok((url, request))
}

/// POST /download-subtitle - Download, clean and optionally summarize captions.
async fn download_subtitle(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let (url, request) = parse_request(&body)?;

    info!(
        "Caption request for {} (lang: {}, clean: {}, workflow: {})",
        url, request.lang, request.clean_text, request.send_to_workflow
    );

    let retrieval = RetrievalRequest::new(url, request.lang).with_cookies(
        CookieSource::from_options(request.browser, request.cookies_file),
    );
    let pipeline_request = PipelineRequest {
        retrieval,
        clean_text: request.clean_text,
        send_to_workflow: request.send_to_workflow,
        workflow_id: request.workflow_id.map(WorkflowIdField::into_string),
        token: request.token,
    };

    let outcome = state.pipeline.run(pipeline_request).await?;

    if let Some(summary_file) = &outcome.summary_file {
        return attachment(summary_file).await;
    }

    Ok(Json(DownloadSubtitleResponse {
        status: "success",
        outcome,
    })
    .into_response())
}
