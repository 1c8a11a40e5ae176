//! Client for the external workflow-execution API.
//!
//! The cleaned transcript is posted as the `subtitle` parameter of a workflow
//! run; the response is kept verbatim and its `data` field is mined for a
//! summary.

mod error;
mod summary;

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::WorkflowConfig;

pub use error::WorkflowError;
pub use summary::extract_summary;

const SNIPPET_CHARS: usize = 200;

/// Everything needed to start a workflow run.
#[derive(Clone, Default)]
pub struct WorkflowCredentials {
    pub endpoint: String,
    pub workflow_id: String,
    pub token: String,
}

impl WorkflowCredentials {
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            endpoint: config.api_base_url.clone(),
            workflow_id: config.workflow_id.clone(),
            token: config.token.clone(),
        }
    }

    /// Replace the workflow id and token with per-request values when given.
    pub fn with_overrides(mut self, workflow_id: Option<String>, token: Option<String>) -> Self {
        if let Some(id) = workflow_id.filter(|id| !id.trim().is_empty()) {
            self.workflow_id = id;
        }
        if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
            self.token = token;
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.workflow_id.trim().is_empty() && !self.token.trim().is_empty()
    }

    pub fn numeric_id(&self) -> Result<i64, WorkflowError> {
        self.workflow_id
            .trim()
            .parse()
            .map_err(|_| WorkflowError::InvalidWorkflowId(self.workflow_id.clone()))
    }
}

// Keep the bearer token out of logs
impl fmt::Debug for WorkflowCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowCredentials")
            .field("endpoint", &self.endpoint)
            .field("workflow_id", &self.workflow_id)
            .field("token", &mask_token(&self.token))
            .finish()
    }
}

/// Show only the first few characters of a secret.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let visible: String = token.chars().take(4).collect();
    format!("{}...", visible)
}

#[derive(Debug, Serialize)]
struct RunPayload<'a> {
    workflow_id: i64,
    parameters: RunParameters<'a>,
}

#[derive(Debug, Serialize)]
struct RunParameters<'a> {
    subtitle: &'a str,
}

/// Raw JSON returned by a workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowResponse(pub Value);

impl WorkflowResponse {
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    pub fn code(&self) -> Option<i64> {
        self.0.get("code").and_then(Value::as_i64)
    }

    /// Summary text for the `data` field, if the response has one.
    pub fn summary(&self) -> Option<String> {
        self.data().map(extract_summary)
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

pub struct WorkflowClient {
    client: reqwest::Client,
}

impl WorkflowClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    pub fn from_config(config: &WorkflowConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_seconds))
    }

    /// Run the workflow with `subtitle` as its input text.
    pub async fn run(
        &self,
        credentials: &WorkflowCredentials,
        subtitle: &str,
    ) -> Result<WorkflowResponse, WorkflowError> {
        let payload = RunPayload {
            workflow_id: credentials.numeric_id()?,
            parameters: RunParameters { subtitle },
        };

        info!(
            "Sending {} chars to workflow {} at {}",
            subtitle.len(),
            payload.workflow_id,
            credentials.endpoint
        );

        let response = self
            .client
            .post(&credentials.endpoint)
            .bearer_auth(&credentials.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        debug!(
            "Workflow API responded with status {} ({}, {} chars)",
            status,
            content_type,
            body.len()
        );

        if body.is_empty() {
            return Err(WorkflowError::EmptyResponse);
        }

        if !status.is_success() {
            error!("Workflow API request failed with status {}: {}", status, body);
            return Err(WorkflowError::Status {
                status,
                body: snippet(&body),
            });
        }

        if !content_type.starts_with("application/json") {
            return Err(WorkflowError::NonJson(snippet(&body)));
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| WorkflowError::InvalidJson {
                reason: e.to_string(),
                snippet: snippet(&body),
            })?;

        let response = WorkflowResponse(value);
        info!("Workflow run finished, response code: {:?}", response.code());

        Ok(response)
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(server: &MockServer) -> WorkflowCredentials {
        WorkflowCredentials {
            endpoint: format!("{}/workflow/run", server.uri()),
            workflow_id: "7412".to_string(),
            token: "pat_secret".to_string(),
        }
    }

    fn client() -> WorkflowClient {
        WorkflowClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_run_posts_payload_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workflow/run"))
            .and(header("authorization", "Bearer pat_secret"))
            .and(body_json(json!({
                "workflow_id": 7412,
                "parameters": {"subtitle": "hello world"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": "{\"summary\": \"a greeting\"}"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client()
            .run(&credentials(&server), "hello world")
            .await
            .unwrap();

        assert_eq!(response.code(), Some(0));
        assert_eq!(response.summary().as_deref(), Some("a greeting"));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client().run(&credentials(&server), "x").await.unwrap_err();
        assert!(matches!(err, WorkflowError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_non_json_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&server)
            .await;

        let err = client().run(&credentials(&server), "x").await.unwrap_err();
        match err {
            WorkflowError::NonJson(body) => assert_eq!(body, "<html>busy</html>"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{oops", "application/json"))
            .mount(&server)
            .await;

        let err = client().run(&credentials(&server), "x").await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidJson { .. }));
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"code": 4100, "msg": "bad token"})),
            )
            .mount(&server)
            .await;

        let err = client().run(&credentials(&server), "x").await.unwrap_err();
        match err {
            WorkflowError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("bad token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = WorkflowClient::new(Duration::from_millis(100)).unwrap();
        let err = client.run(&credentials(&server), "x").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Timeout));
    }

    #[tokio::test]
    async fn test_non_numeric_workflow_id_is_rejected_before_sending() {
        let creds = WorkflowCredentials {
            endpoint: "http://127.0.0.1:9/unused".to_string(),
            workflow_id: "abc".to_string(),
            token: "t".to_string(),
        };

        let err = client().run(&creds, "x").await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidWorkflowId(id) if id == "abc"));
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let base = WorkflowCredentials {
            endpoint: "http://e".to_string(),
            workflow_id: "1".to_string(),
            token: "cfg".to_string(),
        };

        let merged = base.with_overrides(Some("2".to_string()), Some("  ".to_string()));

        assert_eq!(merged.workflow_id, "2");
        assert_eq!(merged.token, "cfg");
        assert!(merged.is_complete());
    }

    #[test]
    fn test_debug_masks_token() {
        let creds = WorkflowCredentials {
            endpoint: "http://e".to_string(),
            workflow_id: "1".to_string(),
            token: "pat_verysecret".to_string(),
        };

        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("pat_..."));
        assert!(!rendered.contains("verysecret"));
    }
}
