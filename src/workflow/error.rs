use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Workflow id must be an integer, got '{0}'")]
    InvalidWorkflowId(String),

    #[error("Workflow API request timed out")]
    Timeout,

    #[error("Could not connect to the workflow API, check the network connection: {0}")]
    Connection(String),

    #[error("Workflow API request failed: {0}")]
    Request(String),

    #[error("Workflow API returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Workflow API returned an empty response")]
    EmptyResponse,

    #[error("Workflow API returned a non-JSON response: {0}")]
    NonJson(String),

    #[error("Workflow API returned invalid JSON: {reason}. Raw response: {snippet}")]
    InvalidJson { reason: String, snippet: String },
}

impl From<reqwest::Error> for WorkflowError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WorkflowError::Timeout
        } else if err.is_connect() {
            WorkflowError::Connection(err.to_string())
        } else {
            WorkflowError::Request(err.to_string())
        }
    }
}
