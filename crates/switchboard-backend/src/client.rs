use crate::error::BackendError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use switchboard_types::{
    CredentialRequirement, GenerateResponse, SearchResponse, TranscriptEntry, Workflow,
    WorkflowRequest,
};

/// Request budget for the live-transcript relay. The relay runs off the
/// critical path, but a hung request would still pin a task per message.
const TRANSCRIPT_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the workflow-generation backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the configured backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Asks the backend to generate a workflow from gathered requirements.
    ///
    /// A 200 response is deserialized verbatim into the backend's own
    /// success/data/error envelope. Any other status or a transport failure
    /// becomes a [`BackendError`].
    pub async fn generate_workflow(
        &self,
        request: &WorkflowRequest,
    ) -> Result<GenerateResponse, BackendError> {
        self.post("/api/pipecat/generate-workflow", request, None)
            .await
    }

    /// Searches available workflow nodes and integrations.
    pub async fn search_nodes(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<SearchResponse, BackendError> {
        self.post(
            "/api/pipecat/search-nodes",
            &json!({ "query": query, "limit": limit }),
            None,
        )
        .await
    }

    /// Pushes a generated workflow to the backend's observer channel.
    ///
    /// Best-effort: callers spawn this off the voice turn and log failures.
    pub async fn broadcast_workflow(
        &self,
        workflow: &Workflow,
        credential_requirements: &[CredentialRequirement],
    ) -> Result<(), BackendError> {
        let payload = json!({
            "workflow": workflow,
            "credentialRequirements": credential_requirements,
        });
        self.post::<_, serde_json::Value>("/api/pipecat/workflow-generated", &payload, None)
            .await
            .map(|_| ())
    }

    /// Relays one conversation message to the backend's live transcript.
    ///
    /// Best-effort with a 2-second budget: callers spawn this off the voice
    /// turn and log failures.
    pub async fn relay_transcript(&self, entry: &TranscriptEntry) -> Result<(), BackendError> {
        self.post::<_, serde_json::Value>(
            "/api/pipecat/transcript",
            entry,
            Some(TRANSCRIPT_TIMEOUT),
        )
        .await
        .map(|_| ())
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<R, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(&url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
