//! Workflow request and result envelopes exchanged with the backend.
//!
//! The backend owns these shapes; this layer only relays and reformats them.
//! Structs keep unrecognized fields in a flattened `extra` map so a workflow
//! received from the backend can be pushed to the frontend verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a generated workflow is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Fires on an inbound HTTP call.
    Webhook,
    /// Fires on a time schedule.
    Schedule,
    /// Fired on demand by the user.
    Manual,
}

/// A workflow-generation request, built from the model's tool-call arguments.
///
/// Only present fields are serialized; the backend treats absent fields as
/// unconstrained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    /// Natural-language description of the workflow.
    pub description: String,
    /// Trigger kind, when the user specified one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerKind>,
    /// Services the workflow should connect, in the order mentioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    /// Free-text schedule expression (e.g. "daily at 9 AM").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl WorkflowRequest {
    /// Creates a request carrying only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            trigger: None,
            services: None,
            schedule: None,
        }
    }
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// One named node inside a generated workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Display name of the node.
    #[serde(default = "unknown_name")]
    pub name: String,
    /// Backend-owned fields preserved for verbatim relay.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A generated workflow as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Opaque backend identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Ordered nodes of the workflow.
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    /// Backend-owned fields preserved for verbatim relay.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    /// Names of the workflow's nodes, in order.
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }
}

/// A credential the user must provision before the workflow can run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRequirement {
    /// The service the credential belongs to.
    pub service: String,
    /// Backend-owned fields preserved for verbatim relay.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a successful generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateData {
    /// The generated workflow.
    pub workflow: Workflow,
    /// Credentials the user still needs to set up.
    #[serde(rename = "credentialRequirements", default)]
    pub credential_requirements: Vec<CredentialRequirement>,
}

/// Backend envelope for workflow generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Whether the backend considers the generation successful.
    pub success: bool,
    /// Present on success.
    #[serde(default)]
    pub data: Option<GenerateData>,
    /// Present on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// One integration hit from a node search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeHit {
    /// Display name of the integration.
    #[serde(default = "unknown_name")]
    pub name: String,
    /// Short description of what it does.
    #[serde(default)]
    pub description: String,
    /// Backend-owned fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a successful node search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchData {
    /// Matching integrations, best first.
    #[serde(default)]
    pub nodes: Vec<NodeHit>,
    /// Total match count reported by the backend.
    #[serde(default)]
    pub count: u64,
}

/// Backend envelope for node search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Whether the backend considers the search successful.
    pub success: bool,
    /// Present on success.
    #[serde(default)]
    pub data: Option<SearchData>,
    /// Present on failure.
    #[serde(default)]
    pub error: Option<String>,
}
