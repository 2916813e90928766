//! Tool-call handlers for the hosted speech model.
//!
//! The model runtime invokes these when it decides to call one of the
//! declared tools; the returned JSON value feeds the model's next spoken
//! reply. Handlers never fail the turn: every outcome, including backend
//! errors, becomes a structured result with a voice-friendly `message`.

use crate::sessions::SessionRegistry;
use serde_json::{json, Value};
use std::sync::Arc;
use switchboard_backend::BackendClient;
use switchboard_types::{Domain, FrontendMessage, TriggerKind, WorkflowRequest};
use switchboard_voice::TransportSession;
use tracing::{info, warn};

/// Everything a tool handler may touch for one session.
#[derive(Clone)]
pub struct ToolContext {
    /// Room name identifying the session.
    pub room_name: String,
    /// Session registry owning the specialist state.
    pub registry: SessionRegistry,
    /// Workflow backend client.
    pub backend: Arc<BackendClient>,
    /// Transport for out-of-band frontend messages.
    pub transport: Arc<TransportSession>,
}

/// Tool declarations handed to the hosted model.
pub fn tool_schemas() -> Value {
    json!([
        {
            "name": "route_to_agent",
            "description": "Route to specialist domain and switch your behavior. After calling this, YOU BECOME that specialist and help build workflows.",
            "parameters": {
                "type": "object",
                "properties": {
                    "agent": {
                        "type": "string",
                        "description": "The specialist agent: sales (for CRM/leads), support (for tickets/helpdesk), operations (for data/scheduling), technical (for API/webhooks)",
                        "enum": ["sales", "support", "operations", "technical"]
                    },
                    "reason": {
                        "type": "string",
                        "description": "One sentence explaining why you're routing to this agent"
                    }
                },
                "required": ["agent", "reason"]
            }
        },
        {
            "name": "generate_workflow",
            "description": "Generate a workflow based on user requirements. Call this when you have gathered enough information about what the user wants to automate.",
            "parameters": {
                "type": "object",
                "properties": {
                    "description": {
                        "type": "string",
                        "description": "Complete description of the workflow based on the conversation"
                    },
                    "trigger": {
                        "type": "string",
                        "description": "Trigger type: webhook, schedule, or manual",
                        "enum": ["webhook", "schedule", "manual"]
                    },
                    "services": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of services to use (e.g., slack, gmail, hubspot, postgres)"
                    },
                    "schedule": {
                        "type": "string",
                        "description": "Schedule time if trigger is schedule (e.g., 'daily at 9 AM', 'every Monday')"
                    }
                },
                "required": ["description"]
            }
        },
        {
            "name": "search_nodes",
            "description": "Search available workflow nodes and integrations. Use this to answer questions about what services, triggers, or actions are available.",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query describing the service or integration (e.g., 'Salesforce', 'email triggers', 'Airtable')"
                    }
                },
                "required": ["query"]
            }
        }
    ])
}

/// Dispatches one tool call to its handler.
pub async fn dispatch(ctx: &ToolContext, name: &str, args: &Value) -> Value {
    match name {
        "route_to_agent" => route_to_agent(ctx, args).await,
        "generate_workflow" => generate_workflow(ctx, args).await,
        "search_nodes" => search_nodes(ctx, args).await,
        other => {
            warn!(room = %ctx.room_name, tool = other, "model called an undeclared tool");
            json!({ "error": format!("unknown tool: {other}") })
        }
    }
}

fn specialist_greeting(domain: Domain) -> &'static str {
    match domain {
        Domain::Sales => {
            "Now I'm your sales automation specialist! Let's build a CRM workflow. What CRM do you use?"
        }
        Domain::Support => {
            "Now I'm your support automation specialist! Let's build a helpdesk workflow. What ticketing system do you use?"
        }
        Domain::Operations => {
            "Now I'm your operations specialist! Let's build a data workflow. What data sources do you work with?"
        }
        Domain::Technical => {
            "Now I'm your technical integration specialist! Let's build an API workflow. What services need to be connected?"
        }
    }
}

async fn route_to_agent(ctx: &ToolContext, args: &Value) -> Value {
    let Some(agent) = args.get("agent").and_then(Value::as_str) else {
        return json!({ "routed": false, "error": "missing agent argument" });
    };
    let reason = args.get("reason").and_then(Value::as_str).unwrap_or("");

    let domain = match agent.parse::<Domain>() {
        Ok(domain) => domain,
        Err(_) => {
            return json!({
                "routed": false,
                "error": format!("Could not route to {agent}")
            });
        }
    };

    info!(room = %ctx.room_name, agent, reason, "routing to specialist");

    match ctx.registry.switch_specialist(&ctx.room_name, domain) {
        Some(outcome) if outcome.changed => {
            // UI sync is best-effort; a dropped notification must not fail
            // the voice turn.
            let notice = FrontendMessage::AgentSwitch {
                agent: domain,
                previous_agent: outcome.previous.as_str().to_string(),
            };
            if let Err(e) = ctx.transport.send_app_message(&notice) {
                warn!(room = %ctx.room_name, "failed to notify frontend of agent switch: {e}");
            }

            json!({
                "routed": true,
                "agent": agent,
                "message": specialist_greeting(domain)
            })
        }
        Some(_) => json!({
            "routed": false,
            "error": format!("already routed to {agent}")
        }),
        None => json!({
            "routed": false,
            "error": format!("no active session for room {}", ctx.room_name)
        }),
    }
}

async fn generate_workflow(ctx: &ToolContext, args: &Value) -> Value {
    let Some(description) = args.get("description").and_then(Value::as_str) else {
        return json!({
            "workflow_generated": false,
            "error": "missing description argument",
            "message": "I need a bit more detail about what you want to automate before I can build it."
        });
    };

    let trigger: Option<TriggerKind> = args
        .get("trigger")
        .and_then(|v| serde_json::from_value(v.clone()).ok());
    let services: Option<Vec<String>> = args
        .get("services")
        .and_then(|v| serde_json::from_value(v.clone()).ok());
    let schedule = args
        .get("schedule")
        .and_then(Value::as_str)
        .map(str::to_string);

    let request = WorkflowRequest {
        description: description.to_string(),
        trigger,
        services,
        schedule,
    };

    info!(room = %ctx.room_name, description, "generating workflow");

    let response = match ctx.backend.generate_workflow(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(room = %ctx.room_name, "workflow generation failed: {e}");
            return generation_failure(&e.to_string());
        }
    };

    let data = match (response.success, response.data) {
        (true, Some(data)) => data,
        _ => {
            let error = response.error.unwrap_or_else(|| "Unknown error".to_string());
            warn!(room = %ctx.room_name, error, "backend rejected workflow generation");
            return generation_failure(&error);
        }
    };

    let node_count = data.workflow.nodes.len();
    let node_names = data.workflow.node_names().join(", ");
    info!(room = %ctx.room_name, node_count, nodes = %node_names, "workflow generated");

    // Relay to the observing frontend and backend channels off the voice
    // turn; both are best-effort.
    let notice = FrontendMessage::WorkflowGenerated {
        workflow: data.workflow.clone(),
        credential_requirements: data.credential_requirements.clone(),
    };
    if let Err(e) = ctx.transport.send_app_message(&notice) {
        warn!(room = %ctx.room_name, "failed to push workflow to frontend: {e}");
    }
    {
        let backend = ctx.backend.clone();
        let room = ctx.room_name.clone();
        let workflow = data.workflow.clone();
        let credentials = data.credential_requirements.clone();
        tokio::spawn(async move {
            if let Err(e) = backend.broadcast_workflow(&workflow, &credentials).await {
                warn!(room = %room, "workflow broadcast failed: {e}");
            }
        });
    }

    let credential_msg = if data.credential_requirements.is_empty() {
        String::new()
    } else {
        let services: Vec<&str> = data
            .credential_requirements
            .iter()
            .map(|c| c.service.as_str())
            .collect();
        format!(
            " You'll need to set up credentials for: {}.",
            services.join(", ")
        )
    };

    json!({
        "workflow_generated": true,
        "workflow_id": data.workflow.id,
        "node_count": node_count,
        "nodes": node_names,
        "message": format!(
            "I've created your workflow with {node_count} nodes: {node_names}.{credential_msg} \
             The workflow is now displayed on your screen. Would you like me to deploy it?"
        )
    })
}

fn generation_failure(error: &str) -> Value {
    json!({
        "workflow_generated": false,
        "error": error,
        "message": format!(
            "I encountered an error generating the workflow: {error}. \
             Could you provide more details about what you want to automate?"
        )
    })
}

/// How many matches the backend is asked for.
const SEARCH_LIMIT: u32 = 5;
/// How many matches are read aloud.
const SPOKEN_RESULTS: usize = 3;

async fn search_nodes(ctx: &ToolContext, args: &Value) -> Value {
    let query = args.get("query").and_then(Value::as_str).unwrap_or("");

    info!(room = %ctx.room_name, query, "searching nodes");

    let response = match ctx.backend.search_nodes(query, SEARCH_LIMIT).await {
        Ok(response) => response,
        Err(e) => {
            warn!(room = %ctx.room_name, query, "node search failed: {e}");
            return search_failure(&e.to_string());
        }
    };

    if !response.success {
        let error = response.error.unwrap_or_else(|| "Unknown error".to_string());
        warn!(room = %ctx.room_name, query, error, "backend rejected node search");
        return search_failure(&error);
    }

    let data = response.data.unwrap_or_default();
    if data.count == 0 {
        return json!({
            "found": false,
            "count": 0,
            "message": format!(
                "I couldn't find any integrations matching '{query}'. \
                 Could you try a different search term or describe what you're trying to do?"
            )
        });
    }

    let node_list: Vec<String> = data
        .nodes
        .iter()
        .take(SEARCH_LIMIT as usize)
        .map(|n| format!("{}: {}", n.name, n.description))
        .collect();
    let spoken = node_list
        .iter()
        .take(SPOKEN_RESULTS)
        .cloned()
        .collect::<Vec<_>>()
        .join(". ");

    json!({
        "found": true,
        "count": data.count,
        "nodes": node_list,
        "message": format!(
            "Yes! I found {} integrations for {query}. Here are the top ones: {spoken}.",
            data.count
        )
    })
}

fn search_failure(error: &str) -> Value {
    json!({
        "found": false,
        "error": error,
        "message": "I had trouble searching for that. Could you rephrase your question?"
    })
}
