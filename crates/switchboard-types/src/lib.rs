//! Shared types for the Switchboard voice service.
//!
//! This crate provides the foundational types used across all Switchboard
//! crates: specialist domain labels, workflow request/result envelopes, and
//! the conversation/notification wire types.
//!
//! No crate in the workspace depends on anything *except* `switchboard-types`
//! for cross-cutting type definitions. This keeps the dependency graph clean
//! and prevents circular dependencies.

pub mod message;
pub mod workflow;

pub use message::{FrontendMessage, Message, Role, TranscriptEntry};
pub use workflow::{
    CredentialRequirement, GenerateData, GenerateResponse, NodeHit, SearchData, SearchResponse,
    TriggerKind, Workflow, WorkflowNode, WorkflowRequest,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Specialist domains a conversation can be routed to.
///
/// The enumeration order is the tie-breaking priority used by the keyword
/// classifier: when two domains score equally, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// CRM, leads, pipelines, deals.
    Sales,
    /// Tickets, helpdesk, escalation.
    Support,
    /// Data sync, reporting, scheduling.
    Operations,
    /// APIs, webhooks, databases, integrations.
    Technical,
}

impl Domain {
    /// All domains in classifier priority order.
    pub const ALL: [Domain; 4] = [
        Domain::Sales,
        Domain::Support,
        Domain::Operations,
        Domain::Technical,
    ];

    /// Returns the lowercase wire label for this domain.
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Sales => "sales",
            Domain::Support => "support",
            Domain::Operations => "operations",
            Domain::Technical => "technical",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Domain::Sales),
            "support" => Ok(Domain::Support),
            "operations" => Ok(Domain::Operations),
            "technical" => Ok(Domain::Technical),
            other => Err(UnknownDomain(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized domain label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDomain(pub String);

impl fmt::Display for UnknownDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown domain label: {}", self.0)
    }
}

impl std::error::Error for UnknownDomain {}

/// The conversational mode currently active for a session.
///
/// Every session starts in the generalist `Orchestrator` mode and may be
/// switched to a specialist domain by the routing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialist {
    /// The generalist mode that greets, gathers, and routes.
    #[default]
    Orchestrator,
    /// A specialist domain mode.
    #[serde(untagged)]
    Domain(Domain),
}

impl Specialist {
    /// Returns the lowercase wire label for this specialist.
    pub fn as_str(self) -> &'static str {
        match self {
            Specialist::Orchestrator => "orchestrator",
            Specialist::Domain(d) => d.as_str(),
        }
    }
}

impl From<Domain> for Specialist {
    fn from(domain: Domain) -> Self {
        Specialist::Domain(domain)
    }
}

impl fmt::Display for Specialist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_round_trips_through_labels() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!("billing".parse::<Domain>().is_err());
    }

    #[test]
    fn specialist_serializes_to_flat_label() {
        let json = serde_json::to_string(&Specialist::Domain(Domain::Sales)).unwrap();
        assert_eq!(json, "\"sales\"");
        let json = serde_json::to_string(&Specialist::Orchestrator).unwrap();
        assert_eq!(json, "\"orchestrator\"");
    }
}
